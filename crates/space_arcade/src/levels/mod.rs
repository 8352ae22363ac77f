//! Playable levels

pub mod base_level;
pub mod space_level;
pub mod space_level_config;

pub use base_level::{BaseLevel, RenderEntity};
pub use space_level::{LevelEvent, SpaceLevel};
pub use space_level_config::{ShipSpawn, SpaceLevelConfig, StarSpawn, MAX_TEAMS};

use arcade_engine::prelude::EntityId;

/// Payload of a level's spawn broadcast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnedEntity {
    /// The new entity
    pub entity: EntityId,
    /// Its team, `None` for neutral entities
    pub team: Option<usize>,
}
