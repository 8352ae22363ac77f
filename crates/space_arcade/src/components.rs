//! Game-specific components

use std::path::PathBuf;

use arcade_engine::prelude::*;

/// Team membership; entities without one are neutral and never targeted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamComponent {
    /// Team index
    pub team: usize,
}

impl Component for TeamComponent {}

/// A spawned ship
#[derive(Debug, Clone, Default)]
pub struct ShipComponent {
    /// Spawn config the ship was built from
    pub spawn_config: String,

    /// Placement entities mounted on this ship, alive or not
    pub placements: Vec<EntityId>,
}

impl Component for ShipComponent {}

impl ShipComponent {
    /// Placements whose handles are still alive in `world`
    pub fn live_placements<'a>(&'a self, world: &'a World) -> impl Iterator<Item = EntityId> + 'a {
        self.placements.iter().copied().filter(|&p| world.is_alive(p))
    }
}

/// Something drawn with a model file
#[derive(Debug, Clone, PartialEq)]
pub struct RenderModelComponent {
    /// Model file on disk
    pub model_path: PathBuf,

    /// Colour multiplier (team colour)
    pub tint: Option<Vec3>,
}

impl Component for RenderModelComponent {}

impl RenderModelComponent {
    /// Untinted model
    pub fn new(model_path: impl Into<PathBuf>) -> Self {
        Self {
            model_path: model_path.into(),
            tint: None,
        }
    }

    /// Builder: tint colour
    pub fn with_tint(mut self, tint: Vec3) -> Self {
        self.tint = Some(tint);
        self
    }
}
