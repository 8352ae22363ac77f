//! # Space Arcade
//!
//! Ship combat on top of `arcade_engine`: ships carry placements (turrets,
//! communications arrays, defenses) that team commanders point at hostile
//! targets, inside levels strung together by a campaign graph.
//!
//! Asset configs are JSON files inside a mod directory:
//!
//! - `Assets/Campaigns/CampaignConfig_<n>.json`: the [`campaign`] graph,
//!   each level embedding its [`levels::SpaceLevelConfig`]
//! - `Assets/SpawnConfigs/<name>.json`: ship templates ([`spawn_config`])

#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod campaign;
pub mod components;
pub mod config;
pub mod config_asset;
pub mod environment;
pub mod error;
pub mod levels;
pub mod placement;
pub mod projectile;
pub mod spawn_config;
pub mod team;

pub use app::SpaceArcade;
pub use error::GameError;
