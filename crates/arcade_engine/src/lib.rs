//! # Arcade Engine
//!
//! A small frame-driven game framework used by the space arcade prototype.
//!
//! ## Features
//!
//! - **Entity Arena**: Generational entity handles with type-keyed component storage
//! - **Level Streaming**: One active level at a time with transition broadcasts
//! - **Broadcasts**: Explicit subscription lists instead of delegate objects
//! - **Asset Loading**: Image decoding and texture upload through a pluggable backend
//! - **Windowing**: GLFW window with broadcast-style input callbacks
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use arcade_engine::prelude::*;
//!
//! struct EmptyLevel;
//!
//! impl Level for EmptyLevel {
//!     fn name(&self) -> &str { "empty" }
//!     fn as_any(&self) -> &dyn std::any::Any { self }
//!     fn as_any_mut(&mut self) -> &mut dyn std::any::Any { self }
//! }
//!
//! let mut levels = LevelSubsystem::new();
//! levels.load_level(level_ref(EmptyLevel));
//! levels.tick(1.0 / 60.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod config;
pub mod events;
pub mod ecs;
pub mod assets;
pub mod render;
pub mod level;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        foundation::{
            math::{Vec3, Mat4, Quat, Transform},
            time::{Timer, TickTimer},
        },
        config::{Config, ConfigError},
        events::{Broadcast, SubscriptionId},
        ecs::{World, EntityId, Component, TransformComponent},
        assets::{AssetError, ImageData, TextureId, TextureSubsystem},
        render::{FrameView, RenderQueue, SceneRenderer},
        level::{Level, LevelRef, LevelSubsystem, level_ref},
    };
}
