//! Entity-Component-System implementation
//!
//! A generational arena of entities with one sparse storage per component
//! type. Entity handles double as the engine's weak references.

pub mod world;
pub mod entity;
pub mod component;
pub mod components;

pub use world::World;
pub use entity::{EntityId, EntityMeta};
pub use component::Component;
pub use components::TransformComponent;
