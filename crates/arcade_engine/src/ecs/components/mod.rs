//! ECS Components module
//!
//! Engine-level components shared by every game built on the arena

pub mod transform;

pub use transform::TransformComponent;
