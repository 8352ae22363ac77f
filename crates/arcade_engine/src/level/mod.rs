//! Level streaming
//!
//! A [`Level`] is one playable scene. The [`LevelSubsystem`] keeps at most
//! one of them loaded and broadcasts every transition.

pub mod subsystem;

pub use subsystem::{LevelChange, LevelSubsystem};

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::render::{FrameView, RenderQueue};

/// Shared handle to a level
pub type LevelRef = Rc<RefCell<dyn Level>>;

/// Wrap a level for the subsystem
pub fn level_ref<L: Level + 'static>(level: L) -> LevelRef {
    Rc::new(RefCell::new(level))
}

/// One playable scene
pub trait Level {
    /// Display name, used in logs
    fn name(&self) -> &str;

    /// Called once when the level becomes the loaded level
    fn start_level(&mut self) {}

    /// Called once when the level stops being the loaded level
    fn end_level(&mut self) {}

    /// Advance the simulation by `delta_time` seconds
    fn tick(&mut self, _delta_time: f32) {}

    /// Queue this frame's draws; `camera` is `None` when nobody is looking
    fn render(&self, _camera: Option<&FrameView>, _queue: &mut RenderQueue) {}

    /// Downcasting support
    fn as_any(&self) -> &dyn Any;

    /// Mutable downcasting support
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Whether two handles point at the same level
pub fn same_level(a: &LevelRef, b: &LevelRef) -> bool {
    Rc::ptr_eq(a, b)
}
