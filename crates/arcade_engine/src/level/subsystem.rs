//! Level subsystem

use super::{same_level, LevelRef};
use crate::events::Broadcast;
use crate::render::{FrameView, RenderQueue, SceneRenderer};

/// Payload of the level change broadcasts
#[derive(Clone)]
pub struct LevelChange {
    /// Level loaded before the change
    pub previous: Option<LevelRef>,
    /// Level loaded after the change
    pub next: Option<LevelRef>,
}

impl std::fmt::Debug for LevelChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = |level: &Option<LevelRef>| {
            level
                .as_ref()
                .map(|l| l.try_borrow().map_or_else(|_| "<busy>".to_string(), |l| l.name().to_string()))
        };
        f.debug_struct("LevelChange")
            .field("previous", &name(&self.previous))
            .field("next", &name(&self.next))
            .finish()
    }
}

/// Owns the loaded level and announces transitions
#[derive(Default)]
pub struct LevelSubsystem {
    current: Option<LevelRef>,
    queue: RenderQueue,

    /// Before the swap: `previous` is still loaded
    pub on_pre_level_change: Broadcast<LevelChange>,
    /// After the swap and the new level's start
    pub on_post_level_change: Broadcast<LevelChange>,
    /// The new level finished its start-up
    pub on_level_startup_complete: Broadcast<LevelRef>,
}

impl LevelSubsystem {
    /// Create a subsystem with no level loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// The loaded level
    pub fn current_level(&self) -> Option<&LevelRef> {
        self.current.as_ref()
    }

    /// Replace the loaded level with `level`
    ///
    /// Order: pre-change, end previous, swap, start new, post-change,
    /// startup-complete. Each broadcast fires exactly once.
    pub fn load_level(&mut self, level: LevelRef) {
        let change = LevelChange {
            previous: self.current.clone(),
            next: Some(level.clone()),
        };
        self.on_pre_level_change.broadcast(&change);

        if let Some(previous) = self.current.take() {
            previous.borrow_mut().end_level();
        }
        self.current = Some(level.clone());
        level.borrow_mut().start_level();
        log::info!("Level '{}' loaded", level.borrow().name());

        self.on_post_level_change.broadcast(&change);
        self.on_level_startup_complete.broadcast(&level);
    }

    /// Unload `level` if it is the loaded level
    ///
    /// Returns false and does nothing otherwise.
    pub fn unload_level(&mut self, level: &LevelRef) -> bool {
        let is_current = self.current.as_ref().is_some_and(|current| same_level(current, level));
        if !is_current {
            log::warn!("Ignoring unload of a level that is not loaded");
            return false;
        }

        let change = LevelChange {
            previous: self.current.clone(),
            next: None,
        };
        self.on_pre_level_change.broadcast(&change);
        if let Some(previous) = self.current.take() {
            previous.borrow_mut().end_level();
            log::info!("Level '{}' unloaded", previous.borrow().name());
        }
        self.on_post_level_change.broadcast(&change);
        true
    }

    /// Tick the loaded level
    pub fn tick(&mut self, delta_time: f32) {
        if let Some(level) = &self.current {
            level.borrow_mut().tick(delta_time);
        }
    }

    /// Render the loaded level
    ///
    /// Nothing is submitted when there is no camera or the level queued
    /// nothing.
    pub fn render(&mut self, camera: Option<&FrameView>, renderer: &mut dyn SceneRenderer) {
        let Some(level) = &self.current else {
            return;
        };
        self.queue.clear();
        level.borrow().render(camera, &mut self.queue);
        if camera.is_none() || self.queue.is_empty() {
            return;
        }
        self.queue.sort_commands();
        renderer.submit(&self.queue);
    }

    /// Unload whatever is loaded
    pub fn shutdown(&mut self) {
        if let Some(level) = self.current.clone() {
            self.unload_level(&level);
        }
    }
}
