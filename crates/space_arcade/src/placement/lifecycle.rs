//! Placement lifecycle: health driven destruction
//!
//! ```text
//! Active --hit--> Damaged --hp <= 0--> Destructing --timer--> Destroyed
//! ```
//!
//! Destruction runs for a fixed time and emits an effect tick at a fixed
//! cadence while it does.

/// Seconds between the destruction phase starting and the placement dying
pub const DEFAULT_DESTROY_AT_SEC: f32 = 3.0;

/// Seconds between destruction effect ticks
pub const DESTRUCTION_TICK_SEC: f32 = 0.1;

// Absorbs accumulated float error when counting effect ticks
const TICK_EPSILON: f32 = 1e-3;

/// Current state of a placement's lifecycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementState {
    /// Never hit
    Active,
    /// Hit at least once, still fighting
    Damaged,
    /// Dying; `elapsed` seconds into the destruction phase
    Destructing {
        /// Time spent destructing
        elapsed: f32,
    },
    /// Gone; the level removes the entity
    Destroyed,
}

/// What a lifecycle step produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// Periodic destruction effect
    DestructionTick,
    /// Destruction finished
    Destroyed,
}

/// Lifecycle state machine for one placement
#[derive(Debug, Clone)]
pub struct PlacementLifecycle {
    state: PlacementState,
    destroy_at_sec: f32,
    tick_period_sec: f32,
    ticks_emitted: u32,
}

impl Default for PlacementLifecycle {
    fn default() -> Self {
        Self::new(DEFAULT_DESTROY_AT_SEC, DESTRUCTION_TICK_SEC)
    }
}

impl PlacementLifecycle {
    /// Lifecycle with custom destruction timing
    pub fn new(destroy_at_sec: f32, tick_period_sec: f32) -> Self {
        Self {
            state: PlacementState::Active,
            destroy_at_sec: destroy_at_sec.max(0.0),
            tick_period_sec: tick_period_sec.max(f32::EPSILON),
            ticks_emitted: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> PlacementState {
        self.state
    }

    /// Whether the destruction phase has begun (or finished)
    pub fn has_started_destruction(&self) -> bool {
        matches!(self.state, PlacementState::Destructing { .. } | PlacementState::Destroyed)
    }

    /// Whether the placement is gone
    pub fn is_destroyed(&self) -> bool {
        self.state == PlacementState::Destroyed
    }

    /// Destruction effect ticks emitted so far
    pub fn ticks_emitted(&self) -> u32 {
        self.ticks_emitted
    }

    /// Record a hit that left the placement standing
    pub fn mark_damaged(&mut self) {
        if self.state == PlacementState::Active {
            self.state = PlacementState::Damaged;
        }
    }

    /// Enter the destruction phase; returns false if it had already begun
    pub fn begin_destruction(&mut self) -> bool {
        if self.has_started_destruction() {
            return false;
        }
        self.state = PlacementState::Destructing { elapsed: 0.0 };
        true
    }

    /// Advance the destruction timer
    pub fn update(&mut self, delta_time: f32, out: &mut Vec<LifecycleEvent>) {
        let PlacementState::Destructing { elapsed } = self.state else {
            return;
        };
        let elapsed = elapsed + delta_time.max(0.0);
        let finished = elapsed >= self.destroy_at_sec;

        // Ticks are derived from elapsed time and capped at the phase length
        let ticking_time = elapsed.min(self.destroy_at_sec);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let due = (ticking_time / self.tick_period_sec + TICK_EPSILON).floor() as u32;
        while self.ticks_emitted < due {
            self.ticks_emitted += 1;
            out.push(LifecycleEvent::DestructionTick);
        }

        if finished {
            self.state = PlacementState::Destroyed;
            out.push(LifecycleEvent::Destroyed);
        } else {
            self.state = PlacementState::Destructing { elapsed };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(lifecycle: &mut PlacementLifecycle, dt: f32, frames: usize) -> Vec<LifecycleEvent> {
        let mut events = Vec::new();
        for _ in 0..frames {
            lifecycle.update(dt, &mut events);
        }
        events
    }

    #[test]
    fn test_damage_then_destroy() {
        let mut lifecycle = PlacementLifecycle::default();
        assert_eq!(lifecycle.state(), PlacementState::Active);

        lifecycle.mark_damaged();
        assert_eq!(lifecycle.state(), PlacementState::Damaged);

        assert!(lifecycle.begin_destruction());
        assert!(!lifecycle.begin_destruction());
        assert!(lifecycle.has_started_destruction());
    }

    #[test]
    fn test_destruction_lasts_three_seconds_with_thirty_ticks() {
        let mut lifecycle = PlacementLifecycle::default();
        lifecycle.begin_destruction();

        // 1/64 s frames are exact in binary: 192 frames is 3.0 s
        let events = run(&mut lifecycle, 1.0 / 64.0, 191);
        assert!(!lifecycle.is_destroyed());
        assert!(!events.contains(&LifecycleEvent::Destroyed));

        let events = run(&mut lifecycle, 1.0 / 64.0, 1);
        assert_eq!(events.last(), Some(&LifecycleEvent::Destroyed));
        assert!(lifecycle.is_destroyed());
        assert_eq!(lifecycle.ticks_emitted(), 30);
    }

    #[test]
    fn test_tick_count_is_stable_at_coarse_frames() {
        let mut lifecycle = PlacementLifecycle::default();
        lifecycle.begin_destruction();
        let events = run(&mut lifecycle, 0.1, 40);

        let ticks = events.iter().filter(|e| **e == LifecycleEvent::DestructionTick).count();
        let deaths = events.iter().filter(|e| **e == LifecycleEvent::Destroyed).count();
        assert_eq!(ticks, 30);
        assert_eq!(deaths, 1);
    }

    #[test]
    fn test_update_is_inert_outside_destruction() {
        let mut lifecycle = PlacementLifecycle::default();
        let events = run(&mut lifecycle, 10.0, 3);
        assert!(events.is_empty());
        assert_eq!(lifecycle.state(), PlacementState::Active);
    }
}
