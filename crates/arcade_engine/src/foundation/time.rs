//! Time management utilities

use std::time::Instant;

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Fixed-period tick accumulator
///
/// Frame deltas are fed in with [`TickTimer::advance`], which reports how many
/// whole periods elapsed. Used for effects that fire on a fixed cadence
/// regardless of frame rate.
#[derive(Debug, Clone, PartialEq)]
pub struct TickTimer {
    period: f32,
    accumulated: f32,
}

impl TickTimer {
    /// Create a timer firing every `period` seconds
    ///
    /// Non-positive periods are clamped to a tiny positive value.
    pub fn new(period: f32) -> Self {
        Self {
            period: period.max(f32::EPSILON),
            accumulated: 0.0,
        }
    }

    /// Tick period in seconds
    pub fn period(&self) -> f32 {
        self.period
    }

    /// Feed a frame delta, returning the number of periods completed
    ///
    /// The count saturates at `u32::MAX`; an infinite delta drops the
    /// remainder.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn advance(&mut self, delta_time: f32) -> u32 {
        self.accumulated += delta_time.max(0.0);
        let whole = (self.accumulated / self.period).floor();
        self.accumulated = (self.accumulated - whole * self.period).clamp(0.0, self.period);
        if !self.accumulated.is_finite() {
            self.accumulated = 0.0;
        }
        whole as u32
    }

    /// Drop any partial progress
    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_timer_counts_whole_periods() {
        let mut timer = TickTimer::new(0.5);
        assert_eq!(timer.advance(0.25), 0);
        assert_eq!(timer.advance(0.25), 1);
        assert_eq!(timer.advance(1.6), 3);
        timer.reset();
        assert_eq!(timer.advance(0.4), 0);
    }

    #[test]
    fn test_tick_timer_handles_huge_deltas() {
        let mut timer = TickTimer::new(1.0 / 64.0);
        assert_eq!(timer.advance(1.0e9), u32::MAX);
        assert!(timer.advance(0.0) <= 1);

        let mut tiny = TickTimer::new(0.0);
        assert_eq!(tiny.advance(1.0), (1.0 / f32::EPSILON).floor() as u32);

        let mut timer = TickTimer::new(0.5);
        assert_eq!(timer.advance(f32::INFINITY), u32::MAX);
        assert_eq!(timer.advance(0.25), 0);
        assert_eq!(timer.advance(0.25), 1);
    }

    #[test]
    fn test_tick_timer_ignores_negative_delta() {
        let mut timer = TickTimer::new(1.0);
        assert_eq!(timer.advance(-5.0), 0);
        assert_eq!(timer.advance(1.0), 1);
    }

    #[test]
    fn test_frame_timer_counts_frames() {
        let mut timer = Timer::new();
        timer.update();
        timer.update();
        assert_eq!(timer.frame_count(), 2);
        assert!(timer.total_time() >= 0.0);
    }
}
