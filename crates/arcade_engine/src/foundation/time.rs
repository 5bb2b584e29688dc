//! Time management utilities

use std::time::{Duration, Instant};

/// Frame timer that paces the simulation to a minimum frame interval
///
/// The driver asks [`FrameTimer::frame_due`] before running a frame and calls
/// [`FrameTimer::tick`] when it does, which yields the elapsed delta time.
pub struct FrameTimer {
    last_frame: Instant,
    min_frame_interval: Duration,
    delta_time: f64,
    total_time: f64,
    frame_count: u64,
}

impl FrameTimer {
    /// Create a new timer capped to `min_frame_interval` seconds between frames
    pub fn new(min_frame_interval: f64) -> Self {
        Self::starting_at(Instant::now(), min_frame_interval)
    }

    /// Create a timer whose first frame is measured from `start`
    pub fn starting_at(start: Instant, min_frame_interval: f64) -> Self {
        Self {
            last_frame: start,
            min_frame_interval: Duration::from_secs_f64(min_frame_interval.max(0.0)),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Whether enough time has passed since the last frame
    pub fn frame_due(&self) -> bool {
        self.frame_due_at(Instant::now())
    }

    /// Whether a frame is due at the given instant
    pub fn frame_due_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_frame) >= self.min_frame_interval
    }

    /// Time left until the next frame is due
    pub fn time_until_due(&self) -> Duration {
        self.min_frame_interval
            .saturating_sub(Instant::now().saturating_duration_since(self.last_frame))
    }

    /// Start a new frame now and return its delta time in seconds
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// Start a new frame at `now` and return its delta time in seconds
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let elapsed = now.saturating_duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f64();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f64 {
        self.delta_time
    }

    /// Get the total elapsed time across all ticked frames
    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    #[allow(clippy::cast_precision_loss)]
    pub fn average_fps(&self) -> f64 {
        if self.total_time > 0.0 {
            self.frame_count as f64 / self.total_time
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frame_due_respects_interval() {
        let start = Instant::now();
        let timer = FrameTimer::starting_at(start, 0.016);

        assert!(!timer.frame_due_at(start + Duration::from_millis(5)));
        assert!(timer.frame_due_at(start + Duration::from_millis(16)));
    }

    #[test]
    fn test_tick_accumulates() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(start, 0.0);

        let dt = timer.tick_at(start + Duration::from_millis(250));
        assert_relative_eq!(dt, 0.25, epsilon = 1e-9);

        timer.tick_at(start + Duration::from_millis(500));
        assert_eq!(timer.frame_count(), 2);
        assert_relative_eq!(timer.total_time(), 0.5, epsilon = 1e-9);
        assert_relative_eq!(timer.average_fps(), 4.0, epsilon = 1e-6);
    }
}
