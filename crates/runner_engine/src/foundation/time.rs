//! Time management utilities

use std::time::Instant;

/// Sanitize a raw frame delta: negative or NaN becomes zero, large stalls are capped at `max_delta`
pub fn clamp_delta(raw: f32, max_delta: f32) -> f32 {
    if raw.is_nan() || raw <= 0.0 {
        0.0
    } else {
        raw.min(max_delta)
    }
}

/// Frame timer producing clamped per-frame deltas
///
/// After a pause or stall the wall-clock gap can be seconds long; the timer caps
/// what it reports so the simulation never takes one giant step.
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    max_delta: f32,
    total_time: f32,
    frame_count: u64,
}

impl Timer {
    /// Create a new timer that caps deltas at `max_delta` seconds
    pub fn new(max_delta: f32) -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            max_delta,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame) and return the clamped delta
    pub fn update(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Feed an externally measured delta (fixed-step or replay driving)
    pub fn advance(&mut self, raw_delta: f32) -> f32 {
        self.delta_time = clamp_delta(raw_delta, self.max_delta);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total (clamped) elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new(0.1)
    }
}
