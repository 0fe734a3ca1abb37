//! Frame clock for the render loop.
//!
//! Monotonic time since construction, delta time since the previous frame,
//! and a periodically refreshed FPS estimate.
//!
//! # Example
//!
//! ```ignore
//! use snowfall::time::Time;
//!
//! let mut time = Time::new();
//!
//! // Once per frame:
//! let (elapsed, delta) = time.update();
//! ```

use std::time::{Duration, Instant};

/// Time tracking for the snowfall loop.
#[derive(Debug)]
pub struct Time {
    /// When the clock was created.
    start: Instant,
    /// Elapsed seconds at the previous frame.
    previous_elapsed: f32,
    /// Total elapsed time in seconds.
    elapsed_secs: f32,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Elapsed seconds at the last FPS calculation.
    fps_update_elapsed: f32,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl Time {
    /// Create a new clock starting from now.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            previous_elapsed: 0.0,
            elapsed_secs: 0.0,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_elapsed: 0.0,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Read the monotonic clock and advance one frame.
    ///
    /// Returns `(elapsed_time, delta_time)`.
    pub fn update(&mut self) -> (f32, f32) {
        let elapsed = self.start.elapsed().as_secs_f32();
        self.advance_to(elapsed)
    }

    /// Advance one frame to an externally supplied elapsed time.
    ///
    /// Times earlier than the previous frame are treated as no progress.
    pub fn advance_to(&mut self, elapsed: f32) -> (f32, f32) {
        let elapsed = elapsed.max(self.previous_elapsed);
        self.delta_secs = elapsed - self.previous_elapsed;
        self.previous_elapsed = elapsed;
        self.elapsed_secs = elapsed;
        self.frame_count += 1;

        let since_fps = elapsed - self.fps_update_elapsed;
        if since_fps >= self.fps_update_interval.as_secs_f32() {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / since_fps;
            self.fps_frame_count = self.frame_count;
            self.fps_update_elapsed = elapsed;
        }

        (self.elapsed_secs, self.delta_secs)
    }

    /// Total elapsed time in seconds since start.
    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed_secs
    }

    /// Time since last frame in seconds (delta time).
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_time_new() {
        let time = Time::new();
        assert_eq!(time.frame(), 0);
        assert_eq!(time.elapsed(), 0.0);
    }

    #[test]
    fn test_time_update() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(10));
        let (elapsed, delta) = time.update();

        assert!(elapsed > 0.0);
        assert!(delta > 0.0);
        assert_eq!(time.frame(), 1);
    }

    #[test]
    fn test_advance_to_computes_delta() {
        let mut time = Time::new();
        assert_eq!(time.advance_to(0.25), (0.25, 0.25));
        assert_eq!(time.advance_to(1.0), (1.0, 0.75));
        assert_eq!(time.frame(), 2);
    }

    #[test]
    fn test_clock_never_runs_backwards() {
        let mut time = Time::new();
        time.advance_to(2.0);
        let (elapsed, delta) = time.advance_to(1.0);
        assert_eq!(elapsed, 2.0);
        assert_eq!(delta, 0.0);
    }

    #[test]
    fn test_fps_estimate() {
        let mut time = Time::new();
        for i in 1..=60 {
            time.advance_to(i as f32 / 60.0);
        }
        assert!((time.fps() - 60.0).abs() < 1.0, "fps {}", time.fps());
    }
}
