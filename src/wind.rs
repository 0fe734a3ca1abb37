//! Scalar wind model.
//!
//! Each frame the wind force eases toward a target strength and is
//! integrated into an accumulated displacement. Occasionally the target is
//! re-rolled to a large, randomly signed value, which reads as a gust.
//!
//! `current` is never clamped. It is only meaningful together with the
//! modulo wrap applied by the displacement kernel, which folds any
//! accumulated offset back into the world volume.
//!
//! Easing and gust probability are applied per frame rather than per second,
//! so the wind responds faster at higher frame rates.

use rand::Rng;

use crate::config::WindConfig;

/// Displacement damping applied when integrating force over time.
pub const DISPLACEMENT_DAMPING: f32 = 0.2;
/// A gust is rolled when a uniform sample exceeds this threshold.
pub const GUST_THRESHOLD: f32 = 0.995;
/// Scale from configured gust strength to target force.
pub const GUST_SCALE: f32 = 100.0;

/// Mutable wind state owned by the render loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wind {
    /// Accumulated displacement fed to the kernel.
    pub current: f32,
    /// Current signed strength.
    pub force: f32,
    /// Strength the force is easing toward.
    pub target: f32,
    pub min: f32,
    pub max: f32,
    pub easing: f32,
}

impl Wind {
    /// Create wind state from configuration with zero displacement.
    pub fn new(config: &WindConfig) -> Self {
        Self {
            current: 0.0,
            force: config.force,
            target: config.target,
            min: config.min,
            max: config.max,
            easing: config.easing,
        }
    }

    /// Advance one frame: ease, accumulate, then possibly roll a gust.
    pub fn update<R: Rng>(&mut self, delta_time: f32, rng: &mut R) {
        self.ease();
        self.accumulate(delta_time);
        self.maybe_gust(rng);
    }

    /// Move `force` a fixed fraction of the way toward `target`.
    #[inline]
    pub fn ease(&mut self) {
        self.force += (self.target - self.force) * self.easing;
    }

    /// Integrate the current force over `delta_time`.
    #[inline]
    pub fn accumulate(&mut self, delta_time: f32) {
        self.current += self.force * (delta_time * DISPLACEMENT_DAMPING);
    }

    /// Roll for a gust. Returns `true` if the target changed.
    pub fn maybe_gust<R: Rng>(&mut self, rng: &mut R) -> bool {
        if rng.gen::<f32>() > GUST_THRESHOLD {
            let strength = self.min + rng.gen::<f32>() * (self.max - self.min);
            let sign = if rng.gen::<f32>() > 0.5 { -1.0 } else { 1.0 };
            self.target = strength * sign * GUST_SCALE;
            true
        } else {
            false
        }
    }
}

impl Default for Wind {
    fn default() -> Self {
        Self::new(&WindConfig::default())
    }
}
