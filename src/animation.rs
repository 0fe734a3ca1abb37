//! The snowfall render loop state.
//!
//! [`SnowAnimation`] owns everything that changes while the snow falls:
//! the generated field, the wind, the frame clock, the camera and the
//! per-frame uniforms. Each [`tick`](SnowAnimation::tick) advances the wind,
//! writes the uniforms and issues exactly one draw. The host drives it one
//! frame at a time and can stop it from anywhere through a [`StopHandle`].
//!
//! ```ignore
//! let renderer = HeadlessRenderer::new(Viewport::new(800, 600, 1.0));
//! let mut snow = SnowAnimation::new(SnowConfig::default(), Viewport::new(800, 600, 1.0), renderer)?;
//! snow.tick_at(1.0 / 60.0)?;
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{debug, info};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::camera::Camera;
use crate::config::SnowConfig;
use crate::error::{RenderError, SetupError};
use crate::field::ParticleBuffers;
use crate::renderer::Renderer;
use crate::sprite::SpriteImage;
use crate::time::Time;
use crate::uniforms::FrameUniforms;
use crate::viewport::{particle_count, Viewport};
use crate::wind::Wind;

/// Seconds between periodic stats log lines.
const STATS_INTERVAL: f32 = 5.0;

/// Cancels a running animation. Cheap to clone and safe to share.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that no further frames be scheduled.
    pub fn stop(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// A running snowfall bound to one renderer.
pub struct SnowAnimation<R: Renderer> {
    config: SnowConfig,
    viewport: Viewport,
    camera: Camera,
    field: ParticleBuffers,
    wind: Wind,
    uniforms: FrameUniforms,
    time: Time,
    rng: SmallRng,
    renderer: R,
    stop: StopHandle,
    last_stats: f32,
}

impl<R: Renderer> SnowAnimation<R> {
    /// Build the animation with a particle count derived from the viewport
    /// width and `config.count_density`.
    pub fn new(config: SnowConfig, viewport: Viewport, renderer: R) -> Result<Self, SetupError> {
        let count = particle_count(viewport.width, config.count_density);
        Self::with_count(config, viewport, renderer, count)
    }

    /// Build the animation with an explicit particle count.
    pub fn with_count(
        config: SnowConfig,
        viewport: Viewport,
        renderer: R,
        count: u32,
    ) -> Result<Self, SetupError> {
        Self::build(config, viewport, renderer, count, SmallRng::from_entropy())
    }

    /// Like [`with_count`](Self::with_count) with a fixed random seed, so the
    /// field and gusts are reproducible.
    pub fn with_seed(
        config: SnowConfig,
        viewport: Viewport,
        renderer: R,
        count: u32,
        seed: u64,
    ) -> Result<Self, SetupError> {
        Self::build(config, viewport, renderer, count, SmallRng::seed_from_u64(seed))
    }

    fn build(
        config: SnowConfig,
        viewport: Viewport,
        mut renderer: R,
        count: u32,
        mut rng: SmallRng,
    ) -> Result<Self, SetupError> {
        config.validate()?;

        renderer.resize(viewport);
        let camera = Camera::new(viewport.aspect());
        let uniforms = FrameUniforms::new(&config, renderer.pixel_ratio());
        let wind = Wind::new(&config.wind);

        let field = ParticleBuffers::generate(count, &config, &mut rng);
        let sprite = SpriteImage::load_or_transparent(&config.sprite);
        renderer.install_field(&field, &sprite);

        info!(
            "Snowfall ready: {} particles, {}x{} @ {:.2}x",
            field.len(),
            viewport.width,
            viewport.height,
            renderer.pixel_ratio()
        );

        Ok(Self {
            config,
            viewport,
            camera,
            field,
            wind,
            uniforms,
            time: Time::new(),
            rng,
            renderer,
            stop: StopHandle::new(),
            last_stats: 0.0,
        })
    }

    /// Share an existing stop handle, so one token cancels both the host
    /// loop and this animation.
    pub fn with_stop_handle(mut self, stop: StopHandle) -> Self {
        self.stop = stop;
        self
    }

    /// Advance to the current wall-clock time and draw one frame.
    pub fn tick(&mut self) -> Result<(), RenderError> {
        let (elapsed, delta) = self.time.update();
        self.step(elapsed, delta)
    }

    /// Advance to `elapsed` seconds since start and draw one frame.
    pub fn tick_at(&mut self, elapsed: f32) -> Result<(), RenderError> {
        let (elapsed, delta) = self.time.advance_to(elapsed);
        self.step(elapsed, delta)
    }

    fn step(&mut self, elapsed: f32, delta: f32) -> Result<(), RenderError> {
        self.wind.update(delta, &mut self.rng);

        self.uniforms.elapsed_time = elapsed;
        self.uniforms.wind_current = self.wind.current;

        self.renderer.render(&self.camera, &self.uniforms)?;

        if elapsed - self.last_stats >= STATS_INTERVAL {
            self.last_stats = elapsed;
            debug!(
                "frame {} | {:.1} fps | {} particles | wind force {:.3} -> {:.3}, offset {:.3}",
                self.time.frame(),
                self.time.fps(),
                self.field.len(),
                self.wind.force,
                self.wind.target,
                self.wind.current
            );
        }
        Ok(())
    }

    /// Simulate `frames` frames spaced `frame_time` seconds apart.
    ///
    /// Stops early if the stop handle fires. Returns the number of frames
    /// drawn.
    pub fn run_frames(&mut self, frames: u64, frame_time: f32) -> Result<u64, RenderError> {
        let mut drawn = 0;
        while drawn < frames && !self.stop.is_stopped() {
            let next = self.time.elapsed() + frame_time;
            self.tick_at(next)?;
            drawn += 1;
        }
        Ok(drawn)
    }

    /// Apply a new host viewport.
    ///
    /// Updates the camera aspect, the renderer size and the pixel-ratio
    /// dependent sprite size. The particle count is not changed; call
    /// [`regenerate`](Self::regenerate) for that.
    pub fn handle_resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.renderer.resize(viewport);
        if viewport.is_empty() {
            return;
        }
        self.camera.set_aspect(viewport.aspect());
        self.uniforms.point_size = self.config.point_size * self.renderer.pixel_ratio();
        debug!(
            "Resized to {}x{} (aspect {:.3})",
            viewport.width,
            viewport.height,
            self.camera.aspect
        );
    }

    /// Replace the field with a new one sized for the current viewport.
    pub fn regenerate(&mut self) {
        let count = particle_count(self.viewport.width, self.config.count_density);
        self.regenerate_with_count(count);
    }

    /// Replace the field with `count` new particles.
    ///
    /// The old field's resources are released before the new field is
    /// installed. Wind, clock and camera carry over.
    pub fn regenerate_with_count(&mut self, count: u32) {
        self.renderer.release_field();
        self.field = ParticleBuffers::generate(count, &self.config, &mut self.rng);
        let sprite = SpriteImage::load_or_transparent(&self.config.sprite);
        self.renderer.install_field(&self.field, &sprite);
        info!("Regenerated snow field with {} particles", self.field.len());
    }

    /// Handle that stops this animation when triggered.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.is_stopped()
    }

    pub fn field(&self) -> &ParticleBuffers {
        &self.field
    }

    pub fn wind(&self) -> &Wind {
        &self.wind
    }

    /// Mutable wind state, for hosts that steer the wind directly.
    pub fn wind_mut(&mut self) -> &mut Wind {
        &mut self.wind
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn uniforms(&self) -> &FrameUniforms {
        &self.uniforms
    }

    pub fn time(&self) -> &Time {
        &self.time
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &SnowConfig {
        &self.config
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}
