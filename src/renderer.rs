//! Rendering backends.
//!
//! The render loop talks to a [`Renderer`]: it installs a particle field
//! once per generation, reports viewport changes, and asks for one draw per
//! frame. [`GpuRenderer`](crate::gpu::GpuRenderer) draws through wgpu;
//! [`HeadlessRenderer`] evaluates the same per-particle kernel on the CPU and
//! keeps the result for inspection.

use glam::Mat4;

use crate::camera::Camera;
use crate::error::RenderError;
use crate::field::ParticleBuffers;
use crate::kernel::{self, ProjectedParticle};
use crate::sprite::SpriteImage;
use crate::uniforms::FrameUniforms;
use crate::viewport::Viewport;

/// A backend that can draw a snow field.
pub trait Renderer {
    /// Upload a freshly generated field and its sprite.
    ///
    /// Any field still installed is released first.
    fn install_field(&mut self, field: &ParticleBuffers, sprite: &SpriteImage);

    /// Free every resource owned by the installed field.
    fn release_field(&mut self);

    /// Apply a new viewport. Takes effect for the next draw.
    fn resize(&mut self, viewport: Viewport);

    /// Draw the installed field once.
    fn render(&mut self, camera: &Camera, uniforms: &FrameUniforms) -> Result<(), RenderError>;

    /// Current size in logical pixels.
    fn size(&self) -> (u32, u32);

    /// Pixel ratio used for sprite sizing.
    fn pixel_ratio(&self) -> f32;

    /// Number of live resources owned by the installed field.
    fn live_resources(&self) -> usize;
}

/// CPU renderer that runs the displacement kernel for every particle.
#[derive(Debug)]
pub struct HeadlessRenderer {
    viewport: Viewport,
    field: Option<ParticleBuffers>,
    sprite: Option<SpriteImage>,
    last_frame: Vec<ProjectedParticle>,
    frames_rendered: u64,
}

impl HeadlessRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            field: None,
            sprite: None,
            last_frame: Vec::new(),
            frames_rendered: 0,
        }
    }

    /// Particles produced by the most recent draw, in index order.
    pub fn last_frame(&self) -> &[ProjectedParticle] {
        &self.last_frame
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    /// The field as it was uploaded.
    pub fn installed_field(&self) -> Option<&ParticleBuffers> {
        self.field.as_ref()
    }

    pub fn installed_sprite(&self) -> Option<&SpriteImage> {
        self.sprite.as_ref()
    }
}

impl Renderer for HeadlessRenderer {
    fn install_field(&mut self, field: &ParticleBuffers, sprite: &SpriteImage) {
        self.release_field();
        self.field = Some(field.clone());
        self.sprite = Some(sprite.clone());
    }

    fn release_field(&mut self) {
        self.field = None;
        self.sprite = None;
        self.last_frame.clear();
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn render(&mut self, camera: &Camera, uniforms: &FrameUniforms) -> Result<(), RenderError> {
        let view: Mat4 = camera.view_matrix();
        let proj = camera.projection_matrix();
        let u = uniforms.kernel();

        self.last_frame.clear();
        if let Some(field) = &self.field {
            self.last_frame
                .extend(field.iter().map(|p| kernel::project(&p, &u, view, proj)));
        }
        self.frames_rendered += 1;
        Ok(())
    }

    fn size(&self) -> (u32, u32) {
        (self.viewport.width, self.viewport.height)
    }

    fn pixel_ratio(&self) -> f32 {
        self.viewport.pixel_ratio()
    }

    fn live_resources(&self) -> usize {
        usize::from(self.field.is_some()) + usize::from(self.sprite.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnowConfig;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn test_render_without_field_is_ok() {
        let mut renderer = HeadlessRenderer::new(Viewport::new(800, 600, 1.0));
        let uniforms = FrameUniforms::new(&SnowConfig::default(), 1.0);
        renderer.render(&Camera::default(), &uniforms).unwrap();
        assert!(renderer.last_frame().is_empty());
        assert_eq!(renderer.frames_rendered(), 1);
    }

    #[test]
    fn test_install_replaces_previous_field() {
        let mut rng = SmallRng::seed_from_u64(1);
        let config = SnowConfig::default();
        let mut renderer = HeadlessRenderer::new(Viewport::new(800, 600, 1.0));
        let sprite = SpriteImage::transparent();

        renderer.install_field(&ParticleBuffers::generate(10, &config, &mut rng), &sprite);
        let after_one = renderer.live_resources();
        renderer.install_field(&ParticleBuffers::generate(20, &config, &mut rng), &sprite);
        assert_eq!(renderer.live_resources(), after_one);
        assert_eq!(renderer.installed_field().map(|f| f.len()), Some(20));

        renderer.release_field();
        assert_eq!(renderer.live_resources(), 0);
    }
}
