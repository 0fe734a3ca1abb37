//! # Snowfall
//!
//! A wind-driven snowfall particle field, drawn on a transparent background.
//!
//! Every flake is generated once with static attributes (position, speed,
//! spin, size, opacity). Motion is computed from scratch every frame by a
//! vertex-stage kernel that combines those attributes with a handful of
//! uniforms: elapsed time, gravity and an accumulated wind offset. Nothing
//! is written back, and flakes wrap around a fixed volume, so the field
//! never runs out.
//!
//! ## Quick Start
//!
//! ```ignore
//! use snowfall::prelude::*;
//!
//! fn main() -> Result<(), SetupError> {
//!     let config = SnowConfig::new()
//!         .with_gravity(18.0)
//!         .with_opacity_range(0.2, 0.6);
//!     snowfall::run(config)
//! }
//! ```
//!
//! ## Driving it yourself
//!
//! [`SnowAnimation`] is generic over a [`Renderer`]. The desktop host uses
//! [`GpuRenderer`]; [`HeadlessRenderer`] runs the same kernel on the CPU,
//! which is handy for tests and tooling:
//!
//! ```ignore
//! let viewport = Viewport::new(800, 600, 1.0);
//! let mut snow = SnowAnimation::new(SnowConfig::default(), viewport, HeadlessRenderer::new(viewport))?;
//! for frame in 1..=60 {
//!     snow.tick_at(frame as f32 / 60.0)?;
//! }
//! ```
//!
//! ## Wind
//!
//! The wind force eases toward a target each frame and is integrated into
//! a displacement. Roughly one frame in two hundred rolls a gust: a new,
//! randomly signed target a hundred times the configured strength.

pub mod animation;
pub mod camera;
pub mod config;
pub mod error;
pub mod field;
pub mod gpu;
pub mod kernel;
pub mod renderer;
pub mod shader;
pub mod sprite;
pub mod time;
pub mod uniforms;
pub mod viewport;
pub mod wind;
mod window;

pub use animation::{SnowAnimation, StopHandle};
pub use camera::Camera;
pub use config::{SnowConfig, SpriteSource, WindConfig};
pub use error::{ConfigError, GpuError, RenderError, SetupError, TextureError};
pub use field::{ParticleAttributes, ParticleBuffers, SnowVertex};
pub use glam::{Vec2, Vec3, Vec4};
pub use gpu::GpuRenderer;
pub use renderer::{HeadlessRenderer, Renderer};
pub use sprite::SpriteImage;
pub use uniforms::FrameUniforms;
pub use viewport::{particle_count, Viewport};
pub use wind::Wind;
pub use window::{run, run_until};

/// Common imports.
///
/// ```ignore
/// use snowfall::prelude::*;
/// ```
pub mod prelude {
    pub use crate::animation::{SnowAnimation, StopHandle};
    pub use crate::config::{SnowConfig, SpriteSource, WindConfig};
    pub use crate::error::SetupError;
    pub use crate::renderer::{HeadlessRenderer, Renderer};
    pub use crate::viewport::Viewport;
    pub use crate::{run, run_until};
    pub use glam::{Vec2, Vec3, Vec4};
}
