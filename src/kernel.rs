//! Per-particle displacement and appearance.
//!
//! These functions mirror `snow.wgsl` exactly and are what the headless
//! renderer evaluates. Every output is a pure function of one particle's
//! static attributes and the frame uniforms, so particles can be evaluated
//! in any order or in parallel.

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::field::{ParticleAttributes, ParticleBuffers};

/// Frame-level inputs shared by every particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KernelUniforms {
    pub elapsed_time: f32,
    pub wind_current: f32,
    pub world_size: Vec3,
    pub gravity: f32,
    /// Sprite size in framebuffer pixels at unit view depth.
    pub point_size: f32,
}

/// Output of the vertex stage for one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedParticle {
    pub world: Vec3,
    pub clip: Vec4,
    /// Sprite diameter in framebuffer pixels.
    pub point_size: f32,
    /// Sprite rotation angle in radians.
    pub rotation: f32,
    pub opacity: f32,
}

/// GLSL-style `mod`: `x - y * floor(x / y)`, with the result kept in `[0, y)`.
#[inline]
pub fn glsl_mod(x: f32, y: f32) -> f32 {
    let r = x - y * (x / y).floor();
    // Rounding can land exactly on `y` for tiny negative `x`.
    if r >= y || r < 0.0 {
        0.0
    } else {
        r
    }
}

/// Fold `value` into `[-half_extent, half_extent)`.
#[inline]
pub fn wrap(value: f32, half_extent: f32) -> f32 {
    glsl_mod(value, half_extent * 2.0) - half_extent
}

/// World-space position of a particle at the given uniforms.
pub fn displace(p: &ParticleAttributes, u: &KernelUniforms) -> Vec3 {
    let t = u.elapsed_time;
    let mut pos = p.position;

    pos.x = wrap(pos.x + t + u.wind_current * p.speed.x, u.world_size.x);
    pos.y = wrap(pos.y - t * p.speed.y * u.gravity, u.world_size.y);

    let phase = t * p.speed.z;
    pos.x += phase.sin() * p.rotation.z;
    pos.z += phase.cos() * p.rotation.z;

    pos
}

/// Sprite spin angle at time `t`.
#[inline]
pub fn sprite_rotation(p: &ParticleAttributes, t: f32) -> f32 {
    p.rotation.x + t * p.rotation.y
}

/// Run the vertex stage for one particle.
pub fn project(p: &ParticleAttributes, u: &KernelUniforms, view: Mat4, proj: Mat4) -> ProjectedParticle {
    let world = displace(p, u);
    let view_pos = view * world.extend(1.0);
    let clip = proj * view_pos;
    ProjectedParticle {
        world,
        clip,
        point_size: u.point_size * p.scale / -view_pos.z,
        rotation: sprite_rotation(p, u.elapsed_time),
        opacity: p.opacity,
    }
}

/// Rotate a point-sprite coordinate (`[0, 1]` square) about its centre.
pub fn rotate_sprite_coord(coord: Vec2, angle: f32) -> Vec2 {
    let (s, c) = angle.sin_cos();
    let d = coord - Vec2::splat(0.5);
    Vec2::new(c * d.x + s * d.y + 0.5, c * d.y - s * d.x + 0.5)
}

/// Final fragment color from a sprite sample and the particle opacity.
#[inline]
pub fn shade(sprite: Vec4, opacity: f32) -> Vec4 {
    Vec4::new(sprite.x, sprite.y, sprite.z, sprite.w * opacity)
}

/// Evaluate every particle's world position.
pub fn displace_all(buffers: &ParticleBuffers, u: &KernelUniforms) -> Vec<Vec3> {
    buffers.iter().map(|p| displace(&p, u)).collect()
}
