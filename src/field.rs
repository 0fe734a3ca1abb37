//! Particle field generation.
//!
//! A field is a fixed set of per-particle attributes, stored as parallel
//! arrays that always share the same length. Nothing in the render loop
//! writes to a field after it is generated; motion comes entirely from the
//! displacement kernel evaluated against the per-frame uniforms.
//!
//! ```ignore
//! let mut rng = rand::thread_rng();
//! let field = ParticleBuffers::generate(25_600, &SnowConfig::default(), &mut rng);
//! assert_eq!(field.scales().len(), 25_600);
//! ```

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use rand::Rng;

use crate::config::SnowConfig;

/// Side length of the cube initial positions are sampled from.
pub const SPAWN_CUBE_SIZE: f32 = 12.0;

/// Interleaved per-particle data as uploaded to the GPU.
///
/// Layout matches the vertex attributes declared in `snow.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SnowVertex {
    pub position: [f32; 3],
    pub opacity: f32,
    pub speed: [f32; 3],
    pub scale: f32,
    pub rotation: [f32; 3],
    pub _pad: f32,
}

/// Read-only view of one particle's attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleAttributes {
    pub position: Vec3,
    pub randomness: Vec3,
    pub opacity: f32,
    pub scale: f32,
    pub speed: Vec3,
    pub rotation: Vec3,
}

/// Static attribute buffers for every particle in the field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParticleBuffers {
    positions: Vec<Vec3>,
    randomness: Vec<Vec3>,
    opacities: Vec<f32>,
    scales: Vec<f32>,
    speeds: Vec<Vec3>,
    rotations: Vec<Vec3>,
}

impl ParticleBuffers {
    /// Generate `count` particles using the ranges in `config`.
    ///
    /// A count of zero yields a valid, empty field.
    pub fn generate<R: Rng>(count: u32, config: &SnowConfig, rng: &mut R) -> Self {
        let n = count as usize;
        let mut buffers = Self {
            positions: Vec::with_capacity(n),
            randomness: Vec::with_capacity(n),
            opacities: Vec::with_capacity(n),
            scales: Vec::with_capacity(n),
            speeds: Vec::with_capacity(n),
            rotations: Vec::with_capacity(n),
        };

        for _ in 0..n {
            buffers.positions.push(Vec3::new(
                (rng.gen::<f32>() - 0.5) * SPAWN_CUBE_SIZE,
                (rng.gen::<f32>() - 0.5) * SPAWN_CUBE_SIZE,
                (rng.gen::<f32>() - 0.5) * SPAWN_CUBE_SIZE,
            ));

            buffers.randomness.push(Vec3::new(
                random_offset(rng, config.randomness, config.randomness_power),
                random_offset(rng, config.randomness, config.randomness_power),
                random_offset(rng, config.randomness, config.randomness_power),
            ));

            buffers
                .opacities
                .push(sample_range(rng, config.opacity_min, config.opacity_max));
            buffers
                .scales
                .push(sample_range(rng, config.size_min, config.size_max));

            buffers.speeds.push(Vec3::new(
                1.0 + rng.gen::<f32>(),
                rng.gen::<f32>() * 0.01 + 0.05,
                rng.gen::<f32>() * 0.15 + 0.05,
            ));

            buffers.rotations.push(Vec3::new(
                rng.gen::<f32>() * TAU,
                rng.gen::<f32>() * 20.0,
                rng.gen::<f32>() * 10.0,
            ));
        }

        buffers
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Per-axis signed offsets. Kept with the field but not read by the kernel.
    #[inline]
    pub fn randomness(&self) -> &[Vec3] {
        &self.randomness
    }

    #[inline]
    pub fn opacities(&self) -> &[f32] {
        &self.opacities
    }

    #[inline]
    pub fn scales(&self) -> &[f32] {
        &self.scales
    }

    #[inline]
    pub fn speeds(&self) -> &[Vec3] {
        &self.speeds
    }

    #[inline]
    pub fn rotations(&self) -> &[Vec3] {
        &self.rotations
    }

    /// Attributes of particle `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<ParticleAttributes> {
        if index >= self.len() {
            return None;
        }
        Some(ParticleAttributes {
            position: self.positions[index],
            randomness: self.randomness[index],
            opacity: self.opacities[index],
            scale: self.scales[index],
            speed: self.speeds[index],
            rotation: self.rotations[index],
        })
    }

    /// Iterate over all particles in index order.
    pub fn iter(&self) -> impl Iterator<Item = ParticleAttributes> + '_ {
        (0..self.len()).filter_map(move |i| self.get(i))
    }

    /// Interleave the attributes the shader consumes into GPU vertices.
    pub fn to_vertices(&self) -> Vec<SnowVertex> {
        self.iter()
            .map(|p| SnowVertex {
                position: p.position.to_array(),
                opacity: p.opacity,
                speed: p.speed.to_array(),
                scale: p.scale,
                rotation: p.rotation.to_array(),
                _pad: 0.0,
            })
            .collect()
    }
}

/// Uniform sample in `[min, max]`.
fn sample_range<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    (rng.gen::<f32>() * (max - min) + min).min(max)
}

/// `u^power * factor`, negated half of the time.
fn random_offset<R: Rng>(rng: &mut R, factor: f32, power: f32) -> f32 {
    let magnitude = rng.gen::<f32>().powf(power);
    let sign = if rng.gen::<f32>() < 0.5 { 1.0 } else { -1.0 };
    magnitude * sign * factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn field(count: u32, config: &SnowConfig) -> ParticleBuffers {
        let mut rng = SmallRng::seed_from_u64(7);
        ParticleBuffers::generate(count, config, &mut rng)
    }

    #[test]
    fn test_arrays_are_index_aligned() {
        let buffers = field(500, &SnowConfig::default());
        assert_eq!(buffers.len(), 500);
        assert_eq!(buffers.randomness().len(), 500);
        assert_eq!(buffers.opacities().len(), 500);
        assert_eq!(buffers.scales().len(), 500);
        assert_eq!(buffers.speeds().len(), 500);
        assert_eq!(buffers.rotations().len(), 500);
        assert_eq!(buffers.to_vertices().len(), 500);
    }

    #[test]
    fn test_opacity_and_scale_within_ranges() {
        let config = SnowConfig::default()
            .with_size_range(2.0, 3.0)
            .with_opacity_range(0.25, 0.3);
        let buffers = field(2_000, &config);
        for p in buffers.iter() {
            assert!((0.25..=0.3).contains(&p.opacity), "opacity {}", p.opacity);
            assert!((2.0..=3.0).contains(&p.scale), "scale {}", p.scale);
        }
    }

    #[test]
    fn test_attribute_ranges() {
        let config = SnowConfig::default();
        let buffers = field(2_000, &config);
        let half = SPAWN_CUBE_SIZE / 2.0;
        for p in buffers.iter() {
            assert!(p.position.abs().max_element() <= half);
            assert!((1.0..=2.0).contains(&p.speed.x));
            assert!((0.05..=0.0601).contains(&p.speed.y));
            assert!((0.05..=0.2001).contains(&p.speed.z));
            assert!((0.0..=TAU).contains(&p.rotation.x));
            assert!((0.0..=20.0).contains(&p.rotation.y));
            assert!((0.0..=10.0).contains(&p.rotation.z));
            assert!(p.randomness.abs().max_element() <= config.randomness);
        }
    }

    #[test]
    fn test_randomness_takes_both_signs() {
        let buffers = field(1_000, &SnowConfig::default());
        let negative = buffers.randomness().iter().filter(|r| r.x < 0.0).count();
        assert!(negative > 300 && negative < 700, "negative count {negative}");
    }

    #[test]
    fn test_zero_count_is_empty() {
        let buffers = field(0, &SnowConfig::default());
        assert!(buffers.is_empty());
        assert!(buffers.to_vertices().is_empty());
        assert!(buffers.get(0).is_none());
    }

    #[test]
    fn test_vertex_layout() {
        assert_eq!(std::mem::size_of::<SnowVertex>(), 48);
        let buffers = field(1, &SnowConfig::default());
        let v = buffers.to_vertices()[0];
        let p = buffers.get(0).unwrap();
        assert_eq!(v.position, p.position.to_array());
        assert_eq!(v.opacity, p.opacity);
        assert_eq!(v.rotation, p.rotation.to_array());
    }
}
