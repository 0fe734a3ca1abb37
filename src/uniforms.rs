//! Uniform values shared by every particle in a frame.
//!
//! The render loop is the only writer. It fills a [`FrameUniforms`] after
//! advancing the wind and hands the packed [`SnowUniforms`] to the renderer
//! before the draw is issued.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::camera::Camera;
use crate::config::SnowConfig;
use crate::kernel::KernelUniforms;

/// Per-frame values owned by the render loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameUniforms {
    pub elapsed_time: f32,
    pub wind_current: f32,
    pub world_size: Vec3,
    pub gravity: f32,
    /// Base sprite size already multiplied by the renderer pixel ratio.
    pub point_size: f32,
}

impl FrameUniforms {
    pub fn new(config: &SnowConfig, pixel_ratio: f32) -> Self {
        Self {
            elapsed_time: 0.0,
            wind_current: 0.0,
            world_size: config.world_size(),
            gravity: config.gravity,
            point_size: config.point_size * pixel_ratio,
        }
    }

    /// Values consumed by the displacement kernel.
    pub fn kernel(&self) -> KernelUniforms {
        KernelUniforms {
            elapsed_time: self.elapsed_time,
            wind_current: self.wind_current,
            world_size: self.world_size,
            gravity: self.gravity,
            point_size: self.point_size,
        }
    }

    /// Pack for upload, together with the camera transforms and the
    /// framebuffer size in physical pixels.
    pub fn pack(&self, camera: &Camera, framebuffer: (u32, u32)) -> SnowUniforms {
        SnowUniforms {
            view: camera.view_matrix().to_cols_array_2d(),
            projection: camera.projection_matrix().to_cols_array_2d(),
            world_size: self.world_size.to_array(),
            time: self.elapsed_time,
            wind: self.wind_current,
            gravity: self.gravity,
            point_size: self.point_size,
            _pad0: 0.0,
            viewport: [framebuffer.0.max(1) as f32, framebuffer.1.max(1) as f32],
            _pad1: [0.0; 2],
        }
    }
}

/// GPU layout of the `SnowUniforms` struct in `snow.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct SnowUniforms {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub world_size: [f32; 3],
    pub time: f32,
    pub wind: f32,
    pub gravity: f32,
    pub point_size: f32,
    pub _pad0: f32,
    pub viewport: [f32; 2],
    pub _pad1: [f32; 2],
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_is_uniform_aligned() {
        assert_eq!(std::mem::size_of::<SnowUniforms>(), 176);
        assert_eq!(std::mem::size_of::<SnowUniforms>() % 16, 0);
    }

    #[test]
    fn test_point_size_includes_pixel_ratio() {
        let uniforms = FrameUniforms::new(&SnowConfig::default(), 2.0);
        assert_eq!(uniforms.point_size, 60.0);
        assert_eq!(uniforms.world_size, Vec3::splat(6.0));
    }

    #[test]
    fn test_pack_carries_time_and_wind() {
        let mut uniforms = FrameUniforms::new(&SnowConfig::default(), 1.0);
        uniforms.elapsed_time = 4.5;
        uniforms.wind_current = -12.0;
        let camera = Camera::new(4.0 / 3.0);
        let packed = uniforms.pack(&camera, (800, 600));
        assert_eq!(packed.time, 4.5);
        assert_eq!(packed.wind, -12.0);
        assert_eq!(packed.viewport, [800.0, 600.0]);
        assert_eq!(packed.projection, camera.projection_matrix().to_cols_array_2d());
    }
}
