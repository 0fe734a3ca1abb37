//! Host viewport description.

/// Upper bound on the pixel ratio used for rendering.
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Size of the drawable area as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
    /// Physical pixels per logical pixel.
    pub device_pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Width over height. A zero height reports an aspect of 1.
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Pixel ratio the renderer should use, capped at [`MAX_PIXEL_RATIO`].
    pub fn pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio.clamp(f32::MIN_POSITIVE, MAX_PIXEL_RATIO)
    }

    /// Whether either dimension is zero (minimised window).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Build from a winit physical size and scale factor.
    pub fn from_physical(size: winit::dpi::PhysicalSize<u32>, scale_factor: f64) -> Self {
        let logical: winit::dpi::LogicalSize<u32> = size.to_logical(scale_factor);
        Self::new(logical.width, logical.height, scale_factor as f32)
    }
}

/// Number of particles for a viewport of the given logical width.
///
/// Density scales with screen width, so wider screens cost more GPU time.
pub fn particle_count(viewport_width: u32, count_density: u32) -> u32 {
    viewport_width.saturating_mul(count_density)
}
