//! Snowflake sprite image.
//!
//! The sprite is sampled by the fragment stage at a rotated point
//! coordinate. Loading it can fail (missing file, corrupt data); that is
//! never fatal. [`SpriteImage::load_or_transparent`] logs the problem and
//! returns a fully transparent sprite, so the field keeps animating but
//! draws nothing.

use std::borrow::Cow;
use std::f32::consts::{PI, TAU};
use std::path::Path;

use log::warn;

use crate::config::SpriteSource;
use crate::error::TextureError;

/// Edge length of the generated sprite.
pub const PROCEDURAL_SIZE: u32 = 64;

/// RGBA8 sprite pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteImage {
    /// Raw RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl SpriteImage {
    /// Wrap raw RGBA data.
    ///
    /// Returns `None` if `data` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 || data.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self { data, width, height })
    }

    /// Decode a PNG or JPEG file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_bytes(&bytes)
    }

    /// Decode an in-memory PNG or JPEG image.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?.into_rgba8();
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty);
        }
        Ok(Self {
            data: img.into_raw(),
            width,
            height,
        })
    }

    /// A single fully transparent pixel.
    pub fn transparent() -> Self {
        Self {
            data: vec![0, 0, 0, 0],
            width: 1,
            height: 1,
        }
    }

    /// A soft six-armed flake on a transparent background.
    pub fn procedural(size: u32) -> Self {
        let size = size.max(2);
        let mut data = Vec::with_capacity((size * size * 4) as usize);
        let half = size as f32 / 2.0;

        for y in 0..size {
            for x in 0..size {
                let dx = (x as f32 + 0.5 - half) / half;
                let dy = (y as f32 + 0.5 - half) / half;
                let alpha = flake_coverage(dx, dy);
                data.extend_from_slice(&[255, 255, 255, (alpha * 255.0).round() as u8]);
            }
        }

        Self {
            data,
            width: size,
            height: size,
        }
    }

    /// Resolve a sprite source.
    pub fn load(source: &SpriteSource) -> Result<Self, TextureError> {
        match source {
            SpriteSource::Procedural => Ok(Self::procedural(PROCEDURAL_SIZE)),
            SpriteSource::File(path) => Self::from_file(path),
            SpriteSource::Bytes(bytes) => Self::from_bytes(bytes),
        }
    }

    /// Resolve a sprite source, falling back to a transparent sprite.
    pub fn load_or_transparent(source: &SpriteSource) -> Self {
        Self::load(source).unwrap_or_else(|e| {
            warn!("Snowflake sprite unavailable, particles will be invisible: {}", e);
            Self::transparent()
        })
    }

    /// Shrink the sprite so neither side exceeds `max_dimension`, keeping
    /// its aspect ratio. Sprites that already fit are borrowed unchanged.
    pub fn fit_within(&self, max_dimension: u32) -> Cow<'_, Self> {
        let max_dimension = max_dimension.max(1);
        let longest = self.width.max(self.height);
        if longest <= max_dimension {
            return Cow::Borrowed(self);
        }

        let scaled = |side: u32| ((side as u64 * max_dimension as u64) / longest as u64).max(1) as u32;
        let (width, height) = (scaled(self.width), scaled(self.height));
        warn!(
            "Snowflake sprite {}x{} exceeds the {} px texture limit, downscaling to {}x{}",
            self.width, self.height, max_dimension, width, height
        );

        match image::RgbaImage::from_raw(self.width, self.height, self.data.clone()) {
            Some(img) => {
                let resized = image::imageops::resize(&img, width, height, image::imageops::FilterType::Triangle);
                Cow::Owned(Self {
                    data: resized.into_raw(),
                    width,
                    height,
                })
            }
            None => Cow::Owned(Self::transparent()),
        }
    }

    /// Alpha of the pixel at `(x, y)`.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 4 + 3) as usize;
        self.data.get(idx).copied()
    }

    /// Whether every pixel has zero alpha.
    pub fn is_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }
}

/// Coverage of the flake at normalized coordinates (`[-1, 1]` square).
fn flake_coverage(dx: f32, dy: f32) -> f32 {
    let r = (dx * dx + dy * dy).sqrt();
    if r >= 1.0 {
        return 0.0;
    }

    // Distance to the nearest of six arms, spaced 60 degrees apart.
    let angle = dy.atan2(dx).rem_euclid(TAU);
    let sector = PI / 3.0;
    let offset = (angle + sector / 2.0).rem_euclid(sector) - sector / 2.0;
    let arm_distance = (r * offset.sin()).abs();

    let arm = (1.0 - arm_distance / 0.08).clamp(0.0, 1.0) * (1.0 - r);
    let core = (1.0 - r / 0.35).clamp(0.0, 1.0);
    arm.max(core).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_procedural_shape() {
        let sprite = SpriteImage::procedural(64);
        assert_eq!(sprite.data.len(), 64 * 64 * 4);
        // Solid centre, empty corners.
        assert!(sprite.alpha_at(32, 32).unwrap() > 200);
        assert_eq!(sprite.alpha_at(0, 0), Some(0));
        assert_eq!(sprite.alpha_at(63, 63), Some(0));
        assert!(!sprite.is_transparent());
    }

    #[test]
    fn test_transparent_fallback() {
        let sprite = SpriteImage::load_or_transparent(&SpriteSource::File("/no/such/flake.png".into()));
        assert_eq!(sprite, SpriteImage::transparent());
        assert!(sprite.is_transparent());
    }

    #[test]
    fn test_corrupt_bytes_fail() {
        let err = SpriteImage::load(&SpriteSource::Bytes(vec![1, 2, 3, 4])).unwrap_err();
        assert!(matches!(err, TextureError::ImageLoad(_)));
    }

    #[test]
    fn test_png_round_trip_through_bytes() {
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([10, 20, 30, 40]));
        let mut png = std::io::Cursor::new(Vec::new());
        img.write_to(&mut png, image::ImageFormat::Png).unwrap();

        let sprite = SpriteImage::from_bytes(png.get_ref()).unwrap();
        assert_eq!((sprite.width, sprite.height), (4, 2));
        assert_eq!(sprite.alpha_at(3, 1), Some(40));
    }

    #[test]
    fn test_oversized_sprite_is_downscaled() {
        let wide = SpriteImage::from_rgba(vec![255; 9000 * 64 * 4], 9000, 64).unwrap();
        let fitted = wide.fit_within(8192);
        assert!(matches!(fitted, Cow::Owned(_)));
        assert_eq!((fitted.width, fitted.height), (8192, 58));
        assert_eq!(fitted.data.len(), 8192 * 58 * 4);
        assert!(fitted.alpha_at(4000, 30).unwrap() > 250);

        let tall = SpriteImage::from_rgba(vec![0; 10 * 100 * 4], 10, 100).unwrap();
        let fitted = tall.fit_within(50);
        assert_eq!((fitted.width, fitted.height), (5, 50));
    }

    #[test]
    fn test_sprite_within_limit_is_borrowed() {
        let sprite = SpriteImage::procedural(64);
        assert!(matches!(sprite.fit_within(64), Cow::Borrowed(_)));
        assert!(matches!(sprite.fit_within(8192), Cow::Borrowed(_)));
    }

    #[test]
    fn test_from_rgba_checks_size() {
        assert!(SpriteImage::from_rgba(vec![0; 16], 2, 2).is_some());
        assert!(SpriteImage::from_rgba(vec![0; 15], 2, 2).is_none());
        assert!(SpriteImage::from_rgba(Vec::new(), 0, 0).is_none());
    }
}
