//! Error types for snowfall.
//!
//! Setup errors are fatal and stop construction before anything animates.
//! Texture errors are recoverable: the sprite falls back to a transparent
//! texture. Per-frame render errors are handled by the window loop.

use std::fmt;
use std::path::PathBuf;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
    /// The surface reported no supported formats for this adapter.
    UnsupportedSurface,
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
            GpuError::UnsupportedSurface => write!(f, "Surface is not supported by the selected adapter"),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur while loading the snowflake sprite.
#[derive(Debug)]
pub enum TextureError {
    /// Failed to decode image data.
    ImageLoad(image::ImageError),
    /// Failed to read file from disk.
    Io(std::io::Error),
    /// Decoded image has a zero dimension.
    Empty,
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::ImageLoad(e) => write!(f, "Failed to load image: {}", e),
            TextureError::Io(e) => write!(f, "Failed to read texture file: {}", e),
            TextureError::Empty => write!(f, "Texture has zero width or height"),
        }
    }
}

impl std::error::Error for TextureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TextureError::ImageLoad(e) => Some(e),
            TextureError::Io(e) => Some(e),
            TextureError::Empty => None,
        }
    }
}

impl From<image::ImageError> for TextureError {
    fn from(e: image::ImageError) -> Self {
        TextureError::ImageLoad(e)
    }
}

impl From<std::io::Error> for TextureError {
    fn from(e: std::io::Error) -> Self {
        TextureError::Io(e)
    }
}

/// Errors that can occur when loading or validating configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    Io(PathBuf, std::io::Error),
    /// Configuration is not valid JSON for [`SnowConfig`](crate::SnowConfig).
    Parse(serde_json::Error),
    /// A value is outside its allowed range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Failed to read config '{}': {}", path.display(), e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(_, e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Fatal errors raised while bringing the snowfall up.
///
/// No frame is rendered if any of these occur.
#[derive(Debug)]
pub enum SetupError {
    /// Failed to create event loop.
    EventLoop(winit::error::EventLoopError),
    /// The drawable surface (window) could not be created.
    SurfaceNotFound(String),
    /// GPU initialization failed.
    Gpu(GpuError),
    /// Configuration could not be loaded.
    Config(ConfigError),
}

impl fmt::Display for SetupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetupError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            SetupError::SurfaceNotFound(msg) => write!(f, "Drawable surface not found: {}", msg),
            SetupError::Gpu(e) => write!(f, "GPU error: {}", e),
            SetupError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SetupError::EventLoop(e) => Some(e),
            SetupError::SurfaceNotFound(_) => None,
            SetupError::Gpu(e) => Some(e),
            SetupError::Config(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for SetupError {
    fn from(e: winit::error::EventLoopError) -> Self {
        SetupError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for SetupError {
    fn from(e: winit::error::OsError) -> Self {
        SetupError::SurfaceNotFound(e.to_string())
    }
}

impl From<GpuError> for SetupError {
    fn from(e: GpuError) -> Self {
        SetupError::Gpu(e)
    }
}

impl From<ConfigError> for SetupError {
    fn from(e: ConfigError) -> Self {
        SetupError::Config(e)
    }
}

/// Errors from a single frame.
#[derive(Debug)]
pub enum RenderError {
    /// The swapchain surface could not provide a frame.
    Surface(wgpu::SurfaceError),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Surface(e) => write!(f, "Surface error: {}", e),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Surface(e) => Some(e),
        }
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        RenderError::Surface(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_surface_not_found_message() {
        let err = SetupError::SurfaceNotFound("no window".into());
        assert_eq!(err.to_string(), "Drawable surface not found: no window");
        assert!(err.source().is_none());
    }

    #[test]
    fn test_config_error_chains_source() {
        let parse = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = SetupError::from(ConfigError::from(parse));
        assert!(err.to_string().starts_with("Configuration error"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_texture_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = TextureError::from(io);
        assert!(err.to_string().contains("gone"));
    }
}
