//! WGSL source for the snowfall render pipeline.

/// Vertex + fragment shader, entry points `vs_main` and `fs_main`.
pub const SNOW_SHADER: &str = include_str!("snow.wgsl");

/// Vertices emitted per particle (two triangles).
pub const VERTICES_PER_PARTICLE: u32 = 6;
