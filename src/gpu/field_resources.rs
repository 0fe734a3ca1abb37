//! GPU resources owned by one generated field.

use wgpu::util::DeviceExt;

use crate::field::ParticleBuffers;
use crate::sprite::SpriteImage;

/// Vertex buffer, sprite texture and sprite bind group for one field.
pub(super) struct FieldResources {
    /// `None` for an empty field; nothing is drawn.
    pub vertex_buffer: Option<wgpu::Buffer>,
    pub texture: wgpu::Texture,
    pub bind_group: wgpu::BindGroup,
    pub count: u32,
}

impl FieldResources {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        field: &ParticleBuffers,
        sprite: &SpriteImage,
    ) -> Self {
        let vertices = field.to_vertices();
        let vertex_buffer = (!vertices.is_empty()).then(|| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Snow Vertex Buffer"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            })
        });

        let texture = upload_sprite(device, queue, sprite);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Sprite Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });

        Self {
            vertex_buffer,
            texture,
            bind_group,
            count: vertices.len() as u32,
        }
    }

    pub fn live_resources(&self) -> usize {
        // texture + bind group, plus the vertex buffer when present
        2 + usize::from(self.vertex_buffer.is_some())
    }

    /// Free GPU memory now rather than when the last reference drops.
    pub fn destroy(self) {
        if let Some(buffer) = &self.vertex_buffer {
            buffer.destroy();
        }
        self.texture.destroy();
    }
}

fn upload_sprite(device: &wgpu::Device, queue: &wgpu::Queue, sprite: &SpriteImage) -> wgpu::Texture {
    let size = wgpu::Extent3d {
        width: sprite.width,
        height: sprite.height,
        depth_or_array_layers: 1,
    };

    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Snowflake Sprite"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &texture,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &sprite.data,
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * sprite.width),
            rows_per_image: Some(sprite.height),
        },
        size,
    );

    texture
}
