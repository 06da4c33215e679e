//! Off-screen color buffers.

use crate::gpu::GpuContext;

/// An off-screen color buffer that can be rendered to and sampled from.
///
/// Created at a fixed size and resized explicitly; the texture carries both
/// `RENDER_ATTACHMENT` usage (written as a pass attachment) and
/// `TEXTURE_BINDING` usage (read back during compositing).
pub struct RenderTarget {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl RenderTarget {
    /// Allocates a target of the given size in the surface format.
    pub fn new(gpu: &GpuContext, width: u32, height: u32, label: &str) -> Self {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: gpu.config.format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    /// Reallocates the buffer at a new size. A call with the current size
    /// is a no-op, so resizing is idempotent.
    pub fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32, label: &str) {
        if (self.width, self.height) != (width, height) {
            *self = Self::new(gpu, width, height, label);
        }
    }

    /// Current size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
