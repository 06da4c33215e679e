//! GPU side of the transition: the render-target pair, the wipe pipeline,
//! and the [`SceneRenderer`] implementation the compositor drives.

use crate::camera::Camera;
use crate::compositor::{SceneId, SceneRenderer, TargetSlot};
use crate::gpu::GpuContext;
use crate::mesh_pass::MeshPass;
use crate::render_target::RenderTarget;
use crate::scene::{MeshLibrary, Scene};
use crate::wipe::WipeUniforms;

/// GPU layout of the uniform record, padded to a 16-byte multiple.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct RawWipeUniforms {
    aspect: f32,
    action: f32,
    time_start: f32,
    duration: f32,
    time: f32,
    _pad: [f32; 3],
}

impl From<&WipeUniforms> for RawWipeUniforms {
    fn from(u: &WipeUniforms) -> Self {
        Self {
            aspect: u.aspect(),
            action: u.action(),
            time_start: u.time_start(),
            duration: u.duration(),
            time: u.time(),
            _pad: [0.0; 3],
        }
    }
}

const TARGET_LABELS: [&str; 2] = ["Wipe Source Target", "Wipe Destination Target"];

/// Owns the off-screen target pair and the composite pipeline.
///
/// The uniform buffer is written from the CPU-side record every composite,
/// so the shader always sees the current state without any re-binding by
/// callers. The bind group references the target views and is rebuilt only
/// when the targets are reallocated on resize.
pub struct WipePass {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    targets: [RenderTarget; 2],
    bind_group: wgpu::BindGroup,
}

impl WipePass {
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Wipe Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/wipe.wgsl").into()),
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Wipe Uniforms"),
            size: std::mem::size_of::<RawWipeUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Wipe Sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Wipe Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Wipe Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Wipe Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: gpu.config.format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let targets = [
            RenderTarget::new(gpu, gpu.width(), gpu.height(), TARGET_LABELS[0]),
            RenderTarget::new(gpu, gpu.width(), gpu.height(), TARGET_LABELS[1]),
        ];
        let bind_group =
            Self::create_bind_group(gpu, &bind_group_layout, &uniform_buffer, &targets, &sampler);

        Self {
            pipeline,
            uniform_buffer,
            bind_group_layout,
            sampler,
            targets,
            bind_group,
        }
    }

    fn create_bind_group(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        targets: &[RenderTarget; 2],
        sampler: &wgpu::Sampler,
    ) -> wgpu::BindGroup {
        gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Wipe Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets[0].view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::TextureView(&targets[1].view),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        })
    }

    /// The color view backing one slot of the pair.
    pub fn target_view(&self, slot: TargetSlot) -> &wgpu::TextureView {
        &self.targets[slot.index()].view
    }

    /// Current size of the target pair in pixels.
    pub fn target_size(&self) -> (u32, u32) {
        self.targets[0].size()
    }

    /// Resizes both targets in lockstep and rebinds their views.
    pub fn resize(&mut self, gpu: &GpuContext, width: u32, height: u32) {
        if self.target_size() == (width, height) {
            return;
        }
        for (target, label) in self.targets.iter_mut().zip(TARGET_LABELS) {
            target.resize(gpu, width, height, label);
        }
        self.bind_group = Self::create_bind_group(
            gpu,
            &self.bind_group_layout,
            &self.uniform_buffer,
            &self.targets,
            &self.sampler,
        );
    }

    /// Uploads the uniform record and blends both targets onto `screen`.
    pub fn composite(
        &self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        screen: &wgpu::TextureView,
        uniforms: &WipeUniforms,
    ) {
        gpu.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&RawWipeUniforms::from(uniforms)),
        );

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Wipe Composite Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: screen,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..3, 0..1);
    }
}

/// Per-frame bundle implementing [`SceneRenderer`] against real wgpu
/// resources.
///
/// Lives only for the duration of one frame's command encoding; the
/// lifetimes tie every borrow to that frame.
pub struct GpuSceneRenderer<'a> {
    pub gpu: &'a GpuContext,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub screen: &'a wgpu::TextureView,
    pub wipe: &'a mut WipePass,
    pub mesh_pass: &'a mut MeshPass,
    pub meshes: &'a MeshLibrary,
    pub scenes: &'a [Scene; 2],
    pub camera: &'a Camera,
}

impl SceneRenderer for GpuSceneRenderer<'_> {
    fn render_scene(&mut self, scene: SceneId, slot: TargetSlot) {
        let target = &self.wipe.targets[slot.index()].view;
        self.mesh_pass.render(
            self.gpu,
            self.encoder,
            target,
            self.meshes,
            &self.scenes[scene.0],
            self.camera,
        );
    }

    fn composite(&mut self, uniforms: &WipeUniforms) {
        self.wipe
            .composite(self.gpu, self.encoder, self.screen, uniforms);
    }

    fn resize_targets(&mut self, width: u32, height: u32) {
        self.wipe.resize(self.gpu, width, height);
        self.mesh_pass.resize(self.gpu, width, height);
    }
}
