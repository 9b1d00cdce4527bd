//! Shared GPU types and utilities used by the mesh renderers.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::render::RenderCtx;

// ── blend / depth ─────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

/// Standard depth test: keep the fragment closer to the camera.
pub(super) fn depth_less(format: wgpu::TextureFormat) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format,
        depth_write_enabled: true,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}

pub(super) fn triangle_list() -> wgpu::PrimitiveState {
    wgpu::PrimitiveState {
        topology: wgpu::PrimitiveTopology::TriangleList,
        strip_index_format: None,
        front_face: wgpu::FrontFace::Ccw,
        // The enemy mesh mixes windings; draw both faces.
        cull_mode: None,
        polygon_mode: wgpu::PolygonMode::Fill,
        unclipped_depth: false,
        conservative: false,
    }
}

// ── camera uniform ────────────────────────────────────────────────────────

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Camera UBO + bind group at `@group(0) @binding(0)`, visible to the vertex stage.
pub(super) struct CameraBinding {
    pub layout: wgpu::BindGroupLayout,
    pub bind_group: wgpu::BindGroup,
    ubo: wgpu::Buffer,
}

impl CameraBinding {
    pub(super) fn new(ctx: &RenderCtx<'_>, label: &str) -> Self {
        let layout = ctx
            .device
            .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(label),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<CameraUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<CameraUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        Self { layout, bind_group, ubo }
    }

    pub(super) fn write(&self, ctx: &RenderCtx<'_>, view_proj: Mat4) {
        let u = CameraUniform { view_proj: view_proj.to_cols_array_2d() };
        ctx.queue.write_buffer(&self.ubo, 0, bytemuck::bytes_of(&u));
    }
}

// ── growable vertex buffer ────────────────────────────────────────────────

const MIN_CAPACITY: usize = 64;

/// Capacity (in elements) for a buffer that must hold `required` elements.
pub(super) fn grown_capacity(required: usize) -> usize {
    required.next_power_of_two().max(MIN_CAPACITY)
}

/// Vertex buffer that is reallocated to the next power of two when too small.
pub(super) struct GrowBuffer {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    capacity: usize,
}

impl GrowBuffer {
    pub(super) const fn new(label: &'static str) -> Self {
        Self { label, buffer: None, capacity: 0 }
    }

    /// Uploads `items`, growing the buffer first if needed.
    pub(super) fn upload<T: Pod>(&mut self, ctx: &RenderCtx<'_>, items: &[T]) -> Option<&wgpu::Buffer> {
        if items.len() > self.capacity || self.buffer.is_none() {
            let cap = grown_capacity(items.len());
            log::debug!("{}: growing to {} elements", self.label, cap);
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: (cap * std::mem::size_of::<T>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = cap;
        }

        let buffer = self.buffer.as_ref()?;
        if !items.is_empty() {
            ctx.queue.write_buffer(buffer, 0, bytemuck::cast_slice(items));
        }
        Some(buffer)
    }
}
