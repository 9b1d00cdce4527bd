use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};

use super::common::{depth_less, premul_alpha_blend, triangle_list, CameraBinding, GrowBuffer};

/// Per-projectile GPU data.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ProjectileInstance {
    pub position: [f32; 3],
}

impl ProjectileInstance {
    #[inline]
    pub fn new(position: Vec3) -> Self {
        Self { position: position.to_array() }
    }

    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ProjectileInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Sphere tessellation used for the projectile mesh.
#[derive(Debug, Copy, Clone)]
pub struct SphereMesh {
    pub radius: f32,
    pub stacks: u32,
    pub slices: u32,
}

impl Default for SphereMesh {
    fn default() -> Self {
        Self { radius: 0.5, stacks: 12, slices: 24 }
    }
}

/// Instanced UV-sphere renderer with a procedural UV grid.
pub struct ProjectileRenderer {
    sphere: SphereMesh,
    vertex_count: u32,

    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    camera: Option<CameraBinding>,
    mesh_vbo: Option<wgpu::Buffer>,
    instances: Option<GrowBuffer>,
}

impl ProjectileRenderer {
    pub fn new(sphere: SphereMesh) -> Self {
        Self {
            sphere,
            vertex_count: 0,
            pipeline_format: None,
            pipeline: None,
            camera: None,
            mesh_vbo: None,
            instances: None,
        }
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_proj: Mat4,
        instances: &[ProjectileInstance],
    ) {
        if instances.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);
        self.ensure_static_buffers(ctx);

        let Some(camera) = self.camera.as_ref() else { return };
        camera.write(ctx, view_proj);

        let Some(mesh) = self.mesh_vbo.as_ref() else { return };

        let ibo = self
            .instances
            .get_or_insert_with(|| GrowBuffer::new("volley projectile instance vbo"));
        let Some(ibo) = ibo.upload(ctx, instances) else { return };

        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.begin_load_pass("volley projectile pass", true);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &camera.bind_group, &[]);
        rpass.set_vertex_buffer(0, mesh.slice(..));
        rpass.set_vertex_buffer(1, ibo.slice(..));
        rpass.draw(0..self.vertex_count, 0..instances.len() as u32);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.mesh_vbo.is_some() {
            return;
        }

        let verts = uv_sphere(self.sphere);
        self.vertex_count = verts.len() as u32;
        self.mesh_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("volley projectile mesh vbo"),
            contents: bytemuck::cast_slice(&verts),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("volley projectile shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/projectile.wgsl").into()),
        });

        let camera = CameraBinding::new(ctx, "volley projectile camera");

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("volley projectile pipeline layout"),
                bind_group_layouts: &[&camera.layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("volley projectile pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[SphereVertex::layout(), ProjectileInstance::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: triangle_list(),
            depth_stencil: Some(depth_less(ctx.depth_format)),
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.camera = Some(camera);
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct SphereVertex {
    position: [f32; 3],
    uv: [f32; 2],
}

impl SphereVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x2  // uv
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Non-indexed triangle list for a UV sphere, two triangles per cell.
///
/// `u` runs around the equator, `v` from the north pole (0) to the south pole (1).
fn uv_sphere(mesh: SphereMesh) -> Vec<SphereVertex> {
    let stacks = mesh.stacks.max(2);
    let slices = mesh.slices.max(3);

    let point = |stack: u32, slice: u32| {
        let u = slice as f32 / slices as f32;
        let v = stack as f32 / stacks as f32;
        let theta = u * TAU;
        let phi = v * PI;
        let dir = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());
        SphereVertex { position: (dir * mesh.radius).to_array(), uv: [u, v] }
    };

    let mut out = Vec::with_capacity((stacks * slices * 6) as usize);
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = point(stack, slice);
            let b = point(stack + 1, slice);
            let c = point(stack + 1, slice + 1);
            let d = point(stack, slice + 1);
            out.extend_from_slice(&[a, b, c, a, c, d]);
        }
    }
    out
}
