use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget};

use super::common::{premul_alpha_blend, triangle_list, CameraBinding, GrowBuffer};

/// A flat-coloured world-space triangle.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Triangle {
    pub corners: [Vec3; 3],
    pub color: Color,
}

impl Triangle {
    #[inline]
    pub const fn new(a: Vec3, b: Vec3, c: Vec3, color: Color) -> Self {
        Self { corners: [a, b, c], color }
    }
}

/// Draws flat triangles in submission order, alpha-blended, without depth.
///
/// Later triangles blend over earlier ones, so translucent fills should come last.
#[derive(Default)]
pub struct TriangleRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    camera: Option<CameraBinding>,
    vertices: Option<GrowBuffer>,
}

impl TriangleRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_proj: Mat4,
        triangles: &[Triangle],
    ) {
        if triangles.is_empty() {
            return;
        }

        self.ensure_pipeline(ctx);

        let verts: Vec<TriangleVertex> = triangles
            .iter()
            .flat_map(|t| {
                t.color.debug_assert_premul();
                let color = t.color.to_array();
                t.corners.map(|p| TriangleVertex { position: p.to_array(), color })
            })
            .collect();

        let Some(camera) = self.camera.as_ref() else { return };
        camera.write(ctx, view_proj);

        let vbo = self
            .vertices
            .get_or_insert_with(|| GrowBuffer::new("volley triangle vbo"));
        let Some(vbo) = vbo.upload(ctx, &verts) else { return };

        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.begin_load_pass("volley triangle pass", false);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &camera.bind_group, &[]);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..verts.len() as u32, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("volley triangle shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/triangle.wgsl").into()),
        });

        let camera = CameraBinding::new(ctx, "volley triangle camera");

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("volley triangle pipeline layout"),
                bind_group_layouts: &[&camera.layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("volley triangle pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[TriangleVertex::layout()],
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
            depth_stencil: None,
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
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct TriangleVertex {
    position: [f32; 3],
    color: [f32; 4],
}

impl TriangleVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x4  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TriangleVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
