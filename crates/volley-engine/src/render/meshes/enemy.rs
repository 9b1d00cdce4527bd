use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};

use super::common::{depth_less, premul_alpha_blend, triangle_list, CameraBinding, GrowBuffer};

/// Per-enemy GPU data: world position and orientation (quaternion `xyzw`).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct EnemyInstance {
    pub position: [f32; 3],
    pub rotation: [f32; 4],
}

impl EnemyInstance {
    #[inline]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position: position.to_array(), rotation: rotation.to_array() }
    }

    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        2 => Float32x3, // position
        3 => Float32x4  // rotation
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<EnemyInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRS,
        }
    }
}

/// Instanced octahedron renderer.
///
/// Every instance shares the same mesh and per-vertex colours; the vertex
/// shader rotates by the instance quaternion and then translates.
#[derive(Default)]
pub struct EnemyRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    camera: Option<CameraBinding>,
    mesh_vbo: Option<wgpu::Buffer>,
    instances: Option<GrowBuffer>,
}

impl EnemyRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws one octahedron per instance, depth-tested.
    ///
    /// Instances are drawn in the given order (callers sort far-to-near).
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        view_proj: Mat4,
        instances: &[EnemyInstance],
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
            .get_or_insert_with(|| GrowBuffer::new("volley enemy instance vbo"));
        let Some(ibo) = ibo.upload(ctx, instances) else { return };

        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.begin_load_pass("volley enemy pass", true);
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, &camera.bind_group, &[]);
        rpass.set_vertex_buffer(0, mesh.slice(..));
        rpass.set_vertex_buffer(1, ibo.slice(..));
        rpass.draw(0..OCTAHEDRON_VERTEX_COUNT, 0..instances.len() as u32);
    }

    fn ensure_static_buffers(&mut self, ctx: &RenderCtx<'_>) {
        if self.mesh_vbo.is_some() {
            return;
        }

        self.mesh_vbo = Some(ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("volley enemy mesh vbo"),
            contents: bytemuck::cast_slice(&octahedron()),
            usage: wgpu::BufferUsages::VERTEX,
        }));
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("volley enemy shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/enemy.wgsl").into()),
        });

        let camera = CameraBinding::new(ctx, "volley enemy camera");

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("volley enemy pipeline layout"),
                bind_group_layouts: &[&camera.layout],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("volley enemy pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[EnemyVertex::layout(), EnemyInstance::layout()],
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
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct EnemyVertex {
    position: [f32; 3],
    color: [f32; 3],
}

impl EnemyVertex {
    const ATTRS: [wgpu::VertexAttribute; 2] = wgpu::vertex_attr_array![
        0 => Float32x3, // position
        1 => Float32x3  // color
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<EnemyVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

const OCTAHEDRON_VERTEX_COUNT: u32 = 24;

/// Eight faces around the apexes `(0, ±1, 0)` with an equator at `(±1, 0, ±1)`.
/// Upper faces share a lilac apex, lower faces a cyan one.
fn octahedron() -> [EnemyVertex; OCTAHEDRON_VERTEX_COUNT as usize] {
    const EQUATOR: [([f32; 3], [f32; 3]); 4] = [
        ([-1.0, 0.0, -1.0], [-1.0, 0.0, 1.0]),
        ([-1.0, 0.0, -1.0], [1.0, 0.0, -1.0]),
        ([1.0, 0.0, 1.0], [1.0, 0.0, -1.0]),
        ([1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]),
    ];
    const EDGE_COLORS: [[f32; 3]; 2] = [[0.3, 0.0, 0.1], [0.05, 0.1, 0.6]];
    const TOP: ([f32; 3], [f32; 3]) = ([0.0, 1.0, 0.0], [0.8, 0.6, 1.0]);
    const BOTTOM: ([f32; 3], [f32; 3]) = ([0.0, -1.0, 0.0], [0.08, 0.6, 0.85]);

    let mut out = [EnemyVertex { position: [0.0; 3], color: [0.0; 3] }; OCTAHEDRON_VERTEX_COUNT as usize];
    for (half, (apex, apex_color)) in [TOP, BOTTOM].into_iter().enumerate() {
        for (face, (a, b)) in EQUATOR.into_iter().enumerate() {
            let i = (half * 4 + face) * 3;
            out[i] = EnemyVertex { position: apex, color: apex_color };
            out[i + 1] = EnemyVertex { position: a, color: EDGE_COLORS[0] };
            out[i + 2] = EnemyVertex { position: b, color: EDGE_COLORS[1] };
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octahedron_faces_touch_an_apex() {
        let verts = octahedron();
        for tri in verts.chunks(3) {
            assert_eq!(tri[0].position[0], 0.0);
            assert_eq!(tri[0].position[1].abs(), 1.0);
            assert_eq!(tri[1].position[1], 0.0);
            assert_eq!(tri[2].position[1], 0.0);
        }
    }

    #[test]
    fn upper_and_lower_halves_split_evenly() {
        let verts = octahedron();
        let upper = verts.chunks(3).filter(|t| t[0].position[1] > 0.0).count();
        assert_eq!(upper, 4);
    }

    #[test]
    fn instance_layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<EnemyInstance>(), 28);
        let i = EnemyInstance::new(Vec3::new(1.0, 2.0, 3.0), Quat::IDENTITY);
        assert_eq!(i.rotation, [0.0, 0.0, 0.0, 1.0]);
    }
}
