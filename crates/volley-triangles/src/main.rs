//! Two overlapping triangles seen from a camera orbiting the origin.

use anyhow::Result;
use glam::{Mat4, Vec3};

use volley_engine::core::{App, AppControl, FrameCtx};
use volley_engine::device::GpuInit;
use volley_engine::input::Key;
use volley_engine::logging::{init_logging, LoggingConfig};
use volley_engine::paint::Color;
use volley_engine::render::meshes::{Triangle, TriangleRenderer};
use volley_engine::window::{Runtime, RuntimeConfig};

const ORBIT_RADIUS: f32 = 1.5;
const FOV_Y_DEGREES: f32 = 90.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

/// Dark blue, given in sRGB so it matches the value a plain GL clear would show.
fn background() -> Color {
    Color::from_srgb(0.0, 0.0, 0.4)
}

struct TrianglesApp {
    renderer: TriangleRenderer,
    triangles: [Triangle; 2],
}

impl TrianglesApp {
    fn new() -> Self {
        let red = Triangle::new(
            Vec3::new(-0.5, -0.5, 0.0),
            Vec3::new(0.5, -0.5, 0.0),
            Vec3::new(0.0, 0.5, 0.0),
            Color::rgb(1.0, 0.0, 0.0),
        );
        let yellow = Triangle::new(
            Vec3::new(0.5, 0.5, 0.0),
            Vec3::new(-0.5, 0.5, 0.0),
            Vec3::new(0.0, -0.5, 0.0),
            Color::from_straight(1.0, 1.0, 0.0, 0.5),
        );

        Self {
            renderer: TriangleRenderer::new(),
            triangles: [red, yellow],
        }
    }
}

/// Eye position after `t` seconds: one radian per second around +Y.
fn orbit_eye(t: f32) -> Vec3 {
    Vec3::new(t.sin() * ORBIT_RADIUS, 0.0, t.cos() * ORBIT_RADIUS)
}

fn view_proj(t: f32, aspect: f32) -> Mat4 {
    let view = Mat4::look_at_rh(orbit_eye(t), Vec3::ZERO, Vec3::Y);
    let proj = Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR);
    proj * view
}

impl App for TrianglesApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let vp = view_proj(ctx.time.elapsed as f32, ctx.window.viewport().aspect());

        let renderer = &mut self.renderer;
        let triangles = &self.triangles;
        ctx.render(background(), |rctx, target| {
            renderer.render(rctx, target, vp, triangles);
        })
    }
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());
    log::info!("starting triangles demo");

    Runtime::run(
        RuntimeConfig {
            title: "Volley - Triangles".to_string(),
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        TrianglesApp::new(),
    )
}
