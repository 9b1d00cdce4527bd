//! First-person shooter demo: enemies drift in on a timer, left click fires.

mod camera;

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};

use volley_engine::core::{App, AppControl, FrameCtx};
use volley_engine::device::GpuInit;
use volley_engine::input::{Key, MouseButton};
use volley_engine::logging::{init_logging, LoggingConfig};
use volley_engine::paint::Color;
use volley_engine::render::meshes::{
    EnemyInstance, EnemyRenderer, ProjectileInstance, ProjectileRenderer, SphereMesh,
};
use volley_engine::window::{Runtime, RuntimeConfig};
use volley_sim::{SimConfig, World};

use camera::FlyCamera;

const TITLE: &str = "Volley - Shooter";
const SEED_VAR: &str = "VOLLEY_SEED";
/// Dark blue, given in sRGB so it matches the value a plain GL clear would show.
fn background() -> Color {
    Color::from_srgb(0.0, 0.0, 0.4)
}

struct ShooterApp {
    world: World,
    camera: FlyCamera,

    enemies: EnemyRenderer,
    projectiles: ProjectileRenderer,

    enemy_instances: Vec<EnemyInstance>,
    projectile_instances: Vec<ProjectileInstance>,
}

impl ShooterApp {
    fn new(world: World) -> Self {
        Self {
            world,
            camera: FlyCamera::default(),
            enemies: EnemyRenderer::new(),
            projectiles: ProjectileRenderer::new(SphereMesh::default()),
            enemy_instances: Vec::new(),
            projectile_instances: Vec::new(),
        }
    }

    fn collect_instances(&mut self) {
        self.enemy_instances.clear();
        self.enemy_instances.extend(
            self.world
                .enemies()
                .iter()
                .map(|e| EnemyInstance::new(e.position, e.rotation)),
        );

        self.projectile_instances.clear();
        self.projectile_instances.extend(
            self.world
                .projectiles()
                .iter()
                .map(|p| ProjectileInstance::new(p.position)),
        );
    }
}

impl App for ShooterApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }

        let dt = ctx.time.dt;
        self.camera.update(ctx.input, ctx.input_frame, dt);
        let pose = self.camera.pose();

        if ctx.input_frame.button_released(MouseButton::Left) {
            self.world.fire(pose);
        }

        let report = self.world.step(dt, pose);
        if report.kills > 0 {
            let total = self.world.killed();
            log::info!("enemy destroyed (+{}), {total} total", report.kills);
            ctx.runtime
                .set_title(ctx.window.id, format!("{TITLE} - {total} kills"));
        }

        self.collect_instances();

        let vp = self.camera.view_proj(ctx.window.viewport().aspect());
        let enemies = &mut self.enemies;
        let projectiles = &mut self.projectiles;
        let enemy_instances = &self.enemy_instances;
        let projectile_instances = &self.projectile_instances;

        ctx.render(background(), |rctx, target| {
            enemies.render(rctx, target, vp, enemy_instances);
            projectiles.render(rctx, target, vp, projectile_instances);
        })
    }
}

/// `VOLLEY_SEED` if set and valid, otherwise the wall clock.
fn seed_from_env() -> u64 {
    if let Ok(raw) = std::env::var(SEED_VAR) {
        match raw.trim().parse::<u64>() {
            Ok(seed) => return seed,
            Err(err) => log::warn!("ignoring {SEED_VAR}={raw:?}: {err}"),
        }
    }

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default()
}

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let seed = seed_from_env();
    log::info!("starting shooter with seed {seed}");

    let world = World::new(SimConfig::default(), seed).context("invalid simulation config")?;

    Runtime::run(
        RuntimeConfig {
            title: TITLE.to_string(),
            grab_cursor: true,
            ..RuntimeConfig::default()
        },
        GpuInit::default(),
        ShooterApp::new(world),
    )
}
