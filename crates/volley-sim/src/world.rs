use glam::Vec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::SimConfig;
use crate::enemy::Enemy;
use crate::error::ConfigError;
use crate::projectile::Projectile;
use crate::spawner::{random_enemy, SpawnTimer};

/// Camera position and view direction, as seen by the simulation.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub direction: Vec3,
}

impl CameraPose {
    #[inline]
    pub const fn new(position: Vec3, direction: Vec3) -> Self {
        Self { position, direction }
    }
}

/// Summary of one [`World::step`].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct StepReport {
    /// An enemy was spawned this step.
    pub spawned: bool,
    /// Enemies destroyed this step.
    pub kills: u32,
    /// Projectiles removed for flying out of range.
    pub culled: usize,
}

/// Both object pools plus everything needed to advance them.
pub struct World {
    config: SimConfig,
    rng: ChaCha8Rng,
    spawn_timer: SpawnTimer,

    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,

    killed: u32,
}

impl World {
    /// Creates an empty world. `seed` drives enemy placement.
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            spawn_timer: SpawnTimer::new(config.spawn_interval),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            killed: 0,
            config,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Enemies in draw order (far-to-near as of the last sort).
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Total enemies destroyed since creation.
    pub fn killed(&self) -> u32 {
        self.killed
    }

    /// Advances the world by one frame.
    ///
    /// Order: move projectiles, spawn, collide, drop destroyed objects, drop
    /// out-of-range projectiles, sort enemies for drawing.
    ///
    /// Negative or non-finite `dt` is treated as zero.
    pub fn step(&mut self, dt: f32, camera: CameraPose) -> StepReport {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };

        self.move_projectiles(dt);
        let spawned = self.tick_spawner(dt, camera.position);
        let kills = self.check_collisions();
        self.remove_destroyed();
        let culled = self.remove_far_projectiles(camera.position);
        self.sort_enemies(camera.position);

        StepReport { spawned, kills, culled }
    }

    pub fn move_projectiles(&mut self, dt: f32) {
        for p in &mut self.projectiles {
            p.advance(dt);
        }
    }

    /// Ticks the spawn countdown, spawning one enemy when it fires.
    pub fn tick_spawner(&mut self, dt: f32, camera_position: Vec3) -> bool {
        if self.spawn_timer.tick(dt, self.enemies.len(), self.config.max_enemies) {
            self.spawn_enemy(camera_position)
        } else {
            false
        }
    }

    /// Spawns one random enemy unless the pool is full, then re-sorts.
    pub fn spawn_enemy(&mut self, camera_position: Vec3) -> bool {
        if self.enemies.len() >= self.config.max_enemies {
            return false;
        }
        let enemy = random_enemy(&mut self.rng, camera_position, &self.config);
        log::debug!(
            "spawned enemy at ({:.1}, {:.1}, {:.1}), {} alive",
            enemy.position.x,
            enemy.position.y,
            enemy.position.z,
            self.enemies.len() + 1
        );
        self.enemies.push(enemy);
        self.sort_enemies(camera_position);
        true
    }

    /// Fires a projectile from the camera.
    ///
    /// Returns `false` when the projectile pool is full or the direction is
    /// degenerate.
    pub fn fire(&mut self, camera: CameraPose) -> bool {
        if self.projectiles.len() >= self.config.max_projectiles {
            log::debug!("projectile pool full ({}), shot dropped", self.config.max_projectiles);
            return false;
        }
        let Some(p) = Projectile::from_camera(
            camera.position,
            camera.direction,
            self.config.projectile_collider_radius,
            self.config.projectile_speed,
        ) else {
            return false;
        };
        log::debug!("fired projectile, {} in flight", self.projectiles.len() + 1);
        self.projectiles.push(p);
        true
    }

    /// Marks every overlapping live enemy/projectile pair as dead.
    ///
    /// A projectile that hits keeps testing the remaining enemies in the same
    /// pass, so one shot can take out a cluster of overlapping enemies.
    pub fn check_collisions(&mut self) -> u32 {
        let mut kills = 0;

        for proj in &mut self.projectiles {
            if !proj.alive {
                continue;
            }
            for enemy in &mut self.enemies {
                if !enemy.alive {
                    continue;
                }
                let dist = enemy.position.distance(proj.position);
                if dist <= enemy.collider_radius + proj.collider_radius {
                    enemy.alive = false;
                    proj.alive = false;
                    kills += 1;
                }
            }
        }

        self.killed += kills;
        kills
    }

    /// Drops dead objects from both pools, keeping survivor order.
    pub fn remove_destroyed(&mut self) {
        self.enemies.retain(|e| e.alive);
        self.projectiles.retain(|p| p.alive);
    }

    /// Drops projectiles at or beyond the despawn distance from the camera.
    pub fn remove_far_projectiles(&mut self, camera_position: Vec3) -> usize {
        let limit = self.config.despawn_distance;
        let before = self.projectiles.len();
        self.projectiles
            .retain(|p| p.position.distance(camera_position) < limit);
        before - self.projectiles.len()
    }

    /// Refreshes camera distances and sorts enemies far-to-near.
    pub fn sort_enemies(&mut self, camera_position: Vec3) {
        for e in &mut self.enemies {
            e.refresh_camera_distance(camera_position);
        }
        self.enemies.sort_by(Enemy::draw_order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORIGIN_FORWARD: CameraPose = CameraPose::new(Vec3::ZERO, Vec3::NEG_Z);

    fn world() -> World {
        World::new(SimConfig::default(), 3).unwrap()
    }

    fn enemy_at(pos: Vec3) -> Enemy {
        Enemy::new(pos, Vec3::Y, 0.0, 1.0, Vec3::ZERO)
    }

    fn shot_at(pos: Vec3) -> Projectile {
        Projectile { position: pos, alive: true, collider_radius: 0.5, direction: Vec3::NEG_Z, speed: 15.0 }
    }

    // ── construction ──────────────────────────────────────────────────────

    #[test]
    fn invalid_config_rejected() {
        let cfg = SimConfig { projectile_speed: 0.0, ..SimConfig::default() };
        assert!(World::new(cfg, 0).is_err());
    }

    #[test]
    fn huge_capacities_do_not_preallocate() {
        let cfg = SimConfig {
            max_enemies: usize::MAX,
            max_projectiles: usize::MAX,
            ..SimConfig::default()
        };
        let mut w = World::new(cfg, 0).unwrap();
        assert!(w.step(0.1, ORIGIN_FORWARD).spawned);
        assert!(w.fire(ORIGIN_FORWARD));
    }

    #[test]
    fn overflowing_radius_band_rejected() {
        let cfg = SimConfig { spawn_radius_min: i32::MAX, spawn_radius_span: 5, ..SimConfig::default() };
        assert_eq!(World::new(cfg, 0).err().map(|e| e.field), Some("spawn_radius_span"));
    }

    #[test]
    fn new_world_is_empty() {
        let w = world();
        assert!(w.enemies().is_empty());
        assert!(w.projectiles().is_empty());
        assert_eq!(w.killed(), 0);
    }

    // ── spawning ──────────────────────────────────────────────────────────

    #[test]
    fn first_step_spawns_one_enemy() {
        let mut w = world();
        let r = w.step(0.016, ORIGIN_FORWARD);
        assert!(r.spawned);
        assert_eq!(w.enemies().len(), 1);

        let r = w.step(0.016, ORIGIN_FORWARD);
        assert!(!r.spawned);
        assert_eq!(w.enemies().len(), 1);
    }

    #[test]
    fn spawns_every_interval_up_to_capacity() {
        let cfg = SimConfig { max_enemies: 3, ..SimConfig::default() };
        let mut w = World::new(cfg, 11).unwrap();
        for _ in 0..10 {
            w.step(3.0, ORIGIN_FORWARD);
        }
        assert_eq!(w.enemies().len(), 3);
    }

    #[test]
    fn spawn_enemy_respects_capacity() {
        let cfg = SimConfig { max_enemies: 1, ..SimConfig::default() };
        let mut w = World::new(cfg, 0).unwrap();
        assert!(w.spawn_enemy(Vec3::ZERO));
        assert!(!w.spawn_enemy(Vec3::ZERO));
    }

    // ── firing ────────────────────────────────────────────────────────────

    #[test]
    fn fire_appends_projectile() {
        let mut w = world();
        assert!(w.fire(ORIGIN_FORWARD));
        assert_eq!(w.projectiles().len(), 1);
        assert_eq!(w.projectiles()[0].position, Vec3::NEG_Z);
        assert_eq!(w.projectiles()[0].speed, 15.0);
    }

    #[test]
    fn fire_respects_capacity() {
        let cfg = SimConfig { max_projectiles: 2, ..SimConfig::default() };
        let mut w = World::new(cfg, 0).unwrap();
        assert!(w.fire(ORIGIN_FORWARD));
        assert!(w.fire(ORIGIN_FORWARD));
        assert!(!w.fire(ORIGIN_FORWARD));
        assert_eq!(w.projectiles().len(), 2);
    }

    #[test]
    fn fire_with_zero_direction_is_ignored() {
        let mut w = world();
        assert!(!w.fire(CameraPose::new(Vec3::ZERO, Vec3::ZERO)));
        assert!(w.projectiles().is_empty());
    }

    // ── movement ──────────────────────────────────────────────────────────

    #[test]
    fn projectiles_move_along_direction() {
        let mut w = world();
        w.fire(ORIGIN_FORWARD);
        w.move_projectiles(0.1);
        let z = w.projectiles()[0].position.z;
        assert!((z - (-1.0 - 1.5)).abs() < 1e-5);
    }

    #[test]
    fn bad_dt_is_treated_as_zero() {
        let mut w = world();
        w.fire(ORIGIN_FORWARD);
        w.step(-1.0, ORIGIN_FORWARD);
        w.step(f32::NAN, ORIGIN_FORWARD);
        assert_eq!(w.projectiles()[0].position, Vec3::NEG_Z);
    }

    // ── collisions ────────────────────────────────────────────────────────

    #[test]
    fn overlapping_pair_destroys_both() {
        let mut w = world();
        w.enemies.push(enemy_at(Vec3::new(0.0, 0.0, -5.0)));
        w.projectiles.push(shot_at(Vec3::new(0.0, 0.0, -4.0)));

        assert_eq!(w.check_collisions(), 1);
        assert!(!w.enemies[0].alive);
        assert!(!w.projectiles[0].alive);

        w.remove_destroyed();
        assert!(w.enemies().is_empty());
        assert!(w.projectiles().is_empty());
        assert_eq!(w.killed(), 1);
    }

    #[test]
    fn touching_spheres_collide() {
        let mut w = world();
        w.enemies.push(enemy_at(Vec3::new(1.5, 0.0, 0.0)));
        w.projectiles.push(shot_at(Vec3::ZERO));
        assert_eq!(w.check_collisions(), 1);
    }

    #[test]
    fn separated_spheres_do_not_collide() {
        let mut w = world();
        w.enemies.push(enemy_at(Vec3::new(1.6, 0.0, 0.0)));
        w.projectiles.push(shot_at(Vec3::ZERO));
        assert_eq!(w.check_collisions(), 0);
        assert!(w.enemies[0].alive);
        assert!(w.projectiles[0].alive);
    }

    #[test]
    fn one_shot_can_destroy_overlapping_cluster() {
        let mut w = world();
        w.enemies.push(enemy_at(Vec3::new(1.0, 0.0, 0.0)));
        w.enemies.push(enemy_at(Vec3::new(-1.0, 0.0, 0.0)));
        w.projectiles.push(shot_at(Vec3::ZERO));
        assert_eq!(w.check_collisions(), 2);
        assert_eq!(w.killed(), 2);
    }

    #[test]
    fn dead_enemy_is_not_hit_twice() {
        let mut w = world();
        w.enemies.push(enemy_at(Vec3::ZERO));
        w.projectiles.push(shot_at(Vec3::new(0.5, 0.0, 0.0)));
        w.projectiles.push(shot_at(Vec3::new(-0.5, 0.0, 0.0)));
        assert_eq!(w.check_collisions(), 1);

        // The second shot found the enemy already dead and survives.
        w.remove_destroyed();
        assert_eq!(w.projectiles().len(), 1);
        assert_eq!(w.projectiles()[0].position.x, -0.5);
    }

    #[test]
    fn remove_destroyed_keeps_order() {
        let mut w = world();
        for z in [-3.0, -4.0, -5.0, -6.0] {
            w.enemies.push(enemy_at(Vec3::new(0.0, 0.0, z)));
        }
        w.enemies[1].alive = false;
        w.remove_destroyed();
        let zs: Vec<f32> = w.enemies().iter().map(|e| e.position.z).collect();
        assert_eq!(zs, vec![-3.0, -5.0, -6.0]);
    }

    // ── range culling ─────────────────────────────────────────────────────

    #[test]
    fn far_projectiles_are_removed() {
        let mut w = world();
        w.projectiles.push(shot_at(Vec3::new(0.0, 0.0, -34.9)));
        w.projectiles.push(shot_at(Vec3::new(0.0, 0.0, -35.0)));
        w.projectiles.push(shot_at(Vec3::new(0.0, 0.0, -50.0)));
        assert_eq!(w.remove_far_projectiles(Vec3::ZERO), 2);
        assert_eq!(w.projectiles().len(), 1);
    }

    #[test]
    fn range_is_measured_from_camera() {
        let mut w = world();
        w.projectiles.push(shot_at(Vec3::new(0.0, 0.0, -40.0)));
        assert_eq!(w.remove_far_projectiles(Vec3::new(0.0, 0.0, -20.0)), 0);
    }

    #[test]
    fn shot_leaves_range_after_enough_steps() {
        let cfg = SimConfig { max_enemies: 1, ..SimConfig::default() };
        let mut w = World::new(cfg, 5).unwrap();
        // Fill the enemy pool far behind the camera so nothing is in the way.
        w.enemies.push(enemy_at(Vec3::new(0.0, 0.0, 100.0)));
        w.fire(ORIGIN_FORWARD);

        let mut culled = 0;
        for _ in 0..20 {
            culled += w.step(0.25, ORIGIN_FORWARD).culled;
        }
        assert_eq!(culled, 1);
        assert!(w.projectiles().is_empty());
    }

    // ── sorting ───────────────────────────────────────────────────────────

    #[test]
    fn enemies_sorted_far_to_near() {
        let mut w = world();
        for z in [-5.0, -20.0, -2.0, -11.0] {
            w.enemies.push(enemy_at(Vec3::new(0.0, 0.0, z)));
        }
        w.sort_enemies(Vec3::ZERO);
        let d: Vec<f32> = w.enemies().iter().map(|e| e.camera_distance).collect();
        assert_eq!(d, vec![20.0, 11.0, 5.0, 2.0]);
    }

    #[test]
    fn sort_follows_camera() {
        let mut w = world();
        w.enemies.push(enemy_at(Vec3::new(0.0, 0.0, -10.0)));
        w.enemies.push(enemy_at(Vec3::new(0.0, 0.0, 10.0)));
        w.sort_enemies(Vec3::new(0.0, 0.0, 9.0));
        assert_eq!(w.enemies()[0].position.z, -10.0);
        w.sort_enemies(Vec3::new(0.0, 0.0, -9.0));
        assert_eq!(w.enemies()[0].position.z, 10.0);
    }

    // ── full step ─────────────────────────────────────────────────────────

    #[test]
    fn step_invariants_hold_over_many_frames() {
        let mut w = World::new(SimConfig::default(), 1234).unwrap();
        let mut total_kills = 0;
        for i in 0..2000 {
            let angle = i as f32 * 0.01;
            let cam = CameraPose::new(Vec3::ZERO, Vec3::new(angle.sin(), 0.0, -angle.cos()));
            if i % 5 == 0 {
                w.fire(cam);
            }
            let r = w.step(1.0 / 60.0, cam);
            total_kills += r.kills;

            assert!(w.enemies().len() <= w.config().max_enemies);
            assert!(w.projectiles().len() <= w.config().max_projectiles);
            assert!(w.enemies().iter().all(|e| e.alive));
            assert!(w.projectiles().iter().all(|p| p.alive));
            assert!(w
                .enemies()
                .windows(2)
                .all(|p| p[0].camera_distance >= p[1].camera_distance));
        }
        assert_eq!(w.killed(), total_kills);
    }

    #[test]
    fn step_reports_kill() {
        let mut w = world();
        w.enemies.push(enemy_at(Vec3::new(0.0, 0.0, -3.0)));
        // Block the spawner so the report only reflects the scripted kill.
        w.spawn_timer = SpawnTimer::new(100.0);
        w.spawn_timer.tick(0.0, 0, 1);
        w.fire(ORIGIN_FORWARD);

        let r = w.step(0.1, ORIGIN_FORWARD);
        assert_eq!(r, StepReport { spawned: false, kills: 1, culled: 0 });
        assert!(w.enemies().is_empty());
    }
}
