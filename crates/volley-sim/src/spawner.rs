use glam::Vec3;
use rand::Rng;

use crate::config::SimConfig;
use crate::enemy::Enemy;

/// Countdown that gates enemy spawns.
///
/// The countdown keeps running below zero while the pool is full, so the next
/// spawn happens on the first tick after a slot frees up.
#[derive(Debug, Clone)]
pub struct SpawnTimer {
    remaining: f32,
    interval: f32,
}

impl SpawnTimer {
    /// Creates a timer that fires on its first tick.
    pub fn new(interval: f32) -> Self {
        Self { remaining: 0.0, interval }
    }

    /// Seconds left until the next spawn is due (may be negative).
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Advances the countdown and reports whether a spawn should happen now.
    pub fn tick(&mut self, dt: f32, pool_len: usize, capacity: usize) -> bool {
        self.remaining -= dt;
        if self.remaining <= 0.0 && pool_len < capacity {
            self.remaining = self.interval;
            return true;
        }
        false
    }
}

/// Rolls a new enemy somewhere around the camera.
///
/// The jittered point is offset by the camera position and pushed out to a
/// random distance from the origin. Degenerate (zero) vectors fall back to
/// `+Z` for the position and `+Y` for the rotation axis.
pub fn random_enemy<R>(rng: &mut R, camera_position: Vec3, config: &SimConfig) -> Enemy
where
    R: Rng,
{
    let j = config.spawn_jitter;

    let angle = rng.gen_range(0..360) as f32;

    let axis = Vec3::new(
        rng.gen_range(-j..=j) as f32,
        rng.gen_range(-j..=j) as f32,
        rng.gen_range(-j..=j) as f32,
    );

    let offset = Vec3::new(
        rng.gen_range(-j..=j) as f32,
        rng.gen_range(-j..=j) as f32,
        rng.gen_range(-j..=j) as f32,
    );

    let radius =
        i64::from(config.spawn_radius_min) + i64::from(rng.gen_range(0..config.spawn_radius_span));

    let direction = (offset + camera_position).try_normalize().unwrap_or(Vec3::Z);
    let position = direction * radius as f32;
    let axis = axis.try_normalize().unwrap_or(Vec3::Y);

    Enemy::new(position, axis, angle, config.enemy_collider_radius, camera_position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    // ── SpawnTimer ────────────────────────────────────────────────────────

    #[test]
    fn fires_on_first_tick() {
        let mut t = SpawnTimer::new(3.0);
        assert!(t.tick(0.016, 0, 20));
        assert_eq!(t.remaining(), 3.0);
    }

    #[test]
    fn waits_for_interval() {
        let mut t = SpawnTimer::new(3.0);
        assert!(t.tick(0.1, 0, 20));
        assert!(!t.tick(1.0, 1, 20));
        assert!(!t.tick(1.0, 1, 20));
        assert!(t.tick(1.0, 1, 20));
    }

    #[test]
    fn full_pool_defers_spawn() {
        let mut t = SpawnTimer::new(3.0);
        assert!(!t.tick(0.5, 20, 20));
        assert!(!t.tick(5.0, 20, 20));
        assert!(t.remaining() < 0.0);

        // First tick with room fires immediately.
        assert!(t.tick(0.0, 19, 20));
        assert_eq!(t.remaining(), 3.0);
    }

    // ── random_enemy ──────────────────────────────────────────────────────

    #[test]
    fn spawn_distance_within_radius_band() {
        let cfg = SimConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for _ in 0..200 {
            let e = random_enemy(&mut rng, Vec3::new(0.0, 0.0, 5.0), &cfg);
            let d = e.position.length();
            assert!(d >= 11.999 && d <= 31.001, "distance {d} outside [12, 31]");
            assert!(e.rotation.is_normalized());
            assert!(e.alive);
            assert_eq!(e.collider_radius, cfg.enemy_collider_radius);
        }
    }

    #[test]
    fn same_seed_same_enemy() {
        let cfg = SimConfig::default();
        let mut a = ChaCha8Rng::seed_from_u64(9);
        let mut b = ChaCha8Rng::seed_from_u64(9);
        assert_eq!(
            random_enemy(&mut a, Vec3::ZERO, &cfg),
            random_enemy(&mut b, Vec3::ZERO, &cfg),
        );
    }

    #[test]
    fn radius_near_i32_max_does_not_overflow() {
        let cfg = SimConfig { spawn_radius_min: i32::MAX - 2, spawn_radius_span: 3, ..SimConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let e = random_enemy(&mut rng, Vec3::ZERO, &cfg);
        assert!(e.position.is_finite());
        assert!(e.position.length() > 1.0e9);
    }

    #[test]
    fn zero_jitter_falls_back_to_fixed_axes() {
        let cfg = SimConfig { spawn_jitter: 0, spawn_radius_min: 12, spawn_radius_span: 1, ..SimConfig::default() };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let e = random_enemy(&mut rng, Vec3::ZERO, &cfg);
        assert_eq!(e.position, Vec3::new(0.0, 0.0, 12.0));
        assert!(e.position.is_finite());
        assert!(e.rotation.is_finite());
    }
}
