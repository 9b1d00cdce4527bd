use crate::error::ConfigError;

/// Tunables for the shooter simulation.
///
/// `Default` gives the classic setup: 20 enemies, 50 shots, one spawn every
/// three seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Enemy pool capacity.
    pub max_enemies: usize,

    /// Projectile pool capacity.
    pub max_projectiles: usize,

    /// Seconds between enemy spawns.
    pub spawn_interval: f32,

    pub enemy_collider_radius: f32,
    pub projectile_collider_radius: f32,

    /// Projectile speed in units per second.
    pub projectile_speed: f32,

    /// Projectiles at or beyond this distance from the camera are removed.
    pub despawn_distance: f32,

    /// Integer jitter range `[-j, j]` used for spawn offsets and rotation axes.
    pub spawn_jitter: i32,

    /// Spawn distance from the origin is `min + [0, span)`.
    pub spawn_radius_min: i32,
    pub spawn_radius_span: i32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_enemies: 20,
            max_projectiles: 50,
            spawn_interval: 3.0,
            enemy_collider_radius: 1.0,
            projectile_collider_radius: 0.25 * 2.0,
            projectile_speed: 15.0,
            despawn_distance: 35.0,
            spawn_jitter: 10,
            spawn_radius_min: 12,
            spawn_radius_span: 20,
        }
    }
}

impl SimConfig {
    /// Checks that every field is usable by [`World`](crate::World).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_enemies == 0 {
            return Err(ConfigError::new("max_enemies", "must be at least 1"));
        }
        if self.max_projectiles == 0 {
            return Err(ConfigError::new("max_projectiles", "must be at least 1"));
        }

        let positive = [
            ("spawn_interval", self.spawn_interval),
            ("enemy_collider_radius", self.enemy_collider_radius),
            ("projectile_collider_radius", self.projectile_collider_radius),
            ("projectile_speed", self.projectile_speed),
            ("despawn_distance", self.despawn_distance),
        ];
        for (field, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(ConfigError::new(field, format!("must be finite and > 0, got {v}")));
            }
        }

        if self.spawn_jitter < 0 {
            return Err(ConfigError::new("spawn_jitter", "must not be negative"));
        }
        if self.spawn_radius_min < 0 {
            return Err(ConfigError::new("spawn_radius_min", "must not be negative"));
        }
        if self.spawn_radius_span <= 0 {
            return Err(ConfigError::new("spawn_radius_span", "must be at least 1"));
        }
        if self.spawn_radius_min.checked_add(self.spawn_radius_span - 1).is_none() {
            return Err(ConfigError::new(
                "spawn_radius_span",
                format!("min + span - 1 overflows i32 (min {})", self.spawn_radius_min),
            ));
        }

        Ok(())
    }
}
