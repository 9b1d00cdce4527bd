use glam::Vec3;

/// A shot fired from the camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub position: Vec3,
    pub alive: bool,
    pub collider_radius: f32,

    /// Unit travel direction.
    pub direction: Vec3,

    /// Units per second.
    pub speed: f32,
}

impl Projectile {
    /// Spawns a projectile one unit in front of the camera, flying along
    /// `camera_direction`.
    ///
    /// Returns `None` when the direction has no usable length.
    pub fn from_camera(
        camera_position: Vec3,
        camera_direction: Vec3,
        collider_radius: f32,
        speed: f32,
    ) -> Option<Self> {
        let direction = camera_direction.try_normalize()?;
        Some(Self {
            position: camera_position + direction,
            alive: true,
            collider_radius,
            direction,
            speed,
        })
    }

    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.position += self.direction * self.speed * dt;
    }
}
