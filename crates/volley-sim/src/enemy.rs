use std::cmp::Ordering;

use glam::{Quat, Vec3};

/// A spawned target.
///
/// `camera_distance` is cached so that the pool can be sorted far-to-near
/// without recomputing distances inside the comparator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enemy {
    pub position: Vec3,
    pub alive: bool,
    pub collider_radius: f32,

    /// Fixed orientation applied to the enemy mesh.
    pub rotation: Quat,

    /// Distance to the camera at the last refresh.
    pub camera_distance: f32,
}

impl Enemy {
    /// Creates a live enemy rotated `angle_degrees` about `axis`.
    ///
    /// `axis` is expected to be unit length.
    pub fn new(
        position: Vec3,
        axis: Vec3,
        angle_degrees: f32,
        collider_radius: f32,
        camera_position: Vec3,
    ) -> Self {
        Self {
            position,
            alive: true,
            collider_radius,
            rotation: Quat::from_axis_angle(axis, angle_degrees.to_radians()),
            camera_distance: position.distance(camera_position),
        }
    }

    pub fn refresh_camera_distance(&mut self, camera_position: Vec3) {
        self.camera_distance = self.position.distance(camera_position);
    }

    /// Back-to-front draw order: the farther enemy compares as `Less`.
    #[inline]
    pub fn draw_order(&self, other: &Enemy) -> Ordering {
        other.camera_distance.total_cmp(&self.camera_distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool { (a - b).abs() < 1e-5 }

    #[test]
    fn new_enemy_is_alive_with_camera_distance() {
        let e = Enemy::new(Vec3::new(3.0, 4.0, 0.0), Vec3::Y, 0.0, 1.0, Vec3::ZERO);
        assert!(e.alive);
        assert!(approx(e.camera_distance, 5.0));
    }

    #[test]
    fn rotation_is_half_angle_quaternion() {
        let e = Enemy::new(Vec3::ZERO, Vec3::Y, 180.0, 1.0, Vec3::ZERO);
        assert!(approx(e.rotation.x, 0.0));
        assert!(approx(e.rotation.y, 1.0));
        assert!(approx(e.rotation.z, 0.0));
        assert!(approx(e.rotation.w, 0.0));

        let e = Enemy::new(Vec3::ZERO, Vec3::X, 90.0, 1.0, Vec3::ZERO);
        let half = std::f32::consts::FRAC_PI_4;
        assert!(approx(e.rotation.x, half.sin()));
        assert!(approx(e.rotation.w, half.cos()));
    }

    #[test]
    fn zero_angle_is_identity() {
        let e = Enemy::new(Vec3::ONE, Vec3::Z, 0.0, 1.0, Vec3::ZERO);
        assert!(e.rotation.abs_diff_eq(Quat::IDENTITY, 1e-6));
    }

    #[test]
    fn refresh_tracks_camera() {
        let mut e = Enemy::new(Vec3::new(0.0, 0.0, -10.0), Vec3::Y, 0.0, 1.0, Vec3::ZERO);
        e.refresh_camera_distance(Vec3::new(0.0, 0.0, -4.0));
        assert!(approx(e.camera_distance, 6.0));
    }

    #[test]
    fn draw_order_puts_far_first() {
        let near = Enemy::new(Vec3::new(0.0, 0.0, 2.0), Vec3::Y, 0.0, 1.0, Vec3::ZERO);
        let far = Enemy::new(Vec3::new(0.0, 0.0, 20.0), Vec3::Y, 0.0, 1.0, Vec3::ZERO);
        assert_eq!(far.draw_order(&near), Ordering::Less);
        assert_eq!(near.draw_order(&far), Ordering::Greater);
        assert_eq!(near.draw_order(&near), Ordering::Equal);
    }
}
