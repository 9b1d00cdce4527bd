use std::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Vec3};

use volley_engine::input::{InputFrame, InputState, Key};
use volley_sim::CameraPose;

const MOUSE_SPEED: f32 = 0.003;
const MOVE_SPEED: f32 = 3.0;
const FOV_Y_DEGREES: f32 = 45.0;
const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

/// Keeps the view from flipping over the poles.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// First-person camera driven by raw mouse motion and arrow keys/WASD.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FlyCamera {
    pub position: Vec3,
    /// Radians around +Y; `PI` looks down -Z.
    pub yaw: f32,
    /// Radians above the horizon.
    pub pitch: f32,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            yaw: PI,
            pitch: 0.0,
        }
    }
}

impl FlyCamera {
    /// Unit view direction.
    pub fn direction(&self) -> Vec3 {
        Vec3::new(
            self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            self.pitch.cos() * self.yaw.cos(),
        )
    }

    /// Unit strafe direction, always horizontal.
    pub fn right(&self) -> Vec3 {
        let yaw = self.yaw - FRAC_PI_2;
        Vec3::new(yaw.sin(), 0.0, yaw.cos())
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose::new(self.position, self.direction())
    }

    /// Applies this frame's mouse delta, then moves along the held keys.
    pub fn update(&mut self, input: &InputState, frame: &InputFrame, dt: f32) {
        let (dx, dy) = frame.mouse_motion;
        self.yaw -= dx * MOUSE_SPEED;
        self.pitch = (self.pitch - dy * MOUSE_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let held = |a: Key, b: Key| input.key_down(a) || input.key_down(b);

        let forward = self.direction();
        let right = self.right();
        let mut motion = Vec3::ZERO;
        if held(Key::ArrowUp, Key::W) {
            motion += forward;
        }
        if held(Key::ArrowDown, Key::S) {
            motion -= forward;
        }
        if held(Key::ArrowRight, Key::D) {
            motion += right;
        }
        if held(Key::ArrowLeft, Key::A) {
            motion -= right;
        }

        self.position += motion * MOVE_SPEED * dt;
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let up = self.right().cross(self.direction());
        let view = Mat4::look_to_rh(self.position, self.direction(), up);
        let proj = Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect, Z_NEAR, Z_FAR);
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use volley_engine::input::{InputEvent, KeyState, Modifiers};

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    fn press(state: &mut InputState, frame: &mut InputFrame, key: Key) {
        state.apply_event(
            frame,
            InputEvent::Key { key, state: KeyState::Pressed, modifiers: Modifiers::default(), repeat: false },
        );
    }

    // ── orientation ───────────────────────────────────────────────────────

    #[test]
    fn starts_behind_origin_looking_down_negative_z() {
        let cam = FlyCamera::default();
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 5.0));
        assert!(close(cam.direction(), Vec3::NEG_Z));
        assert!(close(cam.right(), Vec3::X));
    }

    #[test]
    fn mouse_right_turns_right() {
        let mut cam = FlyCamera::default();
        let mut frame = InputFrame::default();
        frame.mouse_motion = (100.0, 0.0);
        cam.update(&InputState::default(), &frame, 0.0);
        assert!(cam.direction().x > 0.0);
        assert_eq!(cam.position, Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut cam = FlyCamera::default();
        let mut frame = InputFrame::default();
        frame.mouse_motion = (0.0, -1.0e6);
        cam.update(&InputState::default(), &frame, 0.0);
        assert!(cam.pitch <= PITCH_LIMIT);
        assert!(cam.direction().is_finite());
    }

    // ── movement ──────────────────────────────────────────────────────────

    #[test]
    fn forward_key_moves_along_view() {
        let mut cam = FlyCamera::default();
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        press(&mut state, &mut frame, Key::W);

        cam.update(&state, &frame, 1.0);
        assert!(close(cam.position, Vec3::new(0.0, 0.0, 5.0 - MOVE_SPEED)));
    }

    #[test]
    fn opposite_keys_cancel() {
        let mut cam = FlyCamera::default();
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        press(&mut state, &mut frame, Key::ArrowLeft);
        press(&mut state, &mut frame, Key::D);

        cam.update(&state, &frame, 0.5);
        assert!(close(cam.position, Vec3::new(0.0, 0.0, 5.0)));
    }

    // ── projection ────────────────────────────────────────────────────────

    #[test]
    fn point_ahead_lands_in_view() {
        let cam = FlyCamera::default();
        let clip = cam.view_proj(1.0) * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..1.0).contains(&ndc.z));
    }

    #[test]
    fn pose_matches_camera() {
        let cam = FlyCamera::default();
        let pose = cam.pose();
        assert_eq!(pose.position, cam.position);
        assert!(close(pose.direction, Vec3::NEG_Z));
    }
}
