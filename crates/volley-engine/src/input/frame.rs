use std::collections::HashSet;

use super::types::{Key, MouseButton};

/// Per-frame input deltas.
///
/// `InputState` provides the current state (held keys/buttons, pointer position).
/// `InputFrame` provides the transitions and mouse motion of the current frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub keys_pressed: HashSet<Key>,
    pub buttons_released: HashSet<MouseButton>,

    /// Raw mouse motion accumulated over the frame.
    pub mouse_motion: (f32, f32),
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.keys_pressed.clear();
        self.buttons_released.clear();
        self.mouse_motion = (0.0, 0.0);
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn button_released(&self, btn: MouseButton) -> bool {
        self.buttons_released.contains(&btn)
    }
}
