use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, PointerButtonEvent,
    PointerMoveEvent,
};

/// Current input state for a single window.
///
/// Holds "is down" information and current pointer position.
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    /// Applies a platform-agnostic input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Clear "down" sets so nothing stays stuck across a focus change.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y }) => {
                self.pointer_pos = Some((*x, *y));
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::MouseMotion { dx, dy } => {
                frame.mouse_motion.0 += dx;
                frame.mouse_motion.1 += dy;
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        self.keys_down.remove(key);
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent { button, state, x, y, modifiers }) => {
                self.pointer_pos = Some((*x, *y));
                self.modifiers = *modifiers;

                match state {
                    MouseButtonState::Pressed => {
                        self.buttons_down.insert(*button);
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }
        }
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(key: Key, state: KeyState) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), repeat: false }
    }

    fn button(button: MouseButton, state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button,
            state,
            x: 10.0,
            y: 20.0,
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn key_press_and_release_recorded_once() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();

        s.apply_event(&mut f, key(Key::W, KeyState::Pressed));
        s.apply_event(&mut f, key(Key::W, KeyState::Pressed)); // repeat
        assert!(s.key_down(Key::W));
        assert!(f.key_pressed(Key::W));
        assert_eq!(f.keys_pressed.len(), 1);

        f.clear();
        s.apply_event(&mut f, key(Key::W, KeyState::Released));
        assert!(!s.key_down(Key::W));
        assert!(!f.key_pressed(Key::W));
    }

    #[test]
    fn click_release_is_visible_in_frame() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();

        s.apply_event(&mut f, button(MouseButton::Left, MouseButtonState::Pressed));
        assert!(s.buttons_down.contains(&MouseButton::Left));
        assert!(!f.button_released(MouseButton::Left));

        s.apply_event(&mut f, button(MouseButton::Left, MouseButtonState::Released));
        assert!(f.button_released(MouseButton::Left));
        assert_eq!(s.pointer_pos, Some((10.0, 20.0)));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, button(MouseButton::Left, MouseButtonState::Released));
        assert!(!f.button_released(MouseButton::Left));
    }

    #[test]
    fn focus_loss_clears_held_input() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, key(Key::A, KeyState::Pressed));
        s.apply_event(&mut f, button(MouseButton::Right, MouseButtonState::Pressed));
        s.apply_event(&mut f, InputEvent::Focused(false));
        assert!(s.keys_down.is_empty());
        assert!(s.buttons_down.is_empty());
        assert!(!s.focused);
    }

    #[test]
    fn mouse_motion_accumulates_until_clear() {
        let mut s = InputState::default();
        let mut f = InputFrame::default();
        s.apply_event(&mut f, InputEvent::MouseMotion { dx: 3.0, dy: -1.0 });
        s.apply_event(&mut f, InputEvent::MouseMotion { dx: 2.0, dy: -4.0 });
        assert_eq!(f.mouse_motion, (5.0, -5.0));
        f.clear();
        assert_eq!(f.mouse_motion, (0.0, 0.0));
    }
}
