use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Current keyboard state for the shell's window.
///
/// Held keys are what the per-frame exit check polls. Transitions are
/// recorded into an `InputFrame`.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an input event to the current state and writes deltas to `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Release the key set; a key let go while unfocused never reports.
                    self.keys_down.clear();
                }
            }

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    if self.keys_down.insert(*key) {
                        frame.keys_pressed.insert(*key);
                    }
                }
                KeyState::Released => {
                    if self.keys_down.remove(key) {
                        frame.keys_released.insert(*key);
                    }
                }
            },
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn apply(state: &mut InputState, frame: &mut InputFrame, ev: InputEvent) {
        state.apply_event(frame, ev);
    }

    #[test]
    fn press_marks_key_down_and_pressed() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, InputEvent::key_pressed(Key::Escape));
        assert!(s.key_down(Key::Escape));
        assert!(f.was_pressed(Key::Escape));
    }

    #[test]
    fn repeat_press_is_not_a_new_transition() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, InputEvent::key_pressed(Key::Escape));
        f.clear();
        apply(&mut s, &mut f, InputEvent::key_pressed(Key::Escape));
        assert!(s.key_down(Key::Escape));
        assert!(!f.was_pressed(Key::Escape));
        assert_eq!(f.events.len(), 1);
    }

    #[test]
    fn release_clears_key() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, InputEvent::key_pressed(Key::Space));
        apply(&mut s, &mut f, InputEvent::key_released(Key::Space));
        assert!(!s.key_down(Key::Space));
        assert!(f.keys_released.contains(&Key::Space));
    }

    #[test]
    fn focus_loss_drops_held_keys() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        apply(&mut s, &mut f, InputEvent::Focused(true));
        apply(&mut s, &mut f, InputEvent::key_pressed(Key::Escape));
        apply(&mut s, &mut f, InputEvent::Focused(false));
        assert!(!s.focused);
        assert!(s.keys_down.is_empty());
    }
}
