use std::fmt;

/// Keyboard key identifier.
///
/// Only the keys a bare window shell cares about are named. Everything else
/// arrives as `Key::Unknown` carrying the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers as keys
    Shift,
    Control,
    Alt,
    Meta,

    Q,
    W,

    F1,
    F11,

    /// Platform-dependent key not yet represented here.
    Unknown(u32),
}

impl Key {
    /// Parses a key name as accepted on the command line (`escape`, `q`, `f1`).
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            "escape" | "esc" => Key::Escape,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "backspace" => Key::Backspace,
            "space" => Key::Space,
            "q" => Key::Q,
            "w" => Key::W,
            "f1" => Key::F1,
            "f11" => Key::F11,
            _ => return None,
        };
        Some(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Platform-agnostic input events.
///
/// Platforms translate their native window events into these.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key {
        key: Key,
        state: KeyState,
        /// Stable platform code when available (e.g. scancode).
        code: u32,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    /// Window focus change.
    Focused(bool),
}

impl InputEvent {
    /// Shorthand for a non-repeat key press.
    pub fn key_pressed(key: Key) -> Self {
        InputEvent::Key { key, state: KeyState::Pressed, code: 0, repeat: false }
    }

    /// Shorthand for a key release.
    pub fn key_released(key: Key) -> Self {
        InputEvent::Key { key, state: KeyState::Released, code: 0, repeat: false }
    }
}
