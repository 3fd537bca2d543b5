//! Input events for canvas interaction.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
    /// Gesture aborted (pointer left the window, focus lost).
    Cancel,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

impl KeyModifiers {
    /// Only shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Only control held.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Cmd on macOS.
    #[must_use]
    pub const fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Keys the editor responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "key", content = "char", rename_all = "lowercase")]
pub enum Key {
    /// Delete.
    Delete,
    /// Backspace.
    Backspace,
    /// Escape.
    Escape,
    /// Left arrow.
    ArrowLeft,
    /// Right arrow.
    ArrowRight,
    /// Up arrow.
    ArrowUp,
    /// Down arrow.
    ArrowDown,
    /// A printable character, lowercased.
    Char(char),
}

impl Key {
    /// Parse a DOM-style key name (`"ArrowLeft"`, `"Delete"`, `"z"`).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "Delete" => Self::Delete,
            "Backspace" => Self::Backspace,
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            other => {
                let mut chars = other.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                Self::Char(c.to_ascii_lowercase())
            }
        };
        Some(key)
    }
}

/// All input events the editor can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// Pointer (mouse, pen, primary touch) event in screen coordinates.
    Pointer {
        /// Phase of the pointer gesture.
        phase: PointerPhase,
        /// X coordinate in screen pixels.
        x: f32,
        /// Y coordinate in screen pixels.
        y: f32,
        /// Active modifier keys.
        #[serde(default)]
        modifiers: KeyModifiers,
    },

    /// Key press.
    Key {
        /// Which key.
        key: Key,
        /// Active modifier keys.
        #[serde(default)]
        modifiers: KeyModifiers,
    },
}

impl InputEvent {
    /// Pointer event with no modifiers.
    #[must_use]
    pub const fn pointer(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self::Pointer {
            phase,
            x,
            y,
            modifiers: KeyModifiers {
                shift: false,
                ctrl: false,
                alt: false,
                meta: false,
            },
        }
    }

    /// Key press with the given modifiers.
    #[must_use]
    pub const fn key(key: Key, modifiers: KeyModifiers) -> Self {
        Self::Key { key, modifiers }
    }

    /// Screen position of a pointer event.
    #[must_use]
    pub const fn screen_point(&self) -> Option<Point> {
        match self {
            Self::Pointer { x, y, .. } => Some(Point::new(*x, *y)),
            Self::Key { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_dom_names() {
        assert_eq!(Key::from_name("ArrowUp"), Some(Key::ArrowUp));
        assert_eq!(Key::from_name("Z"), Some(Key::Char('z')));
        assert_eq!(Key::from_name("F12"), None);
        assert_eq!(Key::from_name(""), None);
    }

    #[test]
    fn test_pointer_event_json_shape() {
        let json = r#"{"type":"Pointer","data":{"phase":"down","x":1.0,"y":2.0}}"#;
        let event: InputEvent = serde_json::from_str(json).expect("parse");
        assert_eq!(event, InputEvent::pointer(PointerPhase::Down, 1.0, 2.0));
        assert_eq!(event.screen_point(), Some(Point::new(1.0, 2.0)));
    }

    #[test]
    fn test_command_modifier_accepts_meta() {
        let meta = KeyModifiers {
            meta: true,
            ..KeyModifiers::default()
        };
        assert!(meta.command());
        assert!(KeyModifiers::CTRL.command());
        assert!(!KeyModifiers::SHIFT.command());
    }
}
