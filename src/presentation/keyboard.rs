// Keyboard shortcuts

/// Where a key event was typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyTarget {
    Document,
    /// Editable text; shortcuts stay out of the way here
    TextInput,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: char,
    pub ctrl: bool,
    pub target: KeyTarget,
}

impl KeyEvent {
    /// Decodes a terminal control byte (`0x01` = Ctrl+A .. `0x1a` = Ctrl+Z).
    pub fn from_control_byte(byte: u8, target: KeyTarget) -> Option<Self> {
        match byte {
            0x01..=0x1a => Some(Self {
                key: char::from(b'a' + byte - 1),
                ctrl: true,
                target,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortcut {
    pub key: char,
    pub ctrl: bool,
}

/// Ctrl+G shows or hides the panel.
pub const TOGGLE_PANEL: Shortcut = Shortcut { key: 'g', ctrl: true };

impl Shortcut {
    pub fn matches(&self, event: &KeyEvent) -> bool {
        event.target == KeyTarget::Document && event.ctrl == self.ctrl && event.key == self.key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_g_toggles_from_document() {
        let event = KeyEvent::from_control_byte(0x07, KeyTarget::Document).unwrap();
        assert_eq!(event.key, 'g');
        assert!(TOGGLE_PANEL.matches(&event));
    }

    #[test]
    fn test_ctrl_g_ignored_in_text_input() {
        let event = KeyEvent::from_control_byte(0x07, KeyTarget::TextInput).unwrap();
        assert!(!TOGGLE_PANEL.matches(&event));
    }

    #[test]
    fn test_other_keys_do_not_toggle() {
        let plain_g = KeyEvent {
            key: 'g',
            ctrl: false,
            target: KeyTarget::Document,
        };
        assert!(!TOGGLE_PANEL.matches(&plain_g));

        let ctrl_h = KeyEvent::from_control_byte(0x08, KeyTarget::Document).unwrap();
        assert!(!TOGGLE_PANEL.matches(&ctrl_h));

        assert_eq!(KeyEvent::from_control_byte(0x1b, KeyTarget::Document), None);
        assert_eq!(KeyEvent::from_control_byte(b'g', KeyTarget::Document), None);
    }
}
