use crate::internal::ui::app::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

/// Maps key events to actions
#[derive(Debug, Clone, Default)]
pub struct KeyBindingMap {
    bindings: HashMap<KeyEvent, Action>,
}

impl KeyBindingMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_action(&self, key: &KeyEvent) -> Option<Action> {
        // Terminals report shifted characters with or without SHIFT, so look
        // the character up without it as well.
        self.bindings.get(&normalize(key)).cloned()
    }

    pub fn add_binding(&mut self, key: KeyEvent, action: Action) {
        self.bindings.insert(normalize(&key), action);
    }

    /// Merge custom keybindings from configuration
    pub fn merge_config(&mut self, config: &HashMap<String, Action>) {
        for (key_str, action) in config {
            match parse_key_str(key_str) {
                Some(key_event) => self.add_binding(key_event, action.clone()),
                None => tracing::warn!("Invalid key string in config: {}", key_str),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

fn normalize(key: &KeyEvent) -> KeyEvent {
    let mut modifiers = key.modifiers & (KeyModifiers::CONTROL | KeyModifiers::ALT);
    let code = match key.code {
        // Terminals report Ctrl/Alt letters in lowercase.
        KeyCode::Char(c) if !modifiers.is_empty() => KeyCode::Char(c.to_ascii_lowercase()),
        KeyCode::Char(c) => KeyCode::Char(c),
        // Shift+Tab arrives as BackTab, with or without SHIFT set.
        KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => KeyCode::BackTab,
        KeyCode::BackTab => KeyCode::BackTab,
        other => {
            modifiers |= key.modifiers & KeyModifiers::SHIFT;
            other
        }
    };
    KeyEvent::new(code, modifiers)
}

/// Parse a key string into a KeyEvent
/// Supported formats:
/// - Single char: "j", "k", "1"
/// - Special keys: "Enter", "Tab", "Esc", "Up", "Down", "Left", "Right"
/// - With modifiers: "Ctrl+c", "Ctrl+R", "Shift+Tab"
pub fn parse_key_str(key_str: &str) -> Option<KeyEvent> {
    let parts: Vec<&str> = key_str.split('+').collect();

    let mut modifiers = KeyModifiers::empty();
    let key_part = match parts.split_last() {
        Some((last, mods)) => {
            for modifier in mods {
                match modifier.to_lowercase().as_str() {
                    "ctrl" => modifiers |= KeyModifiers::CONTROL,
                    "shift" => modifiers |= KeyModifiers::SHIFT,
                    "alt" => modifiers |= KeyModifiers::ALT,
                    _ => return None, // Invalid modifier
                }
            }
            *last
        }
        None => return None,
    };

    let code = match key_part {
        "Enter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        "BackTab" => KeyCode::BackTab,
        "Esc" => KeyCode::Esc,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        s => {
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None, // Unknown key
            }
        }
    };

    Some(KeyEvent::new(code, modifiers))
}
