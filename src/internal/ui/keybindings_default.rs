use crate::api::Category;
use crate::internal::ui::app::Action;
use crate::internal::ui::keybindings::KeyBindingMap;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Create default keybindings for the application
pub fn create_default_keybindings() -> KeyBindingMap {
    let mut map = KeyBindingMap::new();

    // Quit
    map.add_binding(key('q'), Action::Quit);
    map.add_binding(key_code(KeyCode::Esc), Action::Quit);
    map.add_binding(
        KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        Action::Quit,
    );

    // Navigation
    map.add_binding(key('j'), Action::NavigateDown);
    map.add_binding(key('k'), Action::NavigateUp);
    map.add_binding(key_code(KeyCode::Down), Action::NavigateDown);
    map.add_binding(key_code(KeyCode::Up), Action::NavigateUp);

    // Open the selected article
    map.add_binding(key_code(KeyCode::Enter), Action::OpenArticle);
    map.add_binding(key('o'), Action::OpenArticle);

    // Categories: 1-8 pick directly, h/l and arrows cycle
    for (i, category) in Category::ALL.iter().enumerate() {
        if let Some(digit) = char::from_digit(i as u32 + 1, 10) {
            map.add_binding(key(digit), Action::SelectTag(*category));
        }
    }
    map.add_binding(key('l'), Action::NextTag);
    map.add_binding(key('h'), Action::PrevTag);
    map.add_binding(key_code(KeyCode::Right), Action::NextTag);
    map.add_binding(key_code(KeyCode::Left), Action::PrevTag);
    map.add_binding(key_code(KeyCode::Tab), Action::NextTag);

    map.add_binding(key('r'), Action::Refresh);
    map.add_binding(key('t'), Action::ToggleTheme);

    map
}

fn key(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::empty())
}

fn key_code(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::empty())
}
