//! Light/dark presentation mode.
//!
//! The mode is stored as the literal `"light"` or `"dark"`. Parsing is strict:
//! callers decide what an unrecognized stored value means.

use strum_macros::{Display, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Label of the toggle control, naming the mode it switches to.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "🌙 Dark Mode",
            Self::Dark => "☀ Light Mode",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn toggled_twice_is_identity() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Light.toggled().toggled(), ThemeMode::Light);
    }

    #[test]
    fn stored_literals_round_trip() {
        assert_eq!(ThemeMode::Dark.to_string(), "dark");
        assert_eq!(ThemeMode::Light.to_string(), "light");
        assert_eq!(ThemeMode::from_str("dark").unwrap(), ThemeMode::Dark);
        assert_eq!(ThemeMode::from_str("light").unwrap(), ThemeMode::Light);
    }

    #[test]
    fn unknown_literal_is_rejected() {
        assert!(ThemeMode::from_str("sepia").is_err());
        assert!(ThemeMode::from_str("").is_err());
    }

    #[test]
    fn toggle_label_names_the_other_mode() {
        assert_eq!(ThemeMode::Light.toggle_label(), "🌙 Dark Mode");
        assert_eq!(ThemeMode::Dark.toggle_label(), "☀ Light Mode");
    }
}
