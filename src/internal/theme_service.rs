use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;

use super::preferences::PreferenceStore;
use crate::utils::theme::ThemeMode;
use crate::utils::theme_loader::{TuiTheme, load_theme};

/// Preference key holding `"light"` or `"dark"`.
pub const THEME_KEY: &str = "theme";

/// Process-wide owner of the light/dark theme.
///
/// This is the only writer of the theme preference. The mode is read from the
/// store once at construction and written back on every toggle; the resolved
/// palette is what the renderer paints onto the root of each frame.
pub struct ThemeService {
    mode: ThemeMode,
    palette: TuiTheme,
    theme_file: Option<PathBuf>,
    store: Box<dyn PreferenceStore>,
}

impl ThemeService {
    pub fn init(store: Box<dyn PreferenceStore>, theme_file: Option<PathBuf>) -> Self {
        let mode = match store.get(THEME_KEY) {
            Some(raw) => ThemeMode::from_str(&raw).unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Unrecognized stored theme, using light");
                ThemeMode::Light
            }),
            None => ThemeMode::Light,
        };
        tracing::info!(%mode, "Initialized theme from preferences");

        let palette = resolve_palette(theme_file.as_ref(), mode);
        Self {
            mode,
            palette,
            theme_file,
            store,
        }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn palette(&self) -> &TuiTheme {
        &self.palette
    }

    /// Flip the mode, re-resolve the palette and persist the new value.
    ///
    /// The in-memory mode flips even when persisting fails; the error only
    /// reports that the choice will not survive a restart.
    pub fn toggle(&mut self) -> Result<ThemeMode> {
        self.mode = self.mode.toggled();
        self.palette = resolve_palette(self.theme_file.as_ref(), self.mode);
        tracing::info!(mode = %self.mode, "Theme toggled");

        self.store
            .set(THEME_KEY, &self.mode.to_string())
            .context("Failed to persist theme preference")?;
        Ok(self.mode)
    }

    pub fn stored_value(&self) -> Option<String> {
        self.store.get(THEME_KEY)
    }
}

fn resolve_palette(theme_file: Option<&PathBuf>, mode: ThemeMode) -> TuiTheme {
    match theme_file {
        Some(path) => load_theme(path, mode).unwrap_or_else(|e| {
            tracing::error!("Failed to load theme '{}': {:#}", path.display(), e);
            TuiTheme::builtin(mode)
        }),
        None => TuiTheme::builtin(mode),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::preferences::MemoryPreferences;

    struct FailingStore;

    impl PreferenceStore for FailingStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
            anyhow::bail!("read-only")
        }
    }

    #[test]
    fn defaults_to_light_without_stored_value() {
        let service = ThemeService::init(Box::new(MemoryPreferences::new()), None);
        assert_eq!(service.mode(), ThemeMode::Light);
        assert_eq!(service.palette(), &TuiTheme::builtin(ThemeMode::Light));
    }

    #[test]
    fn initializes_from_store() {
        let store = MemoryPreferences::with_value(THEME_KEY, "dark");
        let service = ThemeService::init(Box::new(store), None);
        assert_eq!(service.mode(), ThemeMode::Dark);
        assert_eq!(service.palette(), &TuiTheme::builtin(ThemeMode::Dark));
    }

    #[test]
    fn unrecognized_stored_value_falls_back_to_light() {
        let store = MemoryPreferences::with_value(THEME_KEY, "sepia");
        let service = ThemeService::init(Box::new(store), None);
        assert_eq!(service.mode(), ThemeMode::Light);
    }

    #[test]
    fn toggle_twice_restores_and_persists_each_step() {
        let mut service = ThemeService::init(Box::new(MemoryPreferences::new()), None);

        assert_eq!(service.toggle().unwrap(), ThemeMode::Dark);
        assert_eq!(service.stored_value().as_deref(), Some("dark"));
        assert_eq!(service.palette(), &TuiTheme::builtin(ThemeMode::Dark));

        assert_eq!(service.toggle().unwrap(), ThemeMode::Light);
        assert_eq!(service.stored_value().as_deref(), Some("light"));
        assert_eq!(service.palette(), &TuiTheme::builtin(ThemeMode::Light));
    }

    #[test]
    fn toggle_flips_even_when_store_fails() {
        let mut service = ThemeService::init(Box::new(FailingStore), None);
        assert!(service.toggle().is_err());
        assert_eq!(service.mode(), ThemeMode::Dark);
    }

    #[test]
    fn missing_theme_file_falls_back_to_builtin() {
        let service = ThemeService::init(
            Box::new(MemoryPreferences::new()),
            Some(PathBuf::from("/nonexistent/news-time-theme.json")),
        );
        assert_eq!(service.palette(), &TuiTheme::builtin(ThemeMode::Light));
    }
}
