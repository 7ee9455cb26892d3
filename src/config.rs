use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::internal::ui::app::Action;

pub const DEFAULT_ENDPOINT: &str =
    "https://d99meq3r25.execute-api.us-east-1.amazonaws.com/prod/articles";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub feed: FeedConfig,
    /// Optional JSON theme file overriding the built-in light/dark palettes.
    pub theme_file: Option<String>,
    /// Where the theme preference is persisted. Defaults to
    /// `<config_dir>/news-time/preferences.json`.
    pub preferences_path: Option<String>,
    pub logging: LoggingConfig,
    /// Extra key bindings, e.g. `{"Ctrl+r": Refresh}`.
    pub keybindings: Option<HashMap<String, Action>>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct FeedConfig {
    /// The article feed URL.
    pub endpoint: String,
    /// Query parameter carrying the selected category. When unset, every
    /// category fetches the same unfiltered feed.
    pub category_param: Option<String>,
    /// Minimum time the loading spinner stays up, in milliseconds.
    pub min_spinner_ms: u64,
    /// HTTP request timeout. `None` waits indefinitely.
    pub request_timeout_secs: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            category_param: None,
            min_spinner_ms: 600,
            request_timeout_secs: Some(30),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub log_directory: Option<String>,
    pub module_levels: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_directory: None,
            module_levels: HashMap::new(),
        }
    }
}

impl LoggingConfig {
    /// Filter directive string for `EnvFilter`, e.g. `info,news_time::api=debug`.
    pub fn filter_directives(&self) -> String {
        let mut modules: Vec<_> = self.module_levels.iter().collect();
        modules.sort();

        let mut filter_str = self.level.clone();
        for (module, level) in modules {
            filter_str.push_str(&format!(",{}={}", module, level));
        }
        filter_str
    }
}

impl AppConfig {
    pub fn load() -> Self {
        // Look for config.ron in current directory or next to executable
        let mut candidates = vec![PathBuf::from("config.ron")];

        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::error!("Failed to load config at {}: {:#}", path.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default()
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        ron::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    pub fn min_spinner_duration(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.feed.min_spinner_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.feed.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.feed.category_param, None);
        assert_eq!(config.feed.min_spinner_ms, 600);
        assert_eq!(config.feed.request_timeout_secs, Some(30));
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: AppConfig = ron::from_str(
            r#"(
    // Only override what differs
    feed: (
        category_param: Some("category"),
        min_spinner_ms: 0,
    ),
)"#,
        )
        .unwrap();

        assert_eq!(config.feed.category_param.as_deref(), Some("category"));
        assert_eq!(config.feed.min_spinner_ms, 0);
        assert_eq!(config.feed.endpoint, DEFAULT_ENDPOINT);
        assert!(config.keybindings.is_none());
    }

    #[test]
    fn test_keybinding_overrides_parse() {
        let config: AppConfig = ron::from_str(
            r#"(
    keybindings: Some({
        "Ctrl+r": Refresh,
        "w": SelectTag(World),
    }),
)"#,
        )
        .unwrap();

        let bindings = config.keybindings.unwrap();
        assert!(matches!(bindings.get("Ctrl+r"), Some(Action::Refresh)));
        assert!(matches!(
            bindings.get("w"),
            Some(Action::SelectTag(crate::api::Category::World))
        ));
    }

    #[test]
    fn test_filter_directives_are_sorted() {
        let mut logging = LoggingConfig::default();
        logging
            .module_levels
            .insert("reqwest".to_string(), "warn".to_string());
        logging
            .module_levels
            .insert("news_time::api".to_string(), "debug".to_string());

        assert_eq!(
            logging.filter_directives(),
            "info,news_time::api=debug,reqwest=warn"
        );
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("news_time_config_test.ron");
        {
            let mut file = fs::File::create(&path).unwrap();
            file.write_all(br#"(theme_file: Some("./themes/paper.json"))"#)
                .unwrap();
        }

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.theme_file.as_deref(), Some("./themes/paper.json"));

        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_load_from_invalid_file_is_error() {
        let path = std::env::temp_dir().join("news_time_config_invalid.ron");
        fs::write(&path, "(feed: [1, 2").unwrap();

        assert!(AppConfig::load_from(&path).is_err());

        let _ = fs::remove_file(path);
    }
}
