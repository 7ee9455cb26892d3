use anyhow::{Context, Result};
use ratatui::style::Color;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::theme::ThemeMode;

/// Number of card placeholder colors; cards cycle through them by position.
pub const PLACEHOLDER_COUNT: usize = 6;

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeFile {
    pub name: String,
    pub themes: Vec<ThemeVariant>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ThemeVariant {
    pub name: String,
    pub mode: String, // "light" or "dark"
    pub colors: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TuiTheme {
    pub background: Color,
    pub foreground: Color,
    pub muted: Color,
    pub accent: Color,
    pub accent_fg: Color,
    pub border: Color,
    pub error: Color,
    pub link: Color,
    pub placeholders: [Color; PLACEHOLDER_COUNT],
}

impl TuiTheme {
    /// Built-in palette for a mode.
    pub fn builtin(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                background: Color::Rgb(0xfa, 0xf8, 0xf5),
                foreground: Color::Rgb(0x12, 0x12, 0x12),
                muted: Color::Rgb(0x66, 0x66, 0x66),
                accent: Color::Rgb(0x12, 0x12, 0x12),
                accent_fg: Color::Rgb(0xfa, 0xf8, 0xf5),
                border: Color::Rgb(0xc8, 0xc4, 0xbe),
                error: Color::Rgb(0xb0, 0x1e, 0x1e),
                link: Color::Rgb(0x32, 0x6b, 0xa8),
                placeholders: [
                    Color::Rgb(0xe0, 0x7a, 0x5f),
                    Color::Rgb(0x3d, 0x85, 0xc6),
                    Color::Rgb(0x81, 0xb2, 0x9a),
                    Color::Rgb(0xf2, 0xcc, 0x8f),
                    Color::Rgb(0x9d, 0x6b, 0xb0),
                    Color::Rgb(0x5c, 0x6b, 0x73),
                ],
            },
            ThemeMode::Dark => Self {
                background: Color::Rgb(0x12, 0x12, 0x12),
                foreground: Color::Rgb(0xe8, 0xe6, 0xe3),
                muted: Color::Rgb(0x9a, 0x9a, 0x9a),
                accent: Color::Rgb(0xe8, 0xe6, 0xe3),
                accent_fg: Color::Rgb(0x12, 0x12, 0x12),
                border: Color::Rgb(0x3a, 0x3a, 0x3a),
                error: Color::Rgb(0xff, 0x6b, 0x6b),
                link: Color::Rgb(0x7c, 0xb7, 0xff),
                placeholders: [
                    Color::Rgb(0xb8, 0x5c, 0x44),
                    Color::Rgb(0x2b, 0x5f, 0x8e),
                    Color::Rgb(0x5a, 0x80, 0x6e),
                    Color::Rgb(0xb3, 0x94, 0x62),
                    Color::Rgb(0x70, 0x4c, 0x7e),
                    Color::Rgb(0x44, 0x50, 0x57),
                ],
            },
        }
    }

    /// Placeholder color for the card at `position`.
    pub fn placeholder(&self, position: usize) -> Color {
        self.placeholders[placeholder_index(position)]
    }
}

impl Default for TuiTheme {
    fn default() -> Self {
        Self::builtin(ThemeMode::default())
    }
}

pub fn placeholder_index(position: usize) -> usize {
    position % PLACEHOLDER_COUNT
}

/// Load the variant for `mode` from a JSON theme file.
///
/// Colors missing from the file fall back to the built-in palette of the same
/// mode. When the file has no variant for `mode`, its first variant is used.
#[tracing::instrument(skip(path, mode), fields(path = ?path, mode = %mode))]
pub fn load_theme(path: &Path, mode: ThemeMode) -> Result<TuiTheme> {
    let content = fs::read_to_string(path).context("Failed to read theme file")?;
    let theme_file: ThemeFile =
        serde_json::from_str(&content).context("Failed to parse theme JSON")?;

    let mode_str = mode.to_string();
    let variant = theme_file
        .themes
        .iter()
        .find(|t| t.mode.eq_ignore_ascii_case(&mode_str))
        .or_else(|| theme_file.themes.first())
        .context("No matching theme variant found")?;
    tracing::info!(theme = %theme_file.name, variant = %variant.name, "Loaded theme variant");

    let base = TuiTheme::builtin(mode);
    let pick = |keys: &[&str], fallback: Color| {
        keys.iter()
            .find_map(|k| variant.colors.get(*k))
            .and_then(|hex| parse_color(hex))
            .unwrap_or(fallback)
    };

    let mut placeholders = base.placeholders;
    for (i, slot) in placeholders.iter_mut().enumerate() {
        let key = format!("placeholder.{}", i + 1);
        *slot = pick(&[key.as_str()], *slot);
    }

    Ok(TuiTheme {
        background: pick(&["background"], base.background),
        foreground: pick(&["foreground"], base.foreground),
        muted: pick(&["muted.foreground"], base.muted),
        accent: pick(
            &["accent.background", "selection.background"],
            base.accent,
        ),
        accent_fg: pick(&["accent.foreground"], base.accent_fg),
        border: pick(&["border"], base.border),
        error: pick(&["base.red", "error"], base.error),
        link: pick(&["base.blue", "link"], base.link),
        placeholders,
    })
}

fn parse_color(hex: &str) -> Option<Color> {
    if let Ok(c) = hex.parse::<Color>() {
        return Some(c);
    }

    let hex = hex.trim_start_matches('#');
    match hex.len() {
        6 | 8 => {
            // For 8-char hex (with alpha), ignore the alpha and use the RGB components.
            let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
            let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
            let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}
