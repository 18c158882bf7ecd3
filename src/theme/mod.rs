//! Theming for Folio
//!
//! Two palettes, one per [`ThemeMode`]: Tokyo Night for dark mode and Tokyo
//! Day for light mode. [`ThemeController`] owns the persisted mode.

mod controller;
mod palette;

pub use controller::{DARK_MODE_KEY, ThemeController, ThemeMode};

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// A color theme for the application
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,

    // Background colors
    pub bg_primary: Color,
    pub bg_secondary: Color,
    pub bg_tertiary: Color,

    // Foreground colors
    pub fg_primary: Color,
    pub fg_secondary: Color,
    pub fg_muted: Color,

    // Accent colors
    pub accent_primary: Color,
    pub accent_secondary: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    // Content
    pub code: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub read_mark: Color,

    // UI elements
    pub border: Color,
    pub border_focused: Color,
    pub cursor: Color,
}

impl Theme {
    /// Palette for the given mode
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Theme::tokyo_night(),
            ThemeMode::Light => Theme::tokyo_day(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme::for_mode(ThemeMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_theme_is_light() {
        let theme = Theme::default();
        assert_eq!(theme.name, "Tokyo Day");
    }

    #[test]
    fn dark_mode_uses_tokyo_night() {
        assert_eq!(Theme::for_mode(ThemeMode::Dark).name, "Tokyo Night");
    }

    #[test]
    fn search_highlight_is_shared_across_modes() {
        let dark = Theme::for_mode(ThemeMode::Dark);
        let light = Theme::for_mode(ThemeMode::Light);
        assert_eq!(dark.highlight_bg, light.highlight_bg);
        assert_eq!(dark.highlight_fg, light.highlight_fg);
    }
}
