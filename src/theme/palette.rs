//! The two built-in palettes: Tokyo Night for dark mode, Tokyo Day for light

use ratatui::style::Color;

use super::Theme;

/// `0xRRGGBB` to a terminal color
const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

// Search hits and read marks look the same in both modes
const HIGHLIGHT_BG: Color = hex(0xffeb3b);
const HIGHLIGHT_FG: Color = hex(0x000000);
const READ_MARK: Color = hex(0x4caf50);

impl Theme {
    /// Dark palette
    pub fn tokyo_night() -> Self {
        Theme {
            name: "Tokyo Night".to_string(),
            bg_primary: hex(0x1a1b26),
            bg_secondary: hex(0x24283b),
            bg_tertiary: hex(0x414868),
            fg_primary: hex(0xa9b1d6),
            fg_secondary: hex(0xc0caf5),
            fg_muted: hex(0x565f89),
            accent_primary: hex(0x7aa2f7),
            accent_secondary: hex(0xbb9af7),
            success: hex(0x9ece6a),
            warning: hex(0xe0af68),
            error: hex(0xf7768e),
            info: hex(0x7dcfff),
            code: hex(0xff9e64),
            highlight_bg: HIGHLIGHT_BG,
            highlight_fg: HIGHLIGHT_FG,
            read_mark: READ_MARK,
            border: hex(0x414868),
            border_focused: hex(0x7aa2f7),
            cursor: hex(0xc0caf5),
        }
    }

    /// Light palette
    pub fn tokyo_day() -> Self {
        Theme {
            name: "Tokyo Day".to_string(),
            bg_primary: hex(0xe1e2e7),
            bg_secondary: hex(0xd0d5e3),
            bg_tertiary: hex(0xc4c8da),
            fg_primary: hex(0x3760bf),
            fg_secondary: hex(0x6172b0),
            fg_muted: hex(0x848cb5),
            accent_primary: hex(0x2e7de9),
            accent_secondary: hex(0x9854f1),
            success: hex(0x587539),
            warning: hex(0x8c6c3e),
            error: hex(0xf52a65),
            info: hex(0x007197),
            code: hex(0xb15c00),
            highlight_bg: HIGHLIGHT_BG,
            highlight_fg: HIGHLIGHT_FG,
            read_mark: READ_MARK,
            border: hex(0xa1a6c5),
            border_focused: hex(0x2e7de9),
            cursor: hex(0x3760bf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luma(color: Color) -> u32 {
        match color {
            Color::Rgb(r, g, b) => (r as u32 * 299 + g as u32 * 587 + b as u32 * 114) / 1000,
            other => panic!("expected an RGB color, got {:?}", other),
        }
    }

    #[test]
    fn hex_splits_channels() {
        assert_eq!(hex(0x1a1b26), Color::Rgb(0x1a, 0x1b, 0x26));
        assert_eq!(hex(0xffffff), Color::Rgb(255, 255, 255));
    }

    #[test]
    fn day_background_is_lighter_than_night() {
        assert!(luma(Theme::tokyo_day().bg_primary) > luma(Theme::tokyo_night().bg_primary));
    }

    #[test]
    fn text_contrasts_with_background() {
        for theme in [Theme::tokyo_night(), Theme::tokyo_day()] {
            let bg = luma(theme.bg_primary);
            let fg = luma(theme.fg_primary);
            assert!(bg.abs_diff(fg) > 60, "{} text is too close to its background", theme.name);
        }
    }

    #[test]
    fn highlight_stands_out_from_text() {
        for theme in [Theme::tokyo_night(), Theme::tokyo_day()] {
            assert_ne!(theme.highlight_bg, theme.bg_primary);
            assert!(luma(theme.highlight_bg).abs_diff(luma(theme.highlight_fg)) > 150);
        }
    }
}
