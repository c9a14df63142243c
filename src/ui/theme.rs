//! Light and dark palettes for the TUI
//!
//! Soft, high-contrast colors sized for small readers. Every palette is a
//! plain struct of RGB constants plus style helpers, picked by `ThemeMode`.

use ratatui::style::{Color, Modifier, Style};

use crate::ambient::ThemeMode;

/// Color palette for one theme mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    /// Card and panel fill
    pub surface: Color,
    pub text: Color,
    pub dim: Color,
    pub primary: Color,
    pub accent: Color,
    pub success: Color,
    pub error: Color,
    pub border: Color,
}

// ═══════════════════════════════════════════════════════════════════════════
// PALETTES
// ═══════════════════════════════════════════════════════════════════════════

/// Light: warm paper background, deep ink text
pub const LIGHT: Palette = Palette {
    background: Color::Rgb(0xfd, 0xf8, 0xef),
    surface: Color::Rgb(0xff, 0xff, 0xff),
    text: Color::Rgb(0x2b, 0x24, 0x1e),
    dim: Color::Rgb(0x6b, 0x5f, 0x55),
    primary: Color::Rgb(0x1d, 0x5f, 0xa8),
    accent: Color::Rgb(0xa3, 0x4a, 0x00),
    success: Color::Rgb(0x1f, 0x7a, 0x35),
    error: Color::Rgb(0xb0, 0x1e, 0x2d),
    border: Color::Rgb(0xc9, 0xb8, 0xa4),
};

/// Dark: night sky background, soft white text
pub const DARK: Palette = Palette {
    background: Color::Rgb(0x14, 0x17, 0x24),
    surface: Color::Rgb(0x1f, 0x24, 0x36),
    text: Color::Rgb(0xee, 0xea, 0xe0),
    dim: Color::Rgb(0x9a, 0x9f, 0xb5),
    primary: Color::Rgb(0x7c, 0xc4, 0xff),
    accent: Color::Rgb(0xff, 0xc8, 0x57),
    success: Color::Rgb(0x7e, 0xe0, 0x8a),
    error: Color::Rgb(0xff, 0x8a, 0x8a),
    border: Color::Rgb(0x3d, 0x45, 0x63),
};

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> &'static Palette {
        match mode {
            ThemeMode::Light => &LIGHT,
            ThemeMode::Dark => &DARK,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // STYLE HELPERS
    // ═══════════════════════════════════════════════════════════════════════

    /// Default text on the page background
    pub fn text(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn border_focused(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Unselected card
    pub fn card(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }

    /// Card under the cursor (inverted)
    pub fn card_selected(&self) -> Style {
        Style::default()
            .fg(self.background)
            .bg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Card that does not accept input right now
    pub fn card_disabled(&self) -> Style {
        Style::default().fg(self.dim).bg(self.surface)
    }

    pub fn success(&self) -> Style {
        Style::default()
            .fg(self.success)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.error)
            .add_modifier(Modifier::BOLD)
    }

    pub fn loading(&self) -> Style {
        Style::default()
            .fg(self.primary)
            .add_modifier(Modifier::BOLD)
    }

    /// Keybinding hint
    pub fn keybind(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub fn keybind_desc(&self) -> Style {
        Style::default().fg(self.dim)
    }

    pub fn status_bar(&self) -> Style {
        Style::default().fg(self.text).bg(self.surface)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COLOR UTILITIES
// ═══════════════════════════════════════════════════════════════════════════

/// Relative luminance of an sRGB color
/// Formula: https://www.w3.org/TR/WCAG20/#relativeluminancedef
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    fn channel_luminance(c: u8) -> f64 {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }

    0.2126 * channel_luminance(r) + 0.7152 * channel_luminance(g) + 0.0722 * channel_luminance(b)
}

/// Contrast ratio between two colors, from 1 (same) to 21 (black/white)
pub fn contrast_ratio(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> f64 {
    let l1 = relative_luminance(fg.0, fg.1, fg.2);
    let l2 = relative_luminance(bg.0, bg.1, bg.2);

    let (lighter, darker) = if l1 > l2 { (l1, l2) } else { (l2, l1) };

    (lighter + 0.05) / (darker + 0.05)
}

/// WCAG AA for normal text (4.5:1)
pub fn meets_wcag_aa(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 4.5
}

/// WCAG AA for large text (3:1)
pub fn meets_wcag_aa_large(fg: (u8, u8, u8), bg: (u8, u8, u8)) -> bool {
    contrast_ratio(fg, bg) >= 3.0
}

/// RGB tuple of a ratatui color (Rgb variant only)
pub fn color_to_rgb(color: Color) -> Option<(u8, u8, u8)> {
    match color {
        Color::Rgb(r, g, b) => Some((r, g, b)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(color: Color) -> (u8, u8, u8) {
        color_to_rgb(color).expect("palette colors should all be RGB")
    }

    #[test]
    fn test_for_mode() {
        assert_eq!(Palette::for_mode(ThemeMode::Light), &LIGHT);
        assert_eq!(Palette::for_mode(ThemeMode::Dark), &DARK);
    }

    #[test]
    fn test_text_meets_aa_in_both_modes() {
        for palette in [&LIGHT, &DARK] {
            let ratio = contrast_ratio(rgb(palette.text), rgb(palette.background));
            assert!(ratio >= 4.5, "text contrast {:.2}:1", ratio);

            let ratio = contrast_ratio(rgb(palette.text), rgb(palette.surface));
            assert!(ratio >= 4.5, "card contrast {:.2}:1", ratio);
        }
    }

    #[test]
    fn test_selected_card_readable() {
        for palette in [&LIGHT, &DARK] {
            assert!(meets_wcag_aa_large(
                rgb(palette.background),
                rgb(palette.primary)
            ));
        }
    }

    #[test]
    fn test_contrast_ratio_black_white() {
        let ratio = contrast_ratio((0, 0, 0), (255, 255, 255));
        assert!((ratio - 21.0).abs() < 0.1);
    }

    #[test]
    fn test_contrast_ratio_same_color() {
        let ratio = contrast_ratio((100, 100, 100), (100, 100, 100));
        assert!((ratio - 1.0).abs() < 0.001);
    }
}
