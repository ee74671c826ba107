//! Unified theme and color system for the gravity TUI
//!
//! Provides consistent color language across panels:
//! - 🔴 Red: Anomalies, Errors
//! - 🟡 Yellow: Regular data points, Warnings
//! - ⚪ Gray: Hints, Disabled, Neutral
//! - 🔵 Cyan: Selected, Focus, Interactive

use gravity_core::panels::PointStyle;
use gravity_core::ColorScheme;
use ratatui::style::Color;

/// Status color palette following k9s/lazygit conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusColor {
    /// Green: Loaded, Success
    Success,
    /// Red: Anomaly, Error
    Error,
    /// Yellow: Warning, Attention
    Warning,
    /// Gray: Hints, Neutral
    Neutral,
    /// Cyan: Selected, Focus, Interactive
    Focus,
}

impl StatusColor {
    /// Convert to Ratatui Color based on color scheme
    pub fn to_color(self, scheme: ColorScheme) -> Color {
        match scheme {
            ColorScheme::Dark => match self {
                StatusColor::Success => Color::Green,
                StatusColor::Error => Color::Red,
                StatusColor::Warning => Color::Yellow,
                StatusColor::Neutral => Color::DarkGray,
                StatusColor::Focus => Color::Cyan,
            },
            ColorScheme::Light => match self {
                StatusColor::Success => Color::Rgb(0, 128, 0), // Dark green
                StatusColor::Error => Color::Rgb(200, 0, 0),   // Dark red
                StatusColor::Warning => Color::Rgb(180, 120, 0), // Dark yellow/orange
                StatusColor::Neutral => Color::Gray,
                StatusColor::Focus => Color::Rgb(0, 128, 128), // Dark cyan
            },
        }
    }
}

/// Color of a chart point
///
/// The dark scheme uses the exact hex colors of [`PointStyle`]; the light
/// scheme falls back to the darker status palette so points stay visible.
pub fn point_color(style: PointStyle, scheme: ColorScheme) -> Color {
    match scheme {
        ColorScheme::Dark => hex_color(style.hex()).unwrap_or(Color::Reset),
        ColorScheme::Light => match style {
            PointStyle::Alert => StatusColor::Error.to_color(scheme),
            PointStyle::Normal => StatusColor::Warning.to_color(scheme),
        },
    }
}

/// Parse `#rgb` or `#rrggbb`
pub fn hex_color(hex: &str) -> Option<Color> {
    let digits = hex.strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();

    match digits.len() {
        3 => {
            let mut it = digits.chars().map(|c| channel(&format!("{c}{c}")));
            Some(Color::Rgb(it.next()??, it.next()??, it.next()??))
        }
        6 => Some(Color::Rgb(
            channel(&digits[0..2])?,
            channel(&digits[2..4])?,
            channel(&digits[4..6])?,
        )),
        _ => None,
    }
}

/// Focus state colors
pub struct FocusStyle;

impl FocusStyle {
    /// Border color for focused pane
    pub fn focused_border(scheme: ColorScheme) -> Color {
        StatusColor::Focus.to_color(scheme)
    }

    /// Border color for unfocused pane
    pub fn unfocused_border(scheme: ColorScheme) -> Color {
        StatusColor::Neutral.to_color(scheme)
    }

    /// Foreground for body text
    pub fn text(scheme: ColorScheme) -> Color {
        match scheme {
            ColorScheme::Dark => Color::White,
            ColorScheme::Light => Color::Black,
        }
    }
}
