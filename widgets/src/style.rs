//! Layout and style computations shared by every widget builder.

use serde::{Deserialize, Serialize};

pub const FONT_STACK: &str = "system-ui, -apple-system, Segoe UI, Roboto, Helvetica, Arial, sans-serif";
pub const MOBILE_BREAKPOINT: &str = "(max-width: 768px)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackgroundMode {
    #[default]
    Solid,
    Gradient,
}

/// Entrance animation used by bars, popups and modals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    #[default]
    Slide,
    Fade,
    Zoom,
    None,
}

impl Animation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Slide => "slide",
            Self::Fade => "fade",
            Self::Zoom => "zoom",
            Self::None => "none",
        }
    }
}

/// Background value: a solid color or a two-stop linear gradient.
#[must_use]
pub fn background(mode: BackgroundMode, color: &str, gradient_start: &str, gradient_end: &str, angle: f64) -> String {
    match mode {
        BackgroundMode::Solid => color.to_string(),
        BackgroundMode::Gradient => {
            format!("linear-gradient({}deg, {gradient_start}, {gradient_end})", number(angle))
        }
    }
}

/// Format a number without a trailing `.0` for whole values.
#[must_use]
pub fn number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        let formatted = format!("{value:.3}");
        formatted.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[must_use]
pub fn px(value: f64) -> String {
    format!("{}px", number(value))
}

#[must_use]
pub fn seconds(value: f64) -> String {
    format!("{}s", number(value))
}

#[must_use]
pub fn ms(value: u64) -> String {
    format!("{value}ms")
}

/// Zero-pad to at least two digits.
#[must_use]
pub fn pad2(value: i64) -> String {
    format!("{value:02}")
}

/// Currency amount with two decimals, e.g. `$12.50`.
#[must_use]
pub fn money(symbol: &str, amount: f64) -> String {
    if amount < 0.0 {
        format!("-{symbol}{:.2}", amount.abs())
    } else {
        format!("{symbol}{amount:.2}")
    }
}

/// Five-slot star string for a 0..=5 rating.
#[must_use]
pub fn stars(rating: u8) -> String {
    let filled = usize::from(rating.min(5));
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Compact count, e.g. `1.2k`, `3.4M`.
#[must_use]
pub fn compact_count(value: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let v = value as f64;
    if value >= 1_000_000 {
        format!("{}M", number((v / 100_000.0).floor() / 10.0))
    } else if value >= 1_000 {
        format!("{}k", number((v / 100.0).floor() / 10.0))
    } else {
        value.to_string()
    }
}

/// Box shadow used by cards and modals.
#[must_use]
pub fn card_shadow(elevated: bool) -> &'static str {
    if elevated { "0 20px 50px rgba(0, 0, 0, 0.25)" } else { "0 2px 8px rgba(0, 0, 0, 0.08)" }
}

/// Initial and shown transforms for an entrance animation.
///
/// `from_edge` is the edge the element slides in from (`top` or `bottom`).
#[must_use]
pub fn entrance(animation: Animation, from_edge: &str) -> (&'static str, &'static str) {
    match animation {
        Animation::Slide if from_edge == "bottom" => ("translateY(100%)", "translateY(0)"),
        Animation::Slide => ("translateY(-100%)", "translateY(0)"),
        Animation::Zoom => ("scale(0.85)", "scale(1)"),
        Animation::Fade | Animation::None => ("none", "none"),
    }
}

#[cfg(test)]
#[path = "style_test.rs"]
mod tests;
