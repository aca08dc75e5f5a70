//! Dashboard colour palette and hex colour helpers.

use regex_lite::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Named theme colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartColors {
    pub primary: &'static str,
    pub success: &'static str,
    pub info: &'static str,
    pub warning: &'static str,
    pub danger: &'static str,
    pub secondary: &'static str,
    pub dark: &'static str,
    pub light: &'static str,
}

pub const CHART_COLORS: ChartColors = ChartColors {
    primary: "#4e73df",
    success: "#1cc88a",
    info: "#36b9cc",
    warning: "#f6c23e",
    danger: "#e74a3b",
    secondary: "#858796",
    dark: "#5a5c69",
    light: "#f8f9fc",
};

/// Colours assigned to datasets in order.
pub const EXTENDED_PALETTE: [&str; 10] = [
    "#4e73df", "#1cc88a", "#36b9cc", "#f6c23e", "#e74a3b",
    "#858796", "#6f42c1", "#20c9a6", "#fd7e14", "#e83e8c",
];

/// Errors from colour parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("invalid hex colour '{0}' (expected #rrggbb)")]
    InvalidHex(String),

    #[error("darken percent {0} outside 0..=100")]
    PercentOutOfRange(u32),
}

/// 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

fn hex_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^#?([0-9a-fA-F]{2})([0-9a-fA-F]{2})([0-9a-fA-F]{2})$")
            .expect("static hex colour pattern")
    })
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (the leading `#` is optional).
    pub fn parse_hex(hex: &str) -> Result<Self, ColorError> {
        let invalid = || ColorError::InvalidHex(hex.to_string());
        let caps = hex_pattern().captures(hex.trim()).ok_or_else(invalid)?;
        let channel = |i: usize| u8::from_str_radix(&caps[i], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
        })
    }

    /// Scale every channel down by `percent`, flooring.
    pub fn darken(self, percent: u32) -> Result<Self, ColorError> {
        if percent > 100 {
            return Err(ColorError::PercentOutOfRange(percent));
        }
        let scale = |c: u8| (u32::from(c) * (100 - percent) / 100) as u8;
        Ok(Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        })
    }

    /// CSS `rgba(...)` string.
    pub fn to_rgba(self, alpha: f64) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// `#4e73df`, 0.1 -> `rgba(78, 115, 223, 0.1)`.
pub fn hex_to_rgba(hex: &str, alpha: f64) -> Result<String, ColorError> {
    Ok(Rgb::parse_hex(hex)?.to_rgba(alpha))
}

/// Darken a hex colour by a percentage, returning `#rrggbb`.
pub fn darken_color(hex: &str, percent: u32) -> Result<String, ColorError> {
    Ok(Rgb::parse_hex(hex)?.darken(percent)?.to_string())
}

/// Palette colour for dataset `index`, wrapping around.
pub fn palette_color(index: usize) -> &'static str {
    EXTENDED_PALETTE[index % EXTENDED_PALETTE.len()]
}
