//! Grid Style Configuration
//!
//! Typed replacement for a loose option dictionary. Every field has a
//! documented default; serialized styles may omit any field but may not carry
//! unknown ones.
//!
//! ```rust
//! use clarke_core::style::StyleConfig;
//!
//! let style = StyleConfig::default();
//! let filled = StyleConfig::filled();
//! assert!(filled.fill_zones && !style.fill_zones);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::StyleError;
use crate::geometry::GRID_MAX;
use crate::zone::Zone;

/// Opaque RGB color, written as a name or `#rrggbb`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a color name (including single-letter shorthands) or hex string.
    pub fn parse(s: &str) -> Result<Self, StyleError> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| StyleError::InvalidColor(s.to_string()));
        }
        let color = match s.to_ascii_lowercase().as_str() {
            "black" | "k" => Color::rgb(0, 0, 0),
            "white" | "w" => Color::rgb(255, 255, 255),
            "red" | "r" => Color::rgb(214, 39, 40),
            "green" | "g" => Color::rgb(44, 160, 44),
            "blue" | "b" => Color::rgb(31, 119, 180),
            "yellow" | "y" => Color::rgb(255, 221, 0),
            "cyan" | "c" => Color::rgb(23, 190, 207),
            "magenta" | "m" => Color::rgb(227, 119, 194),
            "orange" => Color::rgb(255, 127, 14),
            "purple" => Color::rgb(148, 103, 189),
            "brown" => Color::rgb(140, 86, 75),
            "pink" => Color::rgb(247, 182, 210),
            "gray" | "grey" => Color::rgb(127, 127, 127),
            _ => return Err(StyleError::InvalidColor(s.to_string())),
        };
        Ok(color)
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::rgb(
            channel(hex.get(0..2)?)?,
            channel(hex.get(2..4)?)?,
            channel(hex.get(4..6)?)?,
        )),
        // #rgb shorthand: each digit doubled
        3 => {
            let mut digits = hex.chars().map(|c| c.to_digit(16).map(|d| (d * 17) as u8));
            Some(Color::rgb(digits.next()??, digits.next()??, digits.next()??))
        }
        _ => None,
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = StyleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// Fill color per zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoneColors {
    pub a: Color,
    pub b: Color,
    pub c: Color,
    pub d: Color,
    pub e: Color,
}

impl Default for ZoneColors {
    fn default() -> Self {
        Self {
            a: Color::rgb(44, 160, 44),
            b: Color::rgb(255, 221, 0),
            c: Color::rgb(255, 127, 14),
            d: Color::rgb(214, 39, 40),
            e: Color::rgb(148, 103, 189),
        }
    }
}

impl ZoneColors {
    pub fn for_zone(&self, zone: Zone) -> Color {
        match zone {
            Zone::A => self.a,
            Zone::B => self.b,
            Zone::C => self.c,
            Zone::D => self.d,
            Zone::E => self.e,
        }
    }
}

/// Grid rendering options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    /// Plot title (default: "Clarke Error Grid")
    pub title: String,
    /// X axis label (default: "Reference Concentration [mg/dl]")
    pub x_label: String,
    /// Y axis label (default: "Prediction Concentration [mg/dl]")
    pub y_label: String,
    /// Visible reference range (default: (0, 400))
    pub x_limits: (f64, f64),
    /// Visible prediction range (default: (0, 400))
    pub y_limits: (f64, f64),
    /// Text size for title, axis and zone labels (default: 15)
    pub font_size: f64,
    /// Boundary line color (default: black)
    pub grid_color: Color,
    /// Sample marker color (default: black)
    pub scatter_color: Color,
    /// Per-zone fill colors (default: green, yellow, orange, red, purple)
    pub zone_colors: ZoneColors,
    /// Fill zone regions (default: false)
    pub fill_zones: bool,
    /// Zone fill opacity (default: 0.15)
    pub fill_opacity: f64,
    /// Sample marker opacity (default: 0.8)
    pub scatter_opacity: f64,
    /// Sample marker radius in pixels (default: 3)
    pub marker_size: f64,
    /// Draw title, axis labels, ticks and zone letters (default: true)
    pub annotate: bool,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            title: "Clarke Error Grid".to_string(),
            x_label: "Reference Concentration [mg/dl]".to_string(),
            y_label: "Prediction Concentration [mg/dl]".to_string(),
            x_limits: (0.0, GRID_MAX),
            y_limits: (0.0, GRID_MAX),
            font_size: 15.0,
            grid_color: Color::BLACK,
            scatter_color: Color::BLACK,
            zone_colors: ZoneColors::default(),
            fill_zones: false,
            fill_opacity: 0.15,
            scatter_opacity: 0.8,
            marker_size: 3.0,
            annotate: true,
        }
    }
}

impl StyleConfig {
    /// Default style with zone fills on
    pub fn filled() -> Self {
        Self {
            fill_zones: true,
            ..Self::default()
        }
    }

    /// Bare frame: boundaries and data only
    pub fn plain() -> Self {
        Self {
            annotate: false,
            ..Self::default()
        }
    }

    pub fn with_limits(mut self, x_limits: (f64, f64), y_limits: (f64, f64)) -> Self {
        self.x_limits = x_limits;
        self.y_limits = y_limits;
        self
    }

    /// Parse a JSON style document and validate it.
    pub fn from_json(s: &str) -> Result<Self, StyleError> {
        let style: Self = serde_json::from_str(s)?;
        style.validate()?;
        Ok(style)
    }

    /// Parse a YAML style document and validate it.
    pub fn from_yaml(s: &str) -> Result<Self, StyleError> {
        let style: Self = serde_yaml::from_str(s)?;
        style.validate()?;
        Ok(style)
    }

    pub fn validate(&self) -> Result<(), StyleError> {
        check_limits("x", self.x_limits)?;
        check_limits("y", self.y_limits)?;
        check_positive("font_size", self.font_size)?;
        check_positive("marker_size", self.marker_size)?;
        check_opacity("fill_opacity", self.fill_opacity)?;
        check_opacity("scatter_opacity", self.scatter_opacity)?;
        Ok(())
    }
}

fn check_limits(axis: &'static str, (low, high): (f64, f64)) -> Result<(), StyleError> {
    if low.is_finite() && high.is_finite() && low < high {
        Ok(())
    } else {
        Err(StyleError::InvalidLimits { axis, low, high })
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), StyleError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(StyleError::NonPositive { field, value })
    }
}

fn check_opacity(field: &'static str, value: f64) -> Result<(), StyleError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(StyleError::OpacityOutOfRange { field, value })
    }
}
