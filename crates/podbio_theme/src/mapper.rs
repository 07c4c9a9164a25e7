//! Enum-to-output lookup tables
//!
//! Pure functions translating widget-style enum choices into CSS-ready
//! values. A missing `(value, category)` pair is a [`ThemeError::MappingGap`],
//! never an empty string.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::{Result, ThemeError};

/// Output categories with a lookup table
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum MapCategory {
    BorderWidth,
    Shadow,
    GlowBlur,
    GlowOpacity,
    Spacing,
    CornerShape,
}

impl MapCategory {
    pub const ALL: [MapCategory; 6] = [
        MapCategory::BorderWidth,
        MapCategory::Shadow,
        MapCategory::GlowBlur,
        MapCategory::GlowOpacity,
        MapCategory::Spacing,
        MapCategory::CornerShape,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BorderWidth => "border_width",
            Self::Shadow => "shadow",
            Self::GlowBlur => "glow_blur",
            Self::GlowOpacity => "glow_opacity",
            Self::Spacing => "spacing",
            Self::CornerShape => "corner_shape",
        }
    }

    fn table(self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::BorderWidth => BORDER_WIDTH,
            Self::Shadow => SHADOW,
            Self::GlowBlur => GLOW_BLUR,
            Self::GlowOpacity => GLOW_OPACITY,
            Self::Spacing => SPACING,
            Self::CornerShape => CORNER_SHAPE,
        }
    }
}

impl Display for MapCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MapCategory {
    type Err = ThemeError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ThemeError::UnknownCategory(s.to_string()))
    }
}

const BORDER_WIDTH: &[(&str, &str)] = &[("thin", "1px"), ("medium", "2px"), ("thick", "4px")];

// Offsets and blur only; the color is emitted separately.
const SHADOW: &[(&str, &str)] = &[
    ("subtle", "0 1px 3px"),
    ("medium", "0 4px 12px"),
    ("strong", "0 10px 25px"),
];

const GLOW_BLUR: &[(&str, &str)] = &[("subtle", "8px"), ("pronounced", "16px")];

const GLOW_OPACITY: &[(&str, &str)] = &[("subtle", "0.5"), ("pronounced", "0.8")];

const SPACING: &[(&str, &str)] = &[
    ("compact", "0.5rem"),
    ("comfortable", "1rem"),
    ("spacious", "1.5rem"),
];

const CORNER_SHAPE: &[(&str, &str)] = &[("square", "0px"), ("rounded", "12px"), ("pill", "9999px")];

/// Map an enum value within a category to its output string.
pub fn convert_in(category: MapCategory, value: &str) -> Result<&'static str> {
    category
        .table()
        .iter()
        .find(|(key, _)| *key == value)
        .map(|(_, out)| *out)
        .ok_or_else(|| ThemeError::MappingGap {
            value: value.to_string(),
            category: category.as_str().to_string(),
        })
}

/// Map `(value, category)` given as strings, e.g. `convert("pronounced", "glow_blur")`.
pub fn convert(value: &str, category: &str) -> Result<&'static str> {
    convert_in(category.parse()?, value)
}
