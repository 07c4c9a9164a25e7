//! Widget visual-effect options
//!
//! Untrusted option bags (from a page-settings save) are validated against a
//! fixed schema and merged over a complete default set. Bad entries are
//! dropped with a [`StyleDiagnostic`]; the merge itself always succeeds.
//!
//! Persisted options stay flat so every schema key is always present. The
//! renderer-facing model ([`WidgetStyle`]) is a tagged variant per border
//! effect, so effect-specific fields only exist for their effect.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use crate::color::is_valid_color;
use crate::error::Result;
use crate::mapper::{convert_in, MapCategory};
use crate::tokens::parse_reference;

macro_rules! style_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            /// Every declared value.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn parse(s: &str) -> Option<Self> {
                Self::ALL.iter().copied().find(|v| v.as_str() == s)
            }

            fn names() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

style_enum!(
    /// Which border effect a widget draws
    BorderEffectKind { None => "none", Shadow => "shadow", Glow => "glow" }
);
style_enum!(BorderWidth { Thin => "thin", Medium => "medium", Thick => "thick" });
style_enum!(ShadowIntensity { Subtle => "subtle", Medium => "medium", Strong => "strong" });
style_enum!(GlowIntensity { Subtle => "subtle", Pronounced => "pronounced" });
style_enum!(
    /// Padding density inside widgets
    SpacingDensity { Compact => "compact", Comfortable => "comfortable", Spacious => "spacious" }
);
style_enum!(CornerShape { Square => "square", Rounded => "rounded", Pill => "pill" });

/// Every key accepted in a widget-style bag.
pub const SCHEMA_KEYS: [&str; 8] = [
    "border_effect",
    "border_width",
    "shadow_intensity",
    "shadow_color",
    "glow_intensity",
    "glow_color",
    "spacing",
    "corner_shape",
];

/// Keys holding colors, which may also be token references.
pub const COLOR_KEYS: [&str; 2] = ["shadow_color", "glow_color"];

/// Complete, flat widget-style options as persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetStyleOptions {
    pub border_effect: BorderEffectKind,
    pub border_width: BorderWidth,
    pub shadow_intensity: ShadowIntensity,
    pub shadow_color: String,
    pub glow_intensity: GlowIntensity,
    pub glow_color: String,
    pub spacing: SpacingDensity,
    pub corner_shape: CornerShape,
}

impl Default for WidgetStyleOptions {
    fn default() -> Self {
        Self {
            border_effect: BorderEffectKind::None,
            border_width: BorderWidth::Thin,
            shadow_intensity: ShadowIntensity::Medium,
            shadow_color: "rgba(15, 23, 42, 0.15)".to_string(),
            glow_intensity: GlowIntensity::Subtle,
            glow_color: "#0066ff".to_string(),
            spacing: SpacingDensity::Comfortable,
            corner_shape: CornerShape::Rounded,
        }
    }
}

/// Why a bag entry was dropped
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StyleIssue {
    UnknownKey,
    NotAString,
    InvalidValue { expected: String },
}

/// A dropped bag entry.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleDiagnostic {
    pub key: String,
    pub value: Value,
    pub issue: StyleIssue,
}

impl Display for StyleDiagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.issue {
            StyleIssue::UnknownKey => write!(f, "unknown widget style key `{}`", self.key),
            StyleIssue::NotAString => {
                write!(f, "widget style `{}` must be a string, got {}", self.key, self.value)
            }
            StyleIssue::InvalidValue { expected } => write!(
                f,
                "widget style `{}` has invalid value {} (expected {expected})",
                self.key, self.value
            ),
        }
    }
}

/// Result of sanitizing a bag: complete options plus what was dropped.
#[derive(Clone, Debug, PartialEq)]
pub struct SanitizedStyle {
    pub options: WidgetStyleOptions,
    pub diagnostics: Vec<StyleDiagnostic>,
}

impl SanitizedStyle {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl WidgetStyleOptions {
    /// Validate an untrusted bag and merge it over the defaults.
    pub fn sanitize(bag: &Map<String, Value>) -> SanitizedStyle {
        Self::default().merge(bag)
    }

    /// Validate an untrusted bag and merge it over `self`.
    pub fn merge(mut self, bag: &Map<String, Value>) -> SanitizedStyle {
        let mut diagnostics = Vec::new();
        for (key, value) in bag {
            let issue = match value.as_str() {
                _ if !SCHEMA_KEYS.contains(&key.as_str()) => Some(StyleIssue::UnknownKey),
                None => Some(StyleIssue::NotAString),
                Some(text) => self
                    .apply(key, text)
                    .err()
                    .map(|expected| StyleIssue::InvalidValue { expected }),
            };
            if let Some(issue) = issue {
                let diagnostic = StyleDiagnostic {
                    key: key.clone(),
                    value: value.clone(),
                    issue,
                };
                warn!("dropping {diagnostic}");
                diagnostics.push(diagnostic);
            }
        }
        SanitizedStyle {
            options: self,
            diagnostics,
        }
    }

    /// Set one schema key from its string form, or describe what was expected.
    fn apply(&mut self, key: &str, text: &str) -> std::result::Result<(), String> {
        fn pick<T: Copy>(
            parsed: Option<T>,
            names: Vec<&'static str>,
        ) -> std::result::Result<T, String> {
            parsed.ok_or_else(|| format!("one of {}", names.join(", ")))
        }
        // Token references are kept as written and resolved at cascade time.
        fn color(text: &str) -> std::result::Result<String, String> {
            let text = text.trim();
            if is_valid_color(text) || matches!(parse_reference(text, text), Ok(Some(_))) {
                Ok(text.to_string())
            } else {
                Err("a color or token reference".to_string())
            }
        }

        match key {
            "border_effect" => {
                self.border_effect = pick(BorderEffectKind::parse(text), BorderEffectKind::names())?
            }
            "border_width" => self.border_width = pick(BorderWidth::parse(text), BorderWidth::names())?,
            "shadow_intensity" => {
                self.shadow_intensity = pick(ShadowIntensity::parse(text), ShadowIntensity::names())?
            }
            "shadow_color" => self.shadow_color = color(text)?,
            "glow_intensity" => {
                self.glow_intensity = pick(GlowIntensity::parse(text), GlowIntensity::names())?
            }
            "glow_color" => self.glow_color = color(text)?,
            "spacing" => self.spacing = pick(SpacingDensity::parse(text), SpacingDensity::names())?,
            "corner_shape" => self.corner_shape = pick(CornerShape::parse(text), CornerShape::names())?,
            other => return Err(format!("a schema key, got `{other}`")),
        }
        Ok(())
    }

    /// Flat JSON object with every schema key, for persistence.
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }

    /// The tagged, renderer-facing form.
    pub fn to_style(&self) -> WidgetStyle {
        let border = match self.border_effect {
            BorderEffectKind::None => BorderEffect::None,
            BorderEffectKind::Shadow => BorderEffect::Shadow {
                intensity: self.shadow_intensity,
                color: self.shadow_color.clone(),
            },
            BorderEffectKind::Glow => BorderEffect::Glow {
                intensity: self.glow_intensity,
                color: self.glow_color.clone(),
            },
        };
        WidgetStyle {
            border,
            border_width: self.border_width,
            spacing: self.spacing,
            corner_shape: self.corner_shape,
        }
    }
}

/// Border effect with only the fields meaningful for that effect
#[derive(Clone, Debug, PartialEq)]
pub enum BorderEffect {
    None,
    Shadow { intensity: ShadowIntensity, color: String },
    Glow { intensity: GlowIntensity, color: String },
}

impl BorderEffect {
    pub fn kind(&self) -> BorderEffectKind {
        match self {
            Self::None => BorderEffectKind::None,
            Self::Shadow { .. } => BorderEffectKind::Shadow,
            Self::Glow { .. } => BorderEffectKind::Glow,
        }
    }
}

/// Renderer-facing widget style.
#[derive(Clone, Debug, PartialEq)]
pub struct WidgetStyle {
    pub border: BorderEffect,
    pub border_width: BorderWidth,
    pub spacing: SpacingDensity,
    pub corner_shape: CornerShape,
}

impl WidgetStyle {
    /// CSS-ready `(key, value)` pairs via the enum mapper.
    pub fn output_values(&self) -> Result<Vec<(&'static str, String)>> {
        let mut out = vec![
            ("widgetBorderEffect", self.border.kind().as_str().to_string()),
            (
                "widgetBorderWidth",
                convert_in(MapCategory::BorderWidth, self.border_width.as_str())?.to_string(),
            ),
            (
                "widgetSpacing",
                convert_in(MapCategory::Spacing, self.spacing.as_str())?.to_string(),
            ),
            (
                "widgetRadius",
                convert_in(MapCategory::CornerShape, self.corner_shape.as_str())?.to_string(),
            ),
        ];
        match &self.border {
            BorderEffect::None => {}
            BorderEffect::Shadow { intensity, color } => {
                out.push((
                    "widgetShadow",
                    convert_in(MapCategory::Shadow, intensity.as_str())?.to_string(),
                ));
                out.push(("widgetShadowColor", color.clone()));
            }
            BorderEffect::Glow { intensity, color } => {
                out.push(("widgetGlowColor", color.clone()));
                out.push((
                    "widgetGlowBlurPx",
                    convert_in(MapCategory::GlowBlur, intensity.as_str())?.to_string(),
                ));
                out.push((
                    "widgetGlowOpacity",
                    convert_in(MapCategory::GlowOpacity, intensity.as_str())?.to_string(),
                ));
            }
        }
        Ok(out)
    }
}
