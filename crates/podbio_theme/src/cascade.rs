//! Page -> theme -> default style cascade
//!
//! Every styleable concern is resolved independently by checking the page
//! record, then the theme record, then a built-in default, always in that
//! order. Token references found in either record are resolved against the
//! effective theme's tokens before the value is accepted.

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::cache::{ThemeCache, ThemeSource};
use crate::color::is_valid_color;
use crate::error::Result;
use crate::record::{PageStyleRecord, StyleFields, ThemeId, ThemeRecord};
use crate::theme_data::ThemeData;
use crate::tokens::{ResolvedTokens, TokenBundle};
use crate::widget_style::{SanitizedStyle, StyleDiagnostic, WidgetStyleOptions, COLOR_KEYS};

pub const DEFAULT_PAGE_BACKGROUND: &str = "#f8fafc";
pub const DEFAULT_WIDGET_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_WIDGET_BORDER_COLOR: &str = "#e2e8f0";
pub const DEFAULT_FONT: &str = "Inter";
pub const DEFAULT_SPATIAL_EFFECT: &str = "none";

/// Allowed spatial effects
pub const SPATIAL_EFFECTS: [&str; 4] = ["none", "parallax", "tilt", "float"];

/// Token-derived output keys and the token each one reads.
const TOKEN_OUTPUTS: [(&str, &str); 5] = [
    ("textPrimary", "semantic.text.primary"),
    ("accentColor", "semantic.accent.primary"),
    ("buttonBackground", "component.button.primary.background"),
    ("buttonText", "component.button.primary.text"),
    ("transitionDuration", "component.widget.transition.duration"),
];

/// Which tier supplied a value
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadeSource {
    Page,
    Theme,
    Default,
}

impl CascadeSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Theme => "theme",
            Self::Default => "default",
        }
    }
}

impl Display for CascadeSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum FieldKind {
    Color,
    Font,
    OneOf(&'static [&'static str]),
}

/// A single-valued styleable concern
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum StyleConcern {
    PageBackground,
    WidgetBackground,
    WidgetBorderColor,
    PagePrimaryFont,
    PageSecondaryFont,
    WidgetPrimaryFont,
    WidgetSecondaryFont,
    SpatialEffect,
}

impl StyleConcern {
    pub const ALL: [StyleConcern; 8] = [
        StyleConcern::PageBackground,
        StyleConcern::WidgetBackground,
        StyleConcern::WidgetBorderColor,
        StyleConcern::PagePrimaryFont,
        StyleConcern::PageSecondaryFont,
        StyleConcern::WidgetPrimaryFont,
        StyleConcern::WidgetSecondaryFont,
        StyleConcern::SpatialEffect,
    ];

    /// Key in the resolved style map.
    pub fn output_key(self) -> &'static str {
        match self {
            Self::PageBackground => "pageBackground",
            Self::WidgetBackground => "widgetBackground",
            Self::WidgetBorderColor => "widgetBorderColor",
            Self::PagePrimaryFont => "pagePrimaryFont",
            Self::PageSecondaryFont => "pageSecondaryFont",
            Self::WidgetPrimaryFont => "widgetPrimaryFont",
            Self::WidgetSecondaryFont => "widgetSecondaryFont",
            Self::SpatialEffect => "spatialEffect",
        }
    }

    /// Record field name.
    pub fn field(self) -> &'static str {
        match self {
            Self::PageBackground => "page_background",
            Self::WidgetBackground => "widget_background",
            Self::WidgetBorderColor => "widget_border_color",
            Self::PagePrimaryFont => "page_primary_font",
            Self::PageSecondaryFont => "page_secondary_font",
            Self::WidgetPrimaryFont => "widget_primary_font",
            Self::WidgetSecondaryFont => "widget_secondary_font",
            Self::SpatialEffect => "spatial_effect",
        }
    }

    /// Built-in default, returned verbatim when neither record sets the field.
    pub fn default_value(self) -> &'static str {
        match self {
            Self::PageBackground => DEFAULT_PAGE_BACKGROUND,
            Self::WidgetBackground => DEFAULT_WIDGET_BACKGROUND,
            Self::WidgetBorderColor => DEFAULT_WIDGET_BORDER_COLOR,
            Self::PagePrimaryFont
            | Self::PageSecondaryFont
            | Self::WidgetPrimaryFont
            | Self::WidgetSecondaryFont => DEFAULT_FONT,
            Self::SpatialEffect => DEFAULT_SPATIAL_EFFECT,
        }
    }

    fn kind(self) -> FieldKind {
        match self {
            Self::PageBackground | Self::WidgetBackground | Self::WidgetBorderColor => {
                FieldKind::Color
            }
            Self::PagePrimaryFont
            | Self::PageSecondaryFont
            | Self::WidgetPrimaryFont
            | Self::WidgetSecondaryFont => FieldKind::Font,
            Self::SpatialEffect => FieldKind::OneOf(&SPATIAL_EFFECTS),
        }
    }

    /// The field's value in `fields`, if set and non-blank.
    pub fn read(self, fields: &StyleFields) -> Option<&str> {
        let value = match self {
            Self::PageBackground => &fields.page_background,
            Self::WidgetBackground => &fields.widget_background,
            Self::WidgetBorderColor => &fields.widget_border_color,
            Self::PagePrimaryFont => &fields.page_primary_font,
            Self::PageSecondaryFont => &fields.page_secondary_font,
            Self::WidgetPrimaryFont => &fields.widget_primary_font,
            Self::WidgetSecondaryFont => &fields.widget_secondary_font,
            Self::SpatialEffect => &fields.spatial_effect,
        };
        value.as_deref().map(str::trim).filter(|v| !v.is_empty())
    }

    /// Accept a raw value from one tier, or `None` to fall through.
    fn accept(
        self,
        source: CascadeSource,
        raw: &str,
        tokens: &ResolvedTokens,
    ) -> Result<Option<String>> {
        let at = format!("{source}.{}", self.field());
        let accepted = match self.kind() {
            FieldKind::OneOf(allowed) => allowed.contains(&raw).then(|| raw.to_string()),
            FieldKind::Font => Some(tokens.resolve_value(&at, raw)?),
            FieldKind::Color => {
                let value = tokens.resolve_value(&at, raw)?;
                is_valid_color(&value).then_some(value)
            }
        };
        if accepted.is_none() {
            warn!(field = %at, value = raw, "ignoring invalid style value");
        }
        Ok(accepted)
    }
}

/// A resolved concern and the tier it came from
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CascadedValue {
    pub value: String,
    pub source: CascadeSource,
}

/// Resolve one concern through page -> theme -> default.
pub fn cascade(
    concern: StyleConcern,
    page: &StyleFields,
    theme: Option<&StyleFields>,
    tokens: &ResolvedTokens,
) -> Result<CascadedValue> {
    let tiers = [
        (CascadeSource::Page, Some(page)),
        (CascadeSource::Theme, theme),
    ];
    for (source, fields) in tiers {
        let Some(raw) = fields.and_then(|f| concern.read(f)) else {
            continue;
        };
        if let Some(value) = concern.accept(source, raw, tokens)? {
            return Ok(CascadedValue { value, source });
        }
    }
    Ok(CascadedValue {
        value: concern.default_value().to_string(),
        source: CascadeSource::Default,
    })
}

/// Pick the widget-style bag through page -> theme -> default and sanitize it.
///
/// The first non-empty bag wins as a whole; it is merged over the defaults.
/// Token references in its color entries are resolved before validation.
pub fn cascade_widget_style(
    page: &StyleFields,
    theme: Option<&StyleFields>,
    tokens: &ResolvedTokens,
) -> Result<(SanitizedStyle, CascadeSource)> {
    fn bag(fields: &StyleFields) -> Option<&Map<String, Value>> {
        fields.widget_style.as_ref().filter(|b| !b.is_empty())
    }

    let tiers = [
        (CascadeSource::Page, Some(page)),
        (CascadeSource::Theme, theme),
    ];
    for (source, fields) in tiers {
        if let Some(b) = fields.and_then(bag) {
            let resolved = resolve_bag_colors(source, b, tokens)?;
            return Ok((WidgetStyleOptions::sanitize(&resolved), source));
        }
    }
    Ok((
        WidgetStyleOptions::sanitize(&Map::new()),
        CascadeSource::Default,
    ))
}

fn resolve_bag_colors(
    source: CascadeSource,
    bag: &Map<String, Value>,
    tokens: &ResolvedTokens,
) -> Result<Map<String, Value>> {
    let mut out = bag.clone();
    for key in COLOR_KEYS {
        if let Some(Value::String(raw)) = bag.get(key) {
            let at = format!("{source}.widget_style.{key}");
            let value = tokens.resolve_value(&at, raw.trim())?;
            out.insert(key.to_string(), Value::String(value));
        }
    }
    Ok(out)
}

/// Flat map of final style values, ready for a renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedStyleMap {
    values: IndexMap<&'static str, String>,
    sources: IndexMap<&'static str, CascadeSource>,
    widget_style: WidgetStyleOptions,
    diagnostics: Vec<StyleDiagnostic>,
}

impl ResolvedStyleMap {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Which tier supplied a cascaded key (token-derived keys have none).
    pub fn source(&self, key: &str) -> Option<CascadeSource> {
        self.sources.get(key).copied()
    }

    pub fn values(&self) -> &IndexMap<&'static str, String> {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The complete widget-style options, suitable for persistence.
    pub fn widget_style(&self) -> &WidgetStyleOptions {
        &self.widget_style
    }

    /// Entries dropped from the widget-style bag.
    pub fn diagnostics(&self) -> &[StyleDiagnostic] {
        &self.diagnostics
    }

    fn insert(&mut self, key: &'static str, value: String, source: Option<CascadeSource>) {
        self.values.insert(key, value);
        if let Some(source) = source {
            self.sources.insert(key, source);
        }
    }
}

/// State for one resolution pass (typically one request).
///
/// Memoizes resolved token sets per theme and style maps per
/// `(page_id, theme_id)`. Theme rows come through the shared [`ThemeCache`].
pub struct ResolutionContext<'a> {
    bundle: &'a TokenBundle,
    themes: &'a dyn ThemeSource,
    cache: &'a ThemeCache,
    tokens: FxHashMap<Option<ThemeId>, (ThemeData, Arc<ResolvedTokens>)>,
    styles: FxHashMap<(i64, Option<ThemeId>), Arc<ResolvedStyleMap>>,
}

impl<'a> ResolutionContext<'a> {
    /// Context over the built-in token bundle.
    pub fn new(themes: &'a dyn ThemeSource, cache: &'a ThemeCache) -> Self {
        Self::with_bundle(TokenBundle::builtin(), themes, cache)
    }

    pub fn with_bundle(
        bundle: &'a TokenBundle,
        themes: &'a dyn ThemeSource,
        cache: &'a ThemeCache,
    ) -> Self {
        Self {
            bundle,
            themes,
            cache,
            tokens: FxHashMap::default(),
            styles: FxHashMap::default(),
        }
    }

    /// Theme by id, through the shared cache.
    pub fn theme(&self, id: ThemeId) -> Option<Arc<ThemeRecord>> {
        self.cache.get_or_fetch(id, self.themes)
    }

    /// Resolved tokens for a theme (the base bundle plus its `theme_data`).
    ///
    /// Memoized per theme id; a record whose overrides differ from the memoized
    /// ones (an unsaved edit under the same id) is resolved afresh.
    pub fn tokens_for(&mut self, theme: Option<&ThemeRecord>) -> Result<Arc<ResolvedTokens>> {
        let overrides = theme.and_then(|t| {
            t.theme_data
                .as_ref()
                .filter(|d| !d.is_empty())
                .map(|d| (t.id, d))
        });
        let key = overrides.map(|(id, _)| id);
        if let Some((data, tokens)) = self.tokens.get(&key) {
            if overrides.map_or(true, |(_, current)| current == data) {
                return Ok(Arc::clone(tokens));
            }
        }
        let (data, resolved) = match overrides {
            Some((_, data)) => (data.clone(), self.bundle.with_theme_data(data).resolve()?),
            None => (ThemeData::default(), self.bundle.resolve()?),
        };
        let resolved = Arc::new(resolved);
        self.tokens.insert(key, (data, Arc::clone(&resolved)));
        Ok(resolved)
    }

    /// Resolve a page, fetching its theme by `theme_id`.
    ///
    /// A `theme_id` that no longer exists resolves as if no theme were set.
    pub fn resolve_page(&mut self, page: &PageStyleRecord) -> Result<Arc<ResolvedStyleMap>> {
        let memo_key = (page.page_id, page.theme_id);
        if let Some(styles) = self.styles.get(&memo_key) {
            return Ok(Arc::clone(styles));
        }
        let theme = match page.theme_id {
            Some(id) => {
                let theme = self.theme(id);
                if theme.is_none() {
                    warn!(page_id = page.page_id, theme_id = %id, "page references unknown theme");
                }
                theme
            }
            None => None,
        };
        let styles = Arc::new(self.resolve(page, theme.as_deref())?);
        self.styles.insert(memo_key, Arc::clone(&styles));
        Ok(styles)
    }

    /// Resolve a page against an explicitly supplied theme record.
    pub fn resolve(
        &mut self,
        page: &PageStyleRecord,
        theme: Option<&ThemeRecord>,
    ) -> Result<ResolvedStyleMap> {
        let tokens = self.tokens_for(theme)?;
        let theme_fields = theme.map(|t| &t.style);
        let mut out = ResolvedStyleMap::default();

        for concern in StyleConcern::ALL {
            let resolved = cascade(concern, &page.style, theme_fields, &tokens)?;
            out.insert(concern.output_key(), resolved.value, Some(resolved.source));
        }

        let (sanitized, source) = cascade_widget_style(&page.style, theme_fields, &tokens)?;
        for (key, value) in sanitized.options.to_style().output_values()? {
            out.insert(key, value, Some(source));
        }
        out.widget_style = sanitized.options;
        out.diagnostics = sanitized.diagnostics;

        for (key, token) in TOKEN_OUTPUTS {
            let value = tokens.lookup(token)?;
            out.insert(key, value.to_string(), None);
        }

        debug!(
            page_id = page.page_id,
            theme_id = ?theme.map(|t| t.id),
            values = out.len(),
            "resolved page style"
        );
        Ok(out)
    }
}
