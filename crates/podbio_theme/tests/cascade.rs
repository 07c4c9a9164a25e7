use std::sync::atomic::{AtomicUsize, Ordering};

use podbio_theme::{
    CascadeSource, InMemoryThemes, PageStyleRecord, ResolutionContext, StyleConcern, ThemeCache,
    ThemeData, ThemeError, ThemeId, ThemeRecord, ThemeSource, TokenBundle, SCHEMA_KEYS,
};
use pretty_assertions::assert_eq;
use serde_json::json;

struct CountingThemes {
    inner: InMemoryThemes,
    fetches: AtomicUsize,
}

impl ThemeSource for CountingThemes {
    fn fetch_theme(&self, id: ThemeId) -> Option<ThemeRecord> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_theme(id)
    }
}

fn midnight() -> ThemeRecord {
    serde_json::from_value(json!({
        "id": 1,
        "name": "Midnight",
        "page_background": "linear-gradient(135deg, #0f172a 0%, #1e293b 100%)",
        "widget_background": "#112233",
        "widget_border_color": "semantic.accent.primary",
        "page_primary_font": "semantic.font.heading",
        "spatial_effect": "parallax",
        "widget_style": { "border_effect": "glow", "glow_intensity": "pronounced" },
        "theme_data": { "color": { "primary": "#ff0066" } }
    }))
    .unwrap()
}

fn page(value: serde_json::Value) -> PageStyleRecord {
    serde_json::from_value(value).unwrap()
}

#[test]
fn page_value_wins_for_every_concern() {
    let theme = midnight();
    let page = page(json!({
        "page_id": 1,
        "page_background": "#000000",
        "widget_background": "#010101",
        "widget_border_color": "#020202",
        "page_primary_font": "Lora",
        "page_secondary_font": "Lora",
        "widget_primary_font": "Lora",
        "widget_secondary_font": "Lora",
        "spatial_effect": "tilt"
    }));
    let themes = InMemoryThemes::new();
    let cache = ThemeCache::new();
    let mut ctx = ResolutionContext::new(&themes, &cache);
    let styles = ctx.resolve(&page, Some(&theme)).unwrap();

    for concern in StyleConcern::ALL {
        assert_eq!(
            styles.source(concern.output_key()),
            Some(CascadeSource::Page),
            "{concern:?}"
        );
    }
    assert_eq!(styles.get("pageBackground"), Some("#000000"));
    assert_eq!(styles.get("spatialEffect"), Some("tilt"));
}

#[test]
fn theme_value_used_when_page_is_silent() {
    let theme = midnight();
    let page = page(json!({ "page_id": 2, "widget_background": null }));
    let themes = InMemoryThemes::new();
    let cache = ThemeCache::new();
    let mut ctx = ResolutionContext::new(&themes, &cache);
    let styles = ctx.resolve(&page, Some(&theme)).unwrap();

    assert_eq!(styles.get("widgetBackground"), Some("#112233"));
    // reference resolved against the theme's own token overrides
    assert_eq!(styles.get("widgetBorderColor"), Some("#ff0066"));
    assert_eq!(styles.get("pagePrimaryFont"), Some("Poppins, Inter, sans-serif"));
    assert_eq!(styles.get("accentColor"), Some("#ff0066"));
    assert_eq!(styles.get("widgetGlowBlurPx"), Some("16px"));
    assert_eq!(styles.source("widgetGlowBlurPx"), Some(CascadeSource::Theme));
}

#[test]
fn defaults_used_when_both_are_silent() {
    let themes = InMemoryThemes::new();
    let cache = ThemeCache::new();
    let mut ctx = ResolutionContext::new(&themes, &cache);
    let styles = ctx.resolve(&PageStyleRecord::new(3), None).unwrap();

    for concern in StyleConcern::ALL {
        assert_eq!(styles.get(concern.output_key()), Some(concern.default_value()));
        assert_eq!(styles.source(concern.output_key()), Some(CascadeSource::Default));
    }
    assert_eq!(styles.get("widgetBackground"), Some("#ffffff"));
    assert_eq!(styles.get("widgetBorderEffect"), Some("none"));
    assert_eq!(styles.get("widgetGlowColor"), None);
    assert_eq!(styles.get("textPrimary"), Some("#091227"));
}

#[test]
fn fonts_and_backgrounds_cascade_independently() {
    let mut theme = ThemeRecord::new(4, "Serif");
    theme.style.page_primary_font = Some("Merriweather".into());
    let page = page(json!({ "page_id": 4, "page_background": "#123456" }));
    let themes = InMemoryThemes::new();
    let cache = ThemeCache::new();
    let mut ctx = ResolutionContext::new(&themes, &cache);
    let styles = ctx.resolve(&page, Some(&theme)).unwrap();

    assert_eq!(styles.get("pageBackground"), Some("#123456"));
    assert_eq!(styles.get("pagePrimaryFont"), Some("Merriweather"));
    assert_eq!(styles.get("pageSecondaryFont"), Some("Inter"));
}

#[test]
fn theme_id_lookups_hit_the_cache() {
    let themes = CountingThemes {
        inner: [midnight()].into_iter().collect(),
        fetches: AtomicUsize::new(0),
    };
    let cache = ThemeCache::new();
    let mut ctx = ResolutionContext::new(&themes, &cache);

    for page_id in 10..15 {
        let page = page(json!({ "page_id": page_id, "theme_id": 1 }));
        let styles = ctx.resolve_page(&page).unwrap();
        assert_eq!(styles.get("widgetBackground"), Some("#112233"));
    }
    assert_eq!(themes.fetches.load(Ordering::SeqCst), 1);

    // a second context sharing the cache does not refetch either
    let mut other = ResolutionContext::new(&themes, &cache);
    other
        .resolve_page(&page(json!({ "page_id": 99, "theme_id": 1 })))
        .unwrap();
    assert_eq!(themes.fetches.load(Ordering::SeqCst), 1);

    cache.invalidate(ThemeId(1));
    let mut fresh = ResolutionContext::new(&themes, &cache);
    fresh
        .resolve_page(&page(json!({ "page_id": 99, "theme_id": 1 })))
        .unwrap();
    assert_eq!(themes.fetches.load(Ordering::SeqCst), 2);
}

#[test]
fn unknown_theme_id_resolves_like_no_theme() {
    let themes = InMemoryThemes::new();
    let cache = ThemeCache::new();
    let mut ctx = ResolutionContext::new(&themes, &cache);
    let styles = ctx
        .resolve_page(&page(json!({ "page_id": 1, "theme_id": 404 })))
        .unwrap();
    assert_eq!(styles.get("widgetBackground"), Some("#ffffff"));
}

#[test]
fn invalid_widget_style_entries_do_not_block_resolution() {
    let page = page(json!({
        "page_id": 6,
        "widget_style": { "border_effect": "glow", "unknown_key": "x", "glow_color": "nope" }
    }));
    let themes = InMemoryThemes::new();
    let cache = ThemeCache::new();
    let mut ctx = ResolutionContext::new(&themes, &cache);
    let styles = ctx.resolve(&page, None).unwrap();

    assert_eq!(styles.get("widgetBorderEffect"), Some("glow"));
    assert_eq!(styles.get("widgetGlowColor"), Some("#0066ff"));
    assert_eq!(styles.get("widgetGlowBlurPx"), Some("8px"));
    assert_eq!(styles.diagnostics().len(), 2);

    let persisted = styles.widget_style().to_map();
    assert_eq!(persisted.len(), SCHEMA_KEYS.len());
    assert!(!persisted.contains_key("unknown_key"));
}

#[test]
fn palette_overrides_flow_into_resolved_styles() {
    let mut theme = ThemeRecord::new(7, "From artwork");
    theme.theme_data = Some(ThemeData::from_color_roles("#1a2b3c", "#f0e0d0", "#cc3366"));
    let themes = InMemoryThemes::new();
    let cache = ThemeCache::new();
    let mut ctx = ResolutionContext::new(&themes, &cache);
    let styles = ctx.resolve(&PageStyleRecord::new(7), Some(&theme)).unwrap();

    assert_eq!(styles.get("accentColor"), Some("#1a2b3c"));
    assert_eq!(styles.get("buttonBackground"), Some("#1a2b3c"));
}

#[test]
fn example_widget_background_cascade() {
    let mut theme = ThemeRecord::new(8, "Example");
    theme.style.widget_background = Some("#112233".into());
    let page = page(json!({ "page_id": 8, "widget_background": null }));
    let themes = InMemoryThemes::new();
    let cache = ThemeCache::new();
    let mut ctx = ResolutionContext::new(&themes, &cache);

    let with_theme = ctx.resolve(&page, Some(&theme)).unwrap();
    assert_eq!(with_theme.get("widgetBackground"), Some("#112233"));

    let without_theme = ctx.resolve(&page, None).unwrap();
    assert_eq!(without_theme.get("widgetBackground"), Some("#ffffff"));
}

#[test]
fn theme_widget_style_color_references_resolve() {
    let mut theme = ThemeRecord::new(10, "Rose");
    theme.style.widget_style = json!({ "border_effect": "glow", "glow_color": "color.base.rose-500" })
        .as_object()
        .cloned();
    let themes = InMemoryThemes::new();
    let cache = ThemeCache::new();
    let mut ctx = ResolutionContext::new(&themes, &cache);
    let styles = ctx.resolve(&PageStyleRecord::new(10), Some(&theme)).unwrap();

    assert_eq!(styles.get("widgetGlowColor"), Some("#f43f5e"));
    assert_eq!(styles.source("widgetGlowColor"), Some(CascadeSource::Theme));
    assert!(styles.diagnostics().is_empty());
}

#[test]
fn bundle_without_output_tokens_is_an_error() {
    let bundle = TokenBundle::from_toml("[core.color]\nwhite = \"#ffffff\"\n").unwrap();
    let themes = InMemoryThemes::new();
    let cache = ThemeCache::new();
    let mut ctx = ResolutionContext::with_bundle(&bundle, &themes, &cache);

    let err = ctx.resolve(&PageStyleRecord::new(11), None).unwrap_err();
    assert_eq!(
        err,
        ThemeError::MissingReference {
            path: "semantic.text.primary".into(),
            target: "semantic.text.primary".into(),
        }
    );
}
