//! Subcommand implementations
//!
//! Each command builds its output as a string or JSON value so `main` only
//! has to print it.

use anyhow::{Context, Result};
use podbio_palette::{ExtractorConfig, ImageSource, PaletteExtractor};
use podbio_theme::{
    InMemoryThemes, Layer, PageStyleRecord, ResolutionContext, ResolvedStyleMap, ThemeCache,
    ThemeData, ThemeRecord, TokenBundle, WidgetStyleOptions,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{PodbioConfig, CONFIG_FILE};

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Theme records from a JSON array file.
pub fn load_themes(path: &Path) -> Result<InMemoryThemes> {
    let records: Vec<ThemeRecord> = read_json(path)?;
    debug!(count = records.len(), path = %path.display(), "loaded theme records");
    Ok(records.into_iter().collect())
}

fn parse_layer(name: &str) -> Result<Layer> {
    Layer::ALL
        .iter()
        .copied()
        .find(|layer| layer.as_str() == name)
        .with_context(|| format!("Unknown layer `{name}` (expected core, semantic, or component)"))
}

/// `podbio tokens`: every resolved token as `layer.path = value`, sorted.
pub fn tokens(theme_data: Option<&ThemeData>, layer: Option<&str>) -> Result<String> {
    let only = layer.map(parse_layer).transpose()?;
    let bundle = TokenBundle::builtin();
    let resolved = match theme_data {
        Some(data) => bundle.with_theme_data(data).resolve()?,
        None => bundle.resolve()?,
    };

    let mut out = String::new();
    for (layer, path, value) in resolved.entries() {
        if only.is_some_and(|only| only != layer) {
            continue;
        }
        out.push_str(&format!("{layer}.{path} = {value}\n"));
    }
    Ok(out)
}

/// `podbio resolve`: the flat style map for one page.
///
/// An explicit `theme` is used as-is; otherwise the page's `theme_id` is looked
/// up in `themes`.
pub fn resolve(
    page: &PageStyleRecord,
    theme: Option<&ThemeRecord>,
    themes: &InMemoryThemes,
    with_sources: bool,
) -> Result<Value> {
    let cache = ThemeCache::new();
    let mut ctx = ResolutionContext::new(themes, &cache);
    let styles = match theme {
        Some(theme) => ctx.resolve(page, Some(theme))?,
        None => ctx.resolve_page(page)?.as_ref().clone(),
    };
    Ok(style_json(&styles, with_sources))
}

fn style_json(styles: &ResolvedStyleMap, with_sources: bool) -> Value {
    let mut out = Map::new();
    for (key, value) in styles.iter() {
        let entry = if with_sources {
            let source = styles.source(key).map_or("token", |source| source.as_str());
            json!({ "value": value, "source": source })
        } else {
            Value::String(value.to_string())
        };
        out.insert(key.to_string(), entry);
    }
    Value::Object(out)
}

/// `podbio sanitize`: validated widget style options plus dropped entries.
pub fn sanitize(bag: &Map<String, Value>) -> Value {
    let sanitized = WidgetStyleOptions::sanitize(bag);
    let diagnostics: Vec<String> = sanitized
        .diagnostics
        .iter()
        .map(ToString::to_string)
        .collect();
    json!({
        "options": sanitized.options.to_map(),
        "diagnostics": diagnostics,
    })
}

/// `podbio palette`: color roles for an image, optionally as `theme_data`.
pub fn palette(image: &str, config: &ExtractorConfig, as_theme_data: bool) -> Result<Value> {
    let source = ImageSource::from_uri(image)?;
    let roles = PaletteExtractor::new(config.clone()).extract_source(&source);
    let value = if as_theme_data {
        let data = ThemeData::from_color_roles(&roles.primary, &roles.secondary, &roles.accent);
        serde_json::to_value(data)?
    } else {
        serde_json::to_value(roles)?
    };
    Ok(value)
}

/// `podbio init`: write a default podbio.toml into `dir`.
pub fn init(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            path.display()
        );
    }
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    fs::write(&path, PodbioConfig::default().to_toml()?)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!(path = %path.display(), "wrote default config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use podbio_theme::ThemeId;
    use pretty_assertions::assert_eq;

    #[test]
    fn tokens_lists_every_layer_sorted() {
        let text = tokens(None, None).unwrap();
        assert!(text.contains("core.color.base.slate-900 = #091227\n"));
        assert!(text.contains("component.link.hover = #0066ff\n"));
        let core_pos = text.find("core.").unwrap();
        let component_pos = text.find("component.").unwrap();
        assert!(core_pos < component_pos);
    }

    #[test]
    fn tokens_filters_by_layer_and_applies_overrides() {
        let data = ThemeData::from_color_roles("#112233", "#ffffff", "#ff00aa");
        let text = tokens(Some(&data), Some("core")).unwrap();
        assert!(text.contains("core.color.theme.primary = #112233\n"));
        assert!(text.lines().all(|line| line.starts_with("core.")));
        assert!(tokens(None, Some("brand")).is_err());
    }

    #[test]
    fn resolve_uses_theme_lookup_and_explicit_theme() {
        let mut theme = ThemeRecord::new(7, "Dusk");
        theme.style.widget_background = Some("#112233".into());
        let themes: InMemoryThemes = [theme.clone()].into_iter().collect();

        let mut page = PageStyleRecord::new(1);
        page.theme_id = Some(ThemeId(7));
        let out = resolve(&page, None, &themes, false).unwrap();
        assert_eq!(out["widgetBackground"], "#112233");
        assert_eq!(out["pageBackground"], "#f8fafc");

        let page = PageStyleRecord::new(2);
        let out = resolve(&page, Some(&theme), &InMemoryThemes::new(), true).unwrap();
        assert_eq!(
            out["widgetBackground"],
            json!({ "value": "#112233", "source": "theme" })
        );
    }

    #[test]
    fn sanitize_reports_dropped_entries() {
        let bag = json!({ "border_effect": "glow", "spacing": "huge", "extra": "x" });
        let out = sanitize(bag.as_object().unwrap());
        assert_eq!(out["options"]["border_effect"], "glow");
        assert_eq!(out["options"]["spacing"], "comfortable");
        assert_eq!(out["diagnostics"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn palette_of_unreadable_file_is_fallback() {
        let out = palette("/no/such/cover.png", &ExtractorConfig::default(), false).unwrap();
        assert_eq!(
            out,
            json!({ "primary": "#000000", "secondary": "#ffffff", "accent": "#0066ff" })
        );
        let out = palette("/no/such/cover.png", &ExtractorConfig::default(), true).unwrap();
        assert_eq!(out["color"]["accent"], "#0066ff");
        assert!(palette("https://cdn.example.com/a.png", &ExtractorConfig::default(), false).is_err());
    }
}
