//! podbio Theme Engine
//!
//! Turns a page's style overrides, its assigned theme, and the built-in
//! defaults into one flat map of renderable style values.
//!
//! # Overview
//!
//! - **Design tokens**: a three-tier bundle (`core` -> `semantic` -> `component`)
//!   whose leaves are literals or dotted references into earlier tiers
//! - **Reference resolution**: strict layer ordering, bounded component passes,
//!   unit formatting by category (`rem` for scales, `ms` for durations)
//! - **Style cascade**: page -> theme -> default for each styleable concern
//! - **Widget styles**: schema-validated effect options merged over defaults
//! - **Enum mapping**: fixed tables from style choices to CSS-ready values
//!
//! # Quick Start
//!
//! ```rust
//! use podbio_theme::{InMemoryThemes, PageStyleRecord, ResolutionContext, ThemeCache, ThemeId, ThemeRecord};
//!
//! let mut theme = ThemeRecord::new(1, "Midnight");
//! theme.style.widget_background = Some("#112233".into());
//! let themes: InMemoryThemes = [theme].into_iter().collect();
//! let cache = ThemeCache::new();
//!
//! let mut page = PageStyleRecord::new(42);
//! page.theme_id = Some(ThemeId(1));
//!
//! let mut ctx = ResolutionContext::new(&themes, &cache);
//! let styles = ctx.resolve_page(&page).unwrap();
//! assert_eq!(styles.get("widgetBackground"), Some("#112233"));
//! ```
//!
//! # Errors
//!
//! Broken token references and enum mapping gaps are returned as
//! [`ThemeError`]s naming the offending path. Invalid widget-style entries are
//! not errors: they are dropped and reported as [`StyleDiagnostic`]s.

pub mod cache;
pub mod cascade;
pub mod color;
pub mod error;
pub mod mapper;
pub mod record;
pub mod theme_data;
pub mod tokens;
pub mod widget_style;

// Re-export commonly used types
pub use cache::{InMemoryThemes, ThemeCache, ThemeSource};
pub use cascade::{
    cascade, cascade_widget_style, CascadeSource, CascadedValue, ResolutionContext,
    ResolvedStyleMap, StyleConcern,
};
pub use color::{is_css_variable_ref, is_valid_color};
pub use error::{Result, ThemeError};
pub use mapper::{convert, convert_in, MapCategory};
pub use record::{PageStyleRecord, StyleFields, ThemeId, ThemeRecord};
pub use theme_data::ThemeData;
pub use tokens::*;
pub use widget_style::{
    BorderEffect, BorderEffectKind, BorderWidth, CornerShape, GlowIntensity, SanitizedStyle,
    ShadowIntensity, SpacingDensity, StyleDiagnostic, StyleIssue, WidgetStyle, WidgetStyleOptions,
    COLOR_KEYS, SCHEMA_KEYS,
};
