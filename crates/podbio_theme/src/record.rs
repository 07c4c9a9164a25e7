//! Page and theme records consumed by the resolver
//!
//! These mirror the rows persisted by the page and theme endpoints. All style
//! fields are optional; `None` or an empty string means "not set here".

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::theme_data::ThemeData;

/// Theme row id
#[derive(
    Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ThemeId(pub i64);

impl Display for ThemeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Styleable fields shared by pages and themes
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleFields {
    pub page_background: Option<String>,
    pub widget_background: Option<String>,
    pub widget_border_color: Option<String>,
    pub page_primary_font: Option<String>,
    pub page_secondary_font: Option<String>,
    pub widget_primary_font: Option<String>,
    pub widget_secondary_font: Option<String>,
    /// Untrusted widget-style bag, sanitized on use
    pub widget_style: Option<Map<String, Value>>,
    pub spatial_effect: Option<String>,
}

/// A page's style overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PageStyleRecord {
    pub page_id: i64,
    #[serde(default)]
    pub theme_id: Option<ThemeId>,
    #[serde(flatten)]
    pub style: StyleFields,
}

impl PageStyleRecord {
    pub fn new(page_id: i64) -> Self {
        Self {
            page_id,
            ..Self::default()
        }
    }
}

/// A system (`user_id == None`) or user-owned theme.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ThemeRecord {
    pub id: ThemeId,
    pub name: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(flatten)]
    pub style: StyleFields,
    #[serde(default)]
    pub theme_data: Option<ThemeData>,
}

impl ThemeRecord {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: ThemeId(id),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn is_system(&self) -> bool {
        self.user_id.is_none()
    }
}
