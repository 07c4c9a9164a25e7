//! Per-theme token overrides
//!
//! A theme may carry `theme_data` that replaces selected `core` tokens. Each
//! group maps onto a fixed core subtree:
//!
//! | group        | core path              |
//! |--------------|------------------------|
//! | `color`      | `color.theme.<key>`    |
//! | `typography` | `typography.<key>`     |
//! | `space`      | `space.scale.<key>`    |
//! | `radius`     | `radius.<key>`         |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::tokens::{TokenLeaf, TokenNode};

/// Token overrides stored with a theme record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeData {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub color: BTreeMap<String, String>,
    /// Nested so callers can override `family.sans` or `scale.md`
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub typography: BTreeMap<String, TokenNode>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub space: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub radius: BTreeMap<String, String>,
}

impl ThemeData {
    /// Overrides for the three brand color roles.
    pub fn from_color_roles(primary: &str, secondary: &str, accent: &str) -> Self {
        let mut data = Self::default();
        data.color.insert("primary".to_string(), primary.to_string());
        data.color.insert("secondary".to_string(), secondary.to_string());
        data.color.insert("accent".to_string(), accent.to_string());
        data
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_empty()
            && self.typography.is_empty()
            && self.space.is_empty()
            && self.radius.is_empty()
    }

    /// Flatten into `(core path, leaf)` pairs.
    pub fn core_overrides(&self) -> Vec<(String, TokenLeaf)> {
        let mut out = Vec::new();
        for (key, value) in &self.color {
            out.push((format!("color.theme.{key}"), TokenLeaf::Text(value.clone())));
        }
        for (key, node) in &self.typography {
            flatten_node(&format!("typography.{key}"), node, &mut out);
        }
        for (key, value) in &self.space {
            out.push((format!("space.scale.{key}"), TokenLeaf::Number(*value)));
        }
        for (key, value) in &self.radius {
            out.push((format!("radius.{key}"), TokenLeaf::Text(value.clone())));
        }
        out
    }
}

fn flatten_node(path: &str, node: &TokenNode, out: &mut Vec<(String, TokenLeaf)>) {
    match node {
        TokenNode::Number(n) => out.push((path.to_string(), TokenLeaf::Number(*n))),
        TokenNode::Text(s) => out.push((path.to_string(), TokenLeaf::Text(s.clone()))),
        TokenNode::Group(children) => {
            for (key, child) in children {
                flatten_node(&format!("{path}.{key}"), child, out);
            }
        }
    }
}
