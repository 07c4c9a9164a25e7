//! Token bundle storage

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};
use crate::theme_data::ThemeData;
use crate::tokens::reference::ResolvedTokens;

/// Built-in token document, embedded at compile time
const BUILTIN_BUNDLE: &str = include_str!("builtin.toml");

/// Parsed built-in bundle, shared process-wide and never mutated
static BUILTIN: OnceLock<TokenBundle> = OnceLock::new();

/// Token layer names
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub enum Layer {
    Core,
    Semantic,
    Component,
}

impl Layer {
    /// All layers in resolution order.
    pub const ALL: [Layer; 3] = [Layer::Core, Layer::Semantic, Layer::Component];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Semantic => "semantic",
            Self::Component => "component",
        }
    }

    /// Layers this layer may reference.
    pub fn may_reference(self, target: Layer) -> bool {
        match self {
            Self::Core => false,
            Self::Semantic => target == Layer::Core,
            Self::Component => true,
        }
    }
}

impl Display for Layer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in a token tree: either a group of children or a leaf value
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenNode {
    Number(f64),
    Text(String),
    Group(BTreeMap<String, TokenNode>),
}

/// A flattened leaf value
#[derive(Clone, Debug, PartialEq)]
pub enum TokenLeaf {
    Number(f64),
    Text(String),
}

impl From<TokenLeaf> for TokenNode {
    fn from(leaf: TokenLeaf) -> Self {
        match leaf {
            TokenLeaf::Number(n) => TokenNode::Number(n),
            TokenLeaf::Text(s) => TokenNode::Text(s),
        }
    }
}

/// The three-tier token bundle.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenBundle {
    #[serde(default)]
    pub core: BTreeMap<String, TokenNode>,
    #[serde(default)]
    pub semantic: BTreeMap<String, TokenNode>,
    #[serde(default)]
    pub component: BTreeMap<String, TokenNode>,
}

impl TokenBundle {
    /// The system default bundle.
    ///
    /// Parsed once per process from the embedded TOML document.
    pub fn builtin() -> &'static TokenBundle {
        BUILTIN.get_or_init(|| {
            Self::from_toml(BUILTIN_BUNDLE).expect("built-in token bundle is valid TOML")
        })
    }

    /// Parse a bundle from a TOML document with `[core]`, `[semantic]`, `[component]` tables.
    pub fn from_toml(src: &str) -> Result<Self> {
        toml::from_str(src).map_err(|e| ThemeError::InvalidBundle(e.to_string()))
    }

    /// Parse a bundle from a JSON document.
    pub fn from_json(src: &str) -> Result<Self> {
        serde_json::from_str(src).map_err(|e| ThemeError::InvalidBundle(e.to_string()))
    }

    pub fn layer(&self, layer: Layer) -> &BTreeMap<String, TokenNode> {
        match layer {
            Layer::Core => &self.core,
            Layer::Semantic => &self.semantic,
            Layer::Component => &self.component,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut BTreeMap<String, TokenNode> {
        match layer {
            Layer::Core => &mut self.core,
            Layer::Semantic => &mut self.semantic,
            Layer::Component => &mut self.component,
        }
    }

    /// Flatten one layer into dotted paths.
    pub fn flatten(&self, layer: Layer) -> BTreeMap<String, TokenLeaf> {
        let mut out = BTreeMap::new();
        flatten_into("", self.layer(layer), &mut out);
        out
    }

    /// Insert or replace a leaf at a dotted path, creating groups as needed.
    ///
    /// A leaf standing where a group is needed is replaced by the group.
    pub fn set(&mut self, layer: Layer, path: &str, leaf: TokenLeaf) {
        let mut segments = path.split('.').peekable();
        let mut node = self.layer_mut(layer);
        while let Some(segment) = segments.next() {
            if segments.peek().is_none() {
                node.insert(segment.to_string(), leaf.into());
                return;
            }
            let child = node
                .entry(segment.to_string())
                .or_insert_with(|| TokenNode::Group(BTreeMap::new()));
            if !matches!(child, TokenNode::Group(_)) {
                *child = TokenNode::Group(BTreeMap::new());
            }
            node = match child {
                TokenNode::Group(children) => children,
                _ => unreachable!("child was just made a group"),
            };
        }
    }

    /// Count leaves across all layers.
    pub fn leaf_count(&self) -> usize {
        Layer::ALL.iter().map(|l| self.flatten(*l).len()).sum()
    }

    /// Derive a bundle with theme overrides laid over `core`.
    pub fn with_theme_data(&self, data: &ThemeData) -> TokenBundle {
        let mut bundle = self.clone();
        for (path, leaf) in data.core_overrides() {
            bundle.set(Layer::Core, &path, leaf);
        }
        bundle
    }

    /// Resolve every leaf of every layer.
    pub fn resolve(&self) -> Result<ResolvedTokens> {
        ResolvedTokens::resolve(self)
    }
}

fn flatten_into(prefix: &str, nodes: &BTreeMap<String, TokenNode>, out: &mut BTreeMap<String, TokenLeaf>) {
    for (key, node) in nodes {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match node {
            TokenNode::Number(n) => {
                out.insert(path, TokenLeaf::Number(*n));
            }
            TokenNode::Text(s) => {
                out.insert(path, TokenLeaf::Text(s.clone()));
            }
            TokenNode::Group(children) => flatten_into(&path, children, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_bundle_parses() {
        let bundle = TokenBundle::builtin();
        assert!(!bundle.core.is_empty());
        assert!(!bundle.semantic.is_empty());
        assert!(!bundle.component.is_empty());
    }

    #[test]
    fn flatten_produces_dotted_paths() {
        let bundle = TokenBundle::builtin();
        let core = bundle.flatten(Layer::Core);
        assert_eq!(
            core.get("color.base.slate-900"),
            Some(&TokenLeaf::Text("#091227".to_string()))
        );
        assert_eq!(core.get("space.scale.md"), Some(&TokenLeaf::Number(1.0)));
    }

    #[test]
    fn set_creates_and_replaces_groups() {
        let mut bundle = TokenBundle::default();
        bundle.set(Layer::Core, "color.theme.primary", TokenLeaf::Text("#123456".into()));
        bundle.set(Layer::Core, "radius", TokenLeaf::Text("4px".into()));
        bundle.set(Layer::Core, "radius.card", TokenLeaf::Text("8px".into()));

        let core = bundle.flatten(Layer::Core);
        assert_eq!(core.len(), 2);
        assert_eq!(
            core.get("color.theme.primary"),
            Some(&TokenLeaf::Text("#123456".into()))
        );
        assert_eq!(core.get("radius.card"), Some(&TokenLeaf::Text("8px".into())));
    }

    #[test]
    fn unknown_top_level_table_is_rejected() {
        let err = TokenBundle::from_toml("[brand]\nprimary = \"#fff\"").unwrap_err();
        assert!(matches!(err, ThemeError::InvalidBundle(_)));
    }

    #[test]
    fn core_layer_may_not_reference_anything() {
        assert!(!Layer::Core.may_reference(Layer::Core));
        assert!(Layer::Semantic.may_reference(Layer::Core));
        assert!(!Layer::Semantic.may_reference(Layer::Semantic));
        assert!(Layer::Component.may_reference(Layer::Component));
    }
}
