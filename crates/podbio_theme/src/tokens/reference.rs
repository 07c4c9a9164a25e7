//! Reference resolution across token layers
//!
//! Layers resolve in strict order so a reference can only ever point at
//! something already settled. `component` leaves may point at each other,
//! resolved in a bounded number of passes.

use std::fmt::{Display, Formatter};

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::error::{Result, ThemeError};
use crate::tokens::{Category, Layer, TokenBundle, TokenLeaf};

/// Passes allowed for component-to-component references
const MAX_COMPONENT_PASSES: usize = 2;

/// A normalized reference to a token path in a specific layer
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TokenRef {
    pub layer: Layer,
    /// Path relative to the layer root
    pub path: String,
}

impl TokenRef {
    pub fn new(layer: Layer, path: impl Into<String>) -> Self {
        Self {
            layer,
            path: path.into(),
        }
    }
}

impl Display for TokenRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.layer, self.path)
    }
}

/// Whether a string looks like a dotted token path.
///
/// Two or more dot-separated lowercase segments; the first must start with a
/// letter. Font stacks, hex colors, CSS functions and plain words never match.
pub fn is_reference_shaped(value: &str) -> bool {
    let mut segments = value.split('.');
    let Some(first) = segments.next() else {
        return false;
    };
    let first_ok = first
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase())
        && first.chars().all(is_segment_char);
    if !first_ok {
        return false;
    }
    let mut rest = 0;
    for segment in segments {
        if segment.is_empty() || !segment.chars().all(is_segment_char) {
            return false;
        }
        rest += 1;
    }
    rest > 0
}

fn is_segment_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'
}

/// Interpret a raw string value found at `at`.
///
/// Returns `Ok(None)` for literals, the normalized reference for
/// reference-shaped values with a known prefix, and an error otherwise.
pub fn parse_reference(at: &str, value: &str) -> Result<Option<TokenRef>> {
    if !is_reference_shaped(value) {
        return Ok(None);
    }
    let (head, rest) = value
        .split_once('.')
        .ok_or_else(|| unknown_prefix(at, value))?;
    let reference = match head {
        "core" => TokenRef::new(Layer::Core, rest),
        "semantic" => TokenRef::new(Layer::Semantic, rest),
        "component" => TokenRef::new(Layer::Component, rest),
        "color" | "space" => TokenRef::new(Layer::Core, value),
        "type" => TokenRef::new(Layer::Core, format!("typography.{rest}")),
        _ => return Err(unknown_prefix(at, value)),
    };
    Ok(Some(reference))
}

fn unknown_prefix(at: &str, value: &str) -> ThemeError {
    ThemeError::UnknownPrefix {
        path: at.to_string(),
        reference: value.to_string(),
    }
}

/// Every leaf of a bundle, resolved to a literal output string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolvedTokens {
    core: FxHashMap<String, String>,
    semantic: FxHashMap<String, String>,
    component: FxHashMap<String, String>,
}

impl ResolvedTokens {
    /// Resolve a bundle layer by layer.
    pub fn resolve(bundle: &TokenBundle) -> Result<Self> {
        let mut resolved = Self::default();
        for layer in Layer::ALL {
            resolved.resolve_layer(bundle, layer)?;
            debug!(
                layer = %layer,
                tokens = resolved.layer(layer).len(),
                "resolved token layer"
            );
        }
        Ok(resolved)
    }

    fn resolve_layer(&mut self, bundle: &TokenBundle, layer: Layer) -> Result<()> {
        let leaves = bundle.flatten(layer);
        let mut pending: Vec<(String, TokenRef)> = Vec::new();

        for (path, leaf) in &leaves {
            let qualified = format!("{layer}.{path}");
            let reference = match leaf {
                TokenLeaf::Text(s) => parse_reference(&qualified, s)?,
                TokenLeaf::Number(_) => None,
            };
            let value = match reference {
                None => Category::for_path(path).format(leaf),
                Some(target) => {
                    if !layer.may_reference(target.layer) {
                        return Err(ThemeError::layer_order(qualified, target.to_string()));
                    }
                    if target.layer == layer {
                        pending.push((path.clone(), target));
                        continue;
                    }
                    self.get(target.layer, &target.path)
                        .ok_or_else(|| ThemeError::missing(&qualified, target.to_string()))?
                        .to_string()
                }
            };
            self.layer_mut(layer).insert(path.clone(), value);
        }

        for pass in 0..MAX_COMPONENT_PASSES {
            if pending.is_empty() {
                break;
            }
            trace!(pass, pending = pending.len(), "component reference pass");
            let mut unresolved = Vec::with_capacity(pending.len());
            for (path, target) in pending {
                match self.get(layer, &target.path).map(str::to_string) {
                    Some(value) => {
                        self.layer_mut(layer).insert(path, value);
                    }
                    None => unresolved.push((path, target)),
                }
            }
            pending = unresolved;
        }

        if let Some((path, target)) = pending.into_iter().next() {
            let qualified = format!("{layer}.{path}");
            // The target exists but never settled: a cycle or an over-long chain.
            if leaves.contains_key(&target.path) {
                return Err(ThemeError::CyclicReference { path: qualified });
            }
            return Err(ThemeError::missing(qualified, target.to_string()));
        }
        Ok(())
    }

    pub fn layer(&self, layer: Layer) -> &FxHashMap<String, String> {
        match layer {
            Layer::Core => &self.core,
            Layer::Semantic => &self.semantic,
            Layer::Component => &self.component,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut FxHashMap<String, String> {
        match layer {
            Layer::Core => &mut self.core,
            Layer::Semantic => &mut self.semantic,
            Layer::Component => &mut self.component,
        }
    }

    /// Look up a resolved value by layer and layer-relative path.
    pub fn get(&self, layer: Layer, path: &str) -> Option<&str> {
        self.layer(layer).get(path).map(String::as_str)
    }

    /// Look up a resolved value by reference string (`semantic.text.primary`,
    /// `color.base.white`, `type.scale.md`, ...).
    pub fn lookup(&self, reference: &str) -> Result<&str> {
        let target = parse_reference(reference, reference)?.ok_or_else(|| ThemeError::UnknownPrefix {
            path: reference.to_string(),
            reference: reference.to_string(),
        })?;
        self.get(target.layer, &target.path)
            .ok_or_else(|| ThemeError::missing(reference, target.to_string()))
    }

    /// Resolve a raw value taken from a record field named `at`.
    ///
    /// Literals are returned unchanged; references must resolve.
    pub fn resolve_value(&self, at: &str, raw: &str) -> Result<String> {
        match parse_reference(at, raw)? {
            None => Ok(raw.to_string()),
            Some(target) => self
                .get(target.layer, &target.path)
                .map(str::to_string)
                .ok_or_else(|| ThemeError::missing(at, target.to_string())),
        }
    }

    /// Total number of resolved tokens.
    pub fn len(&self) -> usize {
        self.core.len() + self.semantic.len() + self.component.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All resolved tokens as `(layer, path, value)`, sorted by layer then path.
    pub fn entries(&self) -> Vec<(Layer, &str, &str)> {
        let mut out: Vec<(Layer, &str, &str)> = Layer::ALL
            .iter()
            .flat_map(|layer| {
                self.layer(*layer)
                    .iter()
                    .map(move |(path, value)| (*layer, path.as_str(), value.as_str()))
            })
            .collect();
        out.sort_unstable();
        out
    }
}
