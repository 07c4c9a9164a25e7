//! Design tokens for theming
//!
//! Tokens live in three layers, resolved strictly in order:
//! - `core`: raw primitives (color swatches, type scale, spacing, radii, motion, elevation)
//! - `semantic`: role names aliasing into `core`
//! - `component`: per-component values aliasing into `semantic` or `core`

mod bundle;
mod format;
mod reference;

pub use bundle::{Layer, TokenBundle, TokenLeaf, TokenNode};
pub use format::{format_number, Category};
pub use reference::{is_reference_shaped, parse_reference, ResolvedTokens, TokenRef};
