use thiserror::Error;

use crate::record::ThemeId;

/// Errors raised while resolving tokens, styles, and enum mappings.
///
/// Every variant names the offending path or key so operators can locate the
/// corrupt bundle entry or mapping gap.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ThemeError {
    /// A reference-shaped value uses a prefix outside the token namespace.
    #[error("token `{path}` uses unrecognized reference prefix in `{reference}`")]
    UnknownPrefix { path: String, reference: String },

    /// A reference points at a path that does not exist in its target layer.
    #[error("token `{path}` references missing token `{target}`")]
    MissingReference { path: String, target: String },

    /// A reference points at a layer that is not resolved yet.
    #[error("token `{path}` references `{target}`, which is not allowed from this layer")]
    LayerOrder { path: String, target: String },

    /// A component reference chain did not settle within the pass limit.
    #[error("token `{path}` is part of a cyclic or too-deep component reference chain")]
    CyclicReference { path: String },

    /// An enum value has no entry in its output table.
    #[error("no output mapping for value `{value}` in category `{category}`")]
    MappingGap { value: String, category: String },

    /// The mapping category name is not known.
    #[error("unknown mapping category `{0}`")]
    UnknownCategory(String),

    /// A token bundle document failed to parse.
    #[error("invalid token bundle: {0}")]
    InvalidBundle(String),

    /// A theme id could not be found in the theme source.
    #[error("theme {0} not found")]
    ThemeNotFound(ThemeId),
}

/// Result type alias for theme resolution.
pub type Result<T> = std::result::Result<T, ThemeError>;

impl ThemeError {
    pub(crate) fn missing(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self::MissingReference {
            path: path.into(),
            target: target.into(),
        }
    }

    pub(crate) fn layer_order(path: impl Into<String>, target: impl Into<String>) -> Self {
        Self::LayerOrder {
            path: path.into(),
            target: target.into(),
        }
    }

    /// The token path or enum value the error is about.
    pub fn subject(&self) -> String {
        match self {
            Self::UnknownPrefix { path, .. }
            | Self::MissingReference { path, .. }
            | Self::LayerOrder { path, .. }
            | Self::CyclicReference { path } => path.clone(),
            Self::MappingGap { value, .. } => value.clone(),
            Self::UnknownCategory(category) => category.clone(),
            Self::InvalidBundle(_) => String::new(),
            Self::ThemeNotFound(id) => id.to_string(),
        }
    }
}
