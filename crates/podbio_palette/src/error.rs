use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or decoding an image.
///
/// Palette extraction itself never fails; these surface only through the
/// `try_*` entry points.
#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("failed to read image {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid base64 image data: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("unsupported image source: {0}")]
    UnsupportedSource(String),
}

/// Result type alias for palette operations.
pub type Result<T> = std::result::Result<T, PaletteError>;
