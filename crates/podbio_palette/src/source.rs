//! Image source types

use std::fs;
use std::path::PathBuf;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::{PaletteError, Result};

/// Source of an image to extract a palette from
///
/// Remote URLs are not a source: fetching is the caller's job and must finish
/// before extraction starts.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Load from a file path
    File(PathBuf),

    /// Load from base64-encoded data
    /// Can optionally include data URI prefix (e.g., "data:image/png;base64,...")
    Base64(String),

    /// Raw encoded bytes (PNG, JPEG, GIF, WebP, BMP)
    Bytes(Vec<u8>),
}

impl ImageSource {
    /// Create a file source
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Create a base64 source
    pub fn base64(data: impl Into<String>) -> Self {
        Self::Base64(data.into())
    }

    /// Create a bytes source
    pub fn bytes(data: Vec<u8>) -> Self {
        Self::Bytes(data)
    }

    /// Parse a resource URI string into an ImageSource
    ///
    /// Supported formats:
    /// - `file:///path/to/image.png` - File path
    /// - `data:image/png;base64,...` - Data URI with base64
    /// - `/path/to/image.png` - Treated as file path
    ///
    /// `http://` and `https://` are rejected.
    pub fn from_uri(uri: &str) -> Result<Self> {
        if uri.starts_with("data:") {
            Ok(Self::Base64(uri.to_string()))
        } else if uri.starts_with("http://") || uri.starts_with("https://") {
            Err(PaletteError::UnsupportedSource(format!(
                "{uri} (download the image first)"
            )))
        } else if let Some(path) = uri.strip_prefix("file://") {
            Ok(Self::File(PathBuf::from(path)))
        } else {
            Ok(Self::File(PathBuf::from(uri)))
        }
    }

    /// Read the encoded image bytes.
    pub fn load_bytes(&self) -> Result<Vec<u8>> {
        match self {
            Self::File(path) => fs::read(path).map_err(|source| PaletteError::Io {
                path: path.clone(),
                source,
            }),
            Self::Base64(data) => {
                // Strip a data URI header if present
                let payload = match data.split_once(',') {
                    Some((header, payload)) if header.starts_with("data:") => payload,
                    _ => data.as_str(),
                };
                Ok(STANDARD.decode(payload.trim())?)
            }
            Self::Bytes(data) => Ok(data.clone()),
        }
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(data: Vec<u8>) -> Self {
        Self::Bytes(data)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::File(path)
    }
}

impl From<&std::path::Path> for ImageSource {
    fn from(path: &std::path::Path) -> Self {
        Self::File(path.to_path_buf())
    }
}
