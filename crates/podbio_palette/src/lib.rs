//! podbio Palette
//!
//! Derives a theme's color roles from uploaded artwork.
//!
//! # Features
//!
//! - Load images from file paths, base64 data, and raw bytes
//! - Support for PNG, JPEG, GIF, WebP, BMP formats
//! - Bounded cost: downscaled to 200px and sampled on a fixed stride
//! - Graceful degradation: undecodable or featureless images yield a fixed
//!   neutral palette instead of an error
//!
//! The classification is a heuristic over brightness and saturation, not a
//! perceptual color model.
//!
//! # Example
//!
//! ```ignore
//! use podbio_palette::{extract_palette, ImageSource, PaletteExtractor};
//!
//! let roles = extract_palette(&std::fs::read("cover.png")?);
//! println!("{} {} {}", roles.primary, roles.secondary, roles.accent);
//!
//! let roles = PaletteExtractor::default().extract_source(&ImageSource::file("cover.jpg"));
//! ```

mod error;
mod extract;
mod loader;
mod source;

pub use error::{PaletteError, Result};
pub use extract::{extract_palette, Candidate, ExtractorConfig, PaletteExtractor};
pub use loader::{decode, downscale, scaled_dimensions};
pub use source::ImageSource;

use serde::{Deserialize, Serialize};

// ============================================================================
// Colors
// ============================================================================

/// An opaque 8-bit RGB color
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    /// Accent used when an image offers none
    pub const DEFAULT_ACCENT: Self = Self::new(0, 0x66, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Average of the three channels (0-255)
    pub fn brightness(self) -> f32 {
        (f32::from(self.r) + f32::from(self.g) + f32::from(self.b)) / 3.0
    }

    /// HSV saturation (0.0-1.0)
    pub fn saturation(self) -> f32 {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        if max == 0 {
            0.0
        } else {
            f32::from(max - min) / f32::from(max)
        }
    }

    /// Round each channel to the nearest multiple of `step`, capped at 255.
    pub fn quantize(self, step: u8) -> Self {
        let step = u16::from(step.max(1));
        let round = |c: u8| -> u8 {
            let q = (u16::from(c) + step / 2) / step * step;
            q.min(255) as u8
        };
        Self::new(round(self.r), round(self.g), round(self.b))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ============================================================================
// Color roles
// ============================================================================

/// Extracted theme colors as hex strings
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorRoles {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
}

impl ColorRoles {
    pub fn new(primary: Rgb, secondary: Rgb, accent: Rgb) -> Self {
        Self {
            primary: primary.to_hex(),
            secondary: secondary.to_hex(),
            accent: accent.to_hex(),
        }
    }

    /// The neutral palette used whenever extraction has nothing to offer:
    /// black, white, and the default blue.
    pub fn fallback() -> Self {
        Self::new(Rgb::BLACK, Rgb::WHITE, Rgb::DEFAULT_ACCENT)
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}
