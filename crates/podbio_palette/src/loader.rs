//! Image decoding and downscaling

use image::imageops::{self, FilterType};
use image::RgbaImage;
use tracing::trace;

use crate::error::Result;

/// Decode encoded bytes into RGBA pixels.
pub fn decode(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes)?;
    trace!(
        width = image.width(),
        height = image.height(),
        "decoded image"
    );
    Ok(image.to_rgba8())
}

/// Target size so the longer side equals `max_dimension`, keeping aspect ratio.
///
/// Returns `None` if the image already fits.
pub fn scaled_dimensions(width: u32, height: u32, max_dimension: u32) -> Option<(u32, u32)> {
    let max_dimension = max_dimension.max(1);
    if width <= max_dimension && height <= max_dimension {
        return None;
    }
    let scale = |short: u32, long: u32| -> u32 {
        let scaled = (u64::from(short) * u64::from(max_dimension) + u64::from(long) / 2)
            / u64::from(long);
        (scaled as u32).max(1)
    };
    Some(if width >= height {
        (max_dimension, scale(height, width))
    } else {
        (scale(width, height), max_dimension)
    })
}

/// Shrink an image so neither side exceeds `max_dimension`.
pub fn downscale(image: RgbaImage, max_dimension: u32) -> RgbaImage {
    match scaled_dimensions(image.width(), image.height(), max_dimension) {
        Some((width, height)) => {
            trace!(width, height, "downscaling image for sampling");
            imageops::resize(&image, width, height, FilterType::Triangle)
        }
        None => image,
    }
}
