//! Dominant-color extraction and role assignment
//!
//! 1. Downscale so the longer side is at most `max_dimension`
//! 2. Sample every `sample_stride`-th pixel in both axes
//! 3. Drop transparent, near-black, and near-white samples
//! 4. Quantize channels to `bucket_size` steps and count buckets
//! 5. Keep the `top_k` most frequent buckets as candidates
//! 6. Assign primary / secondary / accent by brightness and saturation

use image::RgbaImage;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;
use crate::loader::{decode, downscale};
use crate::source::ImageSource;
use crate::{ColorRoles, Rgb};

/// Tunables for extraction. Defaults are the reference constants.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Longer side after downscaling
    pub max_dimension: u32,
    /// Sample every Nth pixel in both axes
    pub sample_stride: u32,
    /// Samples with average channel below this are dropped
    pub min_brightness: u8,
    /// Samples with average channel above this are dropped
    pub max_brightness: u8,
    /// Samples with alpha below this are dropped
    pub alpha_cutoff: u8,
    /// Channel quantization step
    pub bucket_size: u8,
    /// Number of candidates kept after ranking
    pub top_k: usize,
    /// Primary: brightness below this qualifies
    pub primary_max_brightness: f32,
    /// Primary: saturation above this qualifies
    pub primary_min_saturation: f32,
    /// Accent: saturation must exceed this
    pub accent_min_saturation: f32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_dimension: 200,
            sample_stride: 4,
            min_brightness: 20,
            max_brightness: 235,
            alpha_cutoff: 128,
            bucket_size: 24,
            top_k: 5,
            primary_max_brightness: 140.0,
            primary_min_saturation: 0.4,
            accent_min_saturation: 0.3,
        }
    }
}

/// A ranked bucket color
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub color: Rgb,
    pub count: u32,
    pub brightness: f32,
    pub saturation: f32,
}

impl Candidate {
    fn new(color: Rgb, count: u32) -> Self {
        Self {
            color,
            count,
            brightness: color.brightness(),
            saturation: color.saturation(),
        }
    }
}

/// Palette extractor with fixed tunables.
#[derive(Clone, Debug, Default)]
pub struct PaletteExtractor {
    config: ExtractorConfig,
}

impl PaletteExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extract roles from encoded bytes, degrading to [`ColorRoles::fallback`].
    pub fn extract(&self, bytes: &[u8]) -> ColorRoles {
        self.try_extract(bytes).unwrap_or_else(|err| {
            warn!(error = %err, "palette extraction failed, using fallback colors");
            ColorRoles::fallback()
        })
    }

    /// Extract roles from encoded bytes; only decoding can fail.
    pub fn try_extract(&self, bytes: &[u8]) -> Result<ColorRoles> {
        let image = decode(bytes)?;
        Ok(self.extract_image(image))
    }

    /// Load and extract, degrading to [`ColorRoles::fallback`].
    pub fn extract_source(&self, source: &ImageSource) -> ColorRoles {
        self.try_extract_source(source).unwrap_or_else(|err| {
            warn!(error = %err, "palette extraction failed, using fallback colors");
            ColorRoles::fallback()
        })
    }

    pub fn try_extract_source(&self, source: &ImageSource) -> Result<ColorRoles> {
        let bytes = source.load_bytes()?;
        self.try_extract(&bytes)
    }

    /// Extract roles from already-decoded pixels.
    pub fn extract_image(&self, image: RgbaImage) -> ColorRoles {
        let image = downscale(image, self.config.max_dimension);
        let candidates = self.candidates(&image);
        if candidates.len() < 2 {
            debug!(
                candidates = candidates.len(),
                "not enough distinct colors, using fallback palette"
            );
            return ColorRoles::fallback();
        }
        self.assign_roles(&candidates)
    }

    /// Ranked candidate buckets, most frequent first.
    ///
    /// Ties are broken by color so repeated runs rank identically.
    pub fn candidates(&self, image: &RgbaImage) -> Vec<Candidate> {
        let cfg = &self.config;
        let stride = cfg.sample_stride.max(1) as usize;
        let mut counts: FxHashMap<Rgb, u32> = FxHashMap::default();
        let mut sampled = 0usize;

        for y in (0..image.height()).step_by(stride) {
            for x in (0..image.width()).step_by(stride) {
                let [r, g, b, a] = image.get_pixel(x, y).0;
                sampled += 1;
                if a < cfg.alpha_cutoff {
                    continue;
                }
                let color = Rgb::new(r, g, b);
                let brightness = color.brightness();
                if brightness < f32::from(cfg.min_brightness)
                    || brightness > f32::from(cfg.max_brightness)
                {
                    continue;
                }
                let bucket = color.quantize(cfg.bucket_size);
                *counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(Rgb, u32)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        ranked.truncate(cfg.top_k);
        debug!(sampled, buckets = ranked.len(), "ranked palette candidates");

        ranked
            .into_iter()
            .map(|(color, count)| Candidate::new(color, count))
            .collect()
    }

    /// Classify ranked candidates into roles.
    pub fn assign_roles(&self, candidates: &[Candidate]) -> ColorRoles {
        let cfg = &self.config;
        if candidates.is_empty() {
            return ColorRoles::fallback();
        }

        let primary = candidates
            .iter()
            .position(|c| {
                c.brightness < cfg.primary_max_brightness
                    || c.saturation > cfg.primary_min_saturation
            })
            .unwrap_or(0);

        let secondary = first_max_by(candidates.iter().enumerate(), |c| c.brightness).unwrap_or(0);

        let accent = first_max_by(
            candidates.iter().enumerate().filter(|(i, c)| {
                *i != primary && *i != secondary && c.saturation > cfg.accent_min_saturation
            }),
            |c| c.saturation,
        )
        .map(|i| candidates[i].color)
        .unwrap_or_else(|| {
            // Second-most-saturated overall; a stable sort keeps rank order on ties.
            let mut by_saturation: Vec<&Candidate> = candidates.iter().collect();
            by_saturation.sort_by(|a, b| b.saturation.total_cmp(&a.saturation));
            by_saturation
                .get(1)
                .map(|c| c.color)
                .unwrap_or(Rgb::DEFAULT_ACCENT)
        });

        ColorRoles::new(candidates[primary].color, candidates[secondary].color, accent)
    }
}

/// Index of the first candidate with the largest key.
fn first_max_by<'a, I, F>(iter: I, key: F) -> Option<usize>
where
    I: Iterator<Item = (usize, &'a Candidate)>,
    F: Fn(&Candidate) -> f32,
{
    let mut best: Option<(usize, f32)> = None;
    for (i, candidate) in iter {
        let k = key(candidate);
        if best.map_or(true, |(_, best_key)| k > best_key) {
            best = Some((i, k));
        }
    }
    best.map(|(i, _)| i)
}

/// Extract roles from encoded bytes with the default configuration.
pub fn extract_palette(bytes: &[u8]) -> ColorRoles {
    PaletteExtractor::default().extract(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(r: u8, g: u8, b: u8, count: u32) -> Candidate {
        Candidate::new(Rgb::new(r, g, b), count)
    }

    #[test]
    fn primary_prefers_first_dark_or_saturated() {
        let extractor = PaletteExtractor::default();
        let roles = extractor.assign_roles(&[
            candidate(216, 216, 192, 50), // light, unsaturated
            candidate(24, 48, 96, 40),    // dark navy
            candidate(216, 24, 72, 10),   // saturated red
        ]);
        assert_eq!(roles.primary, "#183060");
        assert_eq!(roles.secondary, "#d8d8c0");
        assert_eq!(roles.accent, "#d81848");
    }

    #[test]
    fn primary_falls_back_to_most_frequent() {
        let extractor = PaletteExtractor::default();
        let roles = extractor.assign_roles(&[
            candidate(192, 192, 192, 50),
            candidate(216, 216, 216, 40),
        ]);
        assert_eq!(roles.primary, "#c0c0c0");
        assert_eq!(roles.secondary, "#d8d8d8");
    }

    #[test]
    fn accent_falls_back_to_second_most_saturated() {
        let extractor = PaletteExtractor::default();
        let roles = extractor.assign_roles(&[
            candidate(24, 48, 96, 50),
            candidate(240, 216, 192, 40),
        ]);
        assert_eq!(roles.primary, "#183060");
        assert_eq!(roles.secondary, "#f0d8c0");
        assert_eq!(roles.accent, "#f0d8c0");
    }

    #[test]
    fn single_candidate_gets_default_accent() {
        let extractor = PaletteExtractor::default();
        let roles = extractor.assign_roles(&[candidate(24, 48, 96, 50)]);
        assert_eq!(roles.accent, "#0066ff");
    }

    #[test]
    fn transparent_and_extreme_samples_are_ignored() {
        let extractor = PaletteExtractor::default();
        let image = RgbaImage::from_fn(40, 40, |x, _| match x {
            0..=9 => image::Rgba([0, 0, 0, 255]),
            10..=19 => image::Rgba([255, 255, 255, 255]),
            20..=29 => image::Rgba([200, 30, 60, 0]),
            _ => image::Rgba([24, 48, 96, 255]),
        });
        let candidates = extractor.candidates(&image);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].color, Rgb::new(24, 48, 96));
    }
}
