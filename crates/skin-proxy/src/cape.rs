//! Cape and texture image transforms
//!
//! OptiFine serves capes on a legacy 46×22 canvas (or an integer multiple of
//! it for HD capes); the game expects the 64×32 cape layout. Transforms run
//! synchronously and are called from the blocking pool.

use std::io::Cursor;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage};

pub const CAPE_WIDTH: u32 = 64;
pub const CAPE_HEIGHT: u32 = 32;
pub const LEGACY_CAPE_WIDTH: u32 = 46;
pub const LEGACY_CAPE_HEIGHT: u32 = 22;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Fit a cape onto the canonical 64×32 canvas
///
/// Sources already laid out as 64×32 (at any integer scale) are resampled to
/// the canvas; anything else is treated as a legacy cape, fit inside 46×22
/// and anchored top-left. Sources are never enlarged, and uncovered pixels
/// stay transparent.
pub fn normalize_cape(source: &DynamicImage) -> RgbaImage {
    let (width, height) = source.dimensions();

    let canonical = width % CAPE_WIDTH == 0
        && height % CAPE_HEIGHT == 0
        && width / CAPE_WIDTH == height / CAPE_HEIGHT;
    let (box_width, box_height) = if canonical {
        (CAPE_WIDTH, CAPE_HEIGHT)
    } else {
        (LEGACY_CAPE_WIDTH, LEGACY_CAPE_HEIGHT)
    };

    let scale = (box_width as f64 / width as f64)
        .min(box_height as f64 / height as f64)
        .min(1.0);
    let target_width = ((width as f64 * scale).round() as u32).clamp(1, box_width);
    let target_height = ((height as f64 * scale).round() as u32).clamp(1, box_height);

    let rgba = source.to_rgba8();
    let fitted = if (target_width, target_height) == (width, height) {
        rgba
    } else {
        imageops::resize(&rgba, target_width, target_height, FilterType::Nearest)
    };

    let mut canvas = RgbaImage::from_pixel(CAPE_WIDTH, CAPE_HEIGHT, TRANSPARENT);
    imageops::replace(&mut canvas, &fitted, 0, 0);
    canvas
}

/// Decode any supported image and normalize it as a cape, encoded as PNG
pub fn transcode_cape(bytes: &[u8]) -> Result<Vec<u8>, image::ImageError> {
    let source = image::load_from_memory(bytes)?;
    encode_png(&DynamicImage::ImageRgba8(normalize_cape(&source)))
}

/// PNG passes through untouched; other formats are re-encoded
pub fn ensure_png(bytes: Vec<u8>) -> Result<Vec<u8>, image::ImageError> {
    if matches!(image::guess_format(&bytes), Ok(ImageFormat::Png)) {
        return Ok(bytes);
    }
    let decoded = image::load_from_memory(&bytes)?;
    encode_png(&decoded)
}

pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
