//! Image binarization: arbitrary raster bytes → pure black/white PNG.
//!
//! OCR engines trained on clean black/white scans read hard-edged text far
//! more reliably than anti-aliased grayscale, so every image is pushed to
//! the two extremes before recognition: a luminance pass first, then a hard
//! threshold on each colour channel.
//!
//! ## Why a fixed threshold?
//!
//! The cut-off is a global, non-adaptive `> 128` — no histogram analysis,
//! no per-block thresholding. That trades poor results on unevenly lit
//! photos for complete predictability on the flatbed scans and screenshots
//! this pipeline mostly sees. The limitation is documented and intentional;
//! it is not a bug to silently "fix" with adaptive binarization.
//!
//! ## Why PNG out?
//!
//! Lossless re-encoding preserves the hard edges the threshold just
//! produced; JPEG artefacts would reintroduce exactly the gray fringing the
//! pass exists to remove.

use crate::error::ExtractError;
use image::RgbaImage;
use std::io::Cursor;
use tracing::debug;

/// Channel values strictly above this become white; everything else,
/// including the boundary value itself, becomes black.
const THRESHOLD: u8 = 128;

/// Binarize raster image bytes for OCR.
///
/// Decodes the input at its natural dimensions, grayscales, applies the
/// hard threshold, and re-encodes as PNG.
///
/// # Errors
/// [`ExtractError::ImageDecode`] on malformed input bytes. The transform
/// itself is pure and has no other failure modes; PNG encoding of a valid
/// in-memory bitmap cannot fail short of allocation failure.
pub fn binarize(image_bytes: &[u8]) -> Result<Vec<u8>, ExtractError> {
    let decoded = image::load_from_memory(image_bytes).map_err(|e| ExtractError::ImageDecode {
        detail: e.to_string(),
    })?;

    let mut bitmap = decoded.to_rgba8();
    debug!(
        width = bitmap.width(),
        height = bitmap.height(),
        "decoded image for binarization"
    );

    grayscale_in_place(&mut bitmap);
    threshold_in_place(&mut bitmap);

    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(bitmap)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| ExtractError::Internal(format!("PNG encoding failed: {e}")))?;

    debug!(bytes = buf.len(), "binarized image encoded");
    Ok(buf)
}

/// Replace each pixel's RGB with its Rec. 601 luma. Alpha is untouched.
fn grayscale_in_place(bitmap: &mut RgbaImage) {
    for pixel in bitmap.pixels_mut() {
        let [r, g, b, _a] = pixel.0;
        let luma =
            ((299 * u32::from(r) + 587 * u32::from(g) + 114 * u32::from(b)) / 1000) as u8;
        pixel.0[0] = luma;
        pixel.0[1] = luma;
        pixel.0[2] = luma;
    }
}

/// Hard-threshold every colour channel independently: `> 128` → 255,
/// else → 0. Alpha is untouched.
fn threshold_in_place(bitmap: &mut RgbaImage) {
    for pixel in bitmap.pixels_mut() {
        for channel in &mut pixel.0[..3] {
            *channel = if *channel > THRESHOLD { 255 } else { 0 };
        }
    }
}
