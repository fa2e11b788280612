//! Image decoding and grayscale conversion.
//!
//! Raw bytes in (PNG, JPEG, BMP, WebP), `GrayImage` out. Color inputs are
//! reduced to luminance so the patch scan always sees one intensity
//! channel.

use image::GrayImage;

use crate::types::PipelineError;

/// Decode raw image bytes and convert to grayscale.
///
/// # Errors
///
/// Returns [`PipelineError::EmptyInput`] if `bytes` is empty.
/// Returns [`PipelineError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
#[must_use = "returns the decoded grayscale image"]
pub fn decode_and_grayscale(bytes: &[u8]) -> Result<GrayImage, PipelineError> {
    if bytes.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    log::debug!("decoded {}x{} image ({:?})", img.width(), img.height(), img.color());
    Ok(img.to_luma8())
}
