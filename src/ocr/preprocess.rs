use std::io::Cursor;

use anyhow::{Context, Result};
use image::ImageFormat;

/// Greyscale and contrast-boost an image, re-encoded as PNG.
pub fn enhance(bytes: &[u8], contrast: f32) -> Result<Vec<u8>> {
    let image = image::load_from_memory(bytes).context("Failed to decode image for OCR")?;
    let enhanced = image.grayscale().adjust_contrast(contrast);

    let mut out = Cursor::new(Vec::new());
    enhanced
        .write_to(&mut out, ImageFormat::Png)
        .context("Failed to encode preprocessed image")?;
    Ok(out.into_inner())
}
