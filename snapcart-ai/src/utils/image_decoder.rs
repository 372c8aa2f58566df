//! Image Decoding Utilities
//!
//! Decodes uploaded photo bytes (JPEG, PNG, WebP) into a `DecodedImage`
//! shared read-only by every recognition adapter of one invocation.

use anyhow::{Context, Result};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// Decoded photo, opaque to the pipeline beyond being passed to adapters
#[derive(Debug, Clone)]
pub struct DecodedImage {
    image: DynamicImage,
    /// Container format detected from the input bytes
    pub format: Option<ImageFormat>,
}

impl DecodedImage {
    /// Wrap an already-decoded image
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self {
            image,
            format: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Borrow the decoded pixels (for in-process adapters)
    pub fn pixels(&self) -> &DynamicImage {
        &self.image
    }

    /// Re-encode as PNG for adapters that ship the image elsewhere
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        self.image
            .write_to(&mut buffer, ImageFormat::Png)
            .context("Failed to encode image as PNG")?;
        Ok(buffer.into_inner())
    }
}

/// Decode image bytes
///
/// # Errors
/// * Unrecognized or unsupported container format
/// * Corrupt image data
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage> {
    if bytes.is_empty() {
        anyhow::bail!("Image payload is empty");
    }

    let format = image::guess_format(bytes).ok();
    let image = image::load_from_memory(bytes).context("Failed to decode image")?;

    tracing::debug!(
        width = image.width(),
        height = image.height(),
        format = ?format,
        "Decoded image"
    );

    Ok(DecodedImage { image, format })
}

/// Decode image bytes on the blocking pool (decoding is CPU-bound)
pub async fn decode_image_blocking(bytes: Vec<u8>) -> Result<DecodedImage> {
    tokio::task::spawn_blocking(move || decode_image(&bytes))
        .await
        .context("Image decode task failed")?
}
