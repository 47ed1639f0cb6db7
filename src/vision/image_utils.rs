// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image loading for caption requests
//!
//! Uploaded bytes are sniffed by content (never by filename or declared
//! content type), decoded, and normalized to 3-channel RGB8.

use image::{DynamicImage, ImageFormat};
use thiserror::Error;

/// Default maximum upload size (10MB)
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Errors raised while turning uploaded bytes into an image
#[derive(Debug, Error)]
pub enum ImageError {
    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Failed to decode image: {0}")]
    DecodeFailed(String),

    #[error("Image data is too large: {0} bytes (max: {1} bytes)")]
    TooLarge(usize, usize),
}

/// Metadata captured while decoding an upload
#[derive(Debug, Clone)]
pub struct ImageInfo {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Format detected from the leading bytes
    pub format: ImageFormat,
    /// Size of the encoded upload in bytes
    pub size_bytes: usize,
}

/// Decode raw upload bytes into an RGB8 image
///
/// # Returns
/// * `Ok((DynamicImage, ImageInfo))` - `DynamicImage::ImageRgb8` plus metadata
/// * `Err(ImageError::UnsupportedFormat)` - bytes are not a recognizable image
/// * `Err(ImageError::DecodeFailed)` - recognizable but corrupt or truncated
/// * `Err(ImageError::TooLarge)` - upload exceeds `max_bytes`
pub fn decode_image_bytes(
    bytes: &[u8],
    max_bytes: usize,
) -> Result<(DynamicImage, ImageInfo), ImageError> {
    if bytes.len() > max_bytes {
        return Err(ImageError::TooLarge(bytes.len(), max_bytes));
    }

    let format = detect_format(bytes)?;

    let img = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| ImageError::DecodeFailed(e.to_string()))?;

    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());

    let info = ImageInfo {
        width: rgb.width(),
        height: rgb.height(),
        format,
        size_bytes: bytes.len(),
    };

    Ok((rgb, info))
}

/// Detect image format from magic bytes
///
/// Empty or too-short input is reported as `UnsupportedFormat`, the same as
/// any other unrecognized byte sequence.
pub fn detect_format(bytes: &[u8]) -> Result<ImageFormat, ImageError> {
    if bytes.len() < 4 {
        return Err(ImageError::UnsupportedFormat);
    }

    image::guess_format(bytes).map_err(|_| ImageError::UnsupportedFormat)
}
