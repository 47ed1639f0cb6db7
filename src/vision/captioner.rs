// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Captioning seam between the HTTP layer and the inference backend

use image::DynamicImage;
use std::sync::Arc;
use thiserror::Error;

use super::blip::BlipModel;

#[derive(Debug, Error)]
pub enum CaptionError {
    #[error("{0}")]
    Inference(String),

    #[error("captioning model is not loaded")]
    ModelUnavailable,
}

/// Produces one English caption per image
///
/// Implementations block; async callers go through [`caption_blocking`].
pub trait ImageCaptioner: Send + Sync {
    fn caption(&self, image: &DynamicImage) -> Result<String, CaptionError>;

    /// Whether a model is loaded and captions can be produced
    fn is_ready(&self) -> bool {
        true
    }
}

impl ImageCaptioner for BlipModel {
    fn caption(&self, image: &DynamicImage) -> Result<String, CaptionError> {
        BlipModel::caption(self, image)
            .map(|result| result.caption)
            .map_err(|e| CaptionError::Inference(format!("{:#}", e)))
    }
}

/// Run a captioner on the blocking thread pool
pub async fn caption_blocking(
    captioner: Arc<dyn ImageCaptioner>,
    image: DynamicImage,
) -> Result<String, CaptionError> {
    tokio::task::spawn_blocking(move || captioner.caption(&image))
        .await
        .map_err(|e| CaptionError::Inference(format!("inference task failed: {}", e)))?
}
