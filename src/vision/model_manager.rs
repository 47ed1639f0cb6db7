// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Caption model manager: loads the BLIP export and serves it as a captioner

use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::blip::decoder::DEFAULT_MAX_TOKENS;
use super::blip::model::{DECODER_FILE_NAMES, ENCODER_FILE_NAMES, TOKENIZER_FILE_NAME};
use super::blip::BlipModel;
use super::captioner::{CaptionError, ImageCaptioner};

/// Configuration for loading the captioning model
#[derive(Debug, Clone)]
pub struct VisionModelConfig {
    /// Local model directory
    pub model_dir: String,
    /// Hugging Face repository to fetch from when `model_dir` is missing
    pub model_repo: Option<String>,
    pub max_tokens: usize,
    pub intra_threads: usize,
}

impl Default for VisionModelConfig {
    fn default() -> Self {
        Self {
            model_dir: "./models/blip-image-captioning-base-onnx".to_string(),
            model_repo: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            intra_threads: 4,
        }
    }
}

/// Holds the captioning model if it could be loaded
///
/// A failed load leaves the manager empty; the service keeps running and
/// every caption call reports `CaptionError::ModelUnavailable`.
pub struct CaptionModelManager {
    model: Option<Arc<BlipModel>>,
}

impl CaptionModelManager {
    /// Load the model described by `config`, off the async runtime
    pub async fn new(config: VisionModelConfig) -> Self {
        let model = match tokio::task::spawn_blocking(move || load_model(&config)).await {
            Ok(Ok(model)) => Some(Arc::new(model)),
            Ok(Err(e)) => {
                tracing::warn!("⚠️ Captioning model unavailable: {:#}", e);
                None
            }
            Err(e) => {
                tracing::warn!("⚠️ Captioning model load task failed: {}", e);
                None
            }
        };

        Self { model }
    }

    /// A manager with no model loaded
    pub fn empty() -> Self {
        Self { model: None }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }
}

impl ImageCaptioner for CaptionModelManager {
    fn caption(&self, image: &DynamicImage) -> Result<String, CaptionError> {
        match &self.model {
            Some(model) => ImageCaptioner::caption(model.as_ref(), image),
            None => Err(CaptionError::ModelUnavailable),
        }
    }

    fn is_ready(&self) -> bool {
        self.has_model()
    }
}

fn load_model(config: &VisionModelConfig) -> Result<BlipModel> {
    let dir = resolve_model_dir(config)?;
    let model = BlipModel::new(&dir, config.max_tokens, config.intra_threads)?;
    tracing::info!("✅ Captioning model loaded from {}", dir.display());
    Ok(model)
}

/// Pick the local directory, or download into the hub cache
fn resolve_model_dir(config: &VisionModelConfig) -> Result<PathBuf> {
    let local = Path::new(&config.model_dir);
    if local.exists() {
        return Ok(local.to_path_buf());
    }

    match &config.model_repo {
        Some(repo) => download_model(repo),
        None => anyhow::bail!(
            "model directory {} not found and no model repository configured",
            local.display()
        ),
    }
}

/// Fetch the ONNX export from the Hugging Face Hub and return its snapshot dir
fn download_model(repo_id: &str) -> Result<PathBuf> {
    tracing::info!("Fetching captioning model from Hugging Face repo {}", repo_id);

    let token = std::env::var("HF_TOKEN").ok();
    let api = hf_hub::api::sync::ApiBuilder::new()
        .with_token(token)
        .build()
        .context("Failed to create Hugging Face Hub client")?;
    let repo = api.model(repo_id.to_string());

    let tokenizer = repo
        .get(TOKENIZER_FILE_NAME)
        .with_context(|| format!("Failed to fetch {} from {}", TOKENIZER_FILE_NAME, repo_id))?;
    for file in [ENCODER_FILE_NAMES[0], DECODER_FILE_NAMES[0]] {
        repo.get(file)
            .with_context(|| format!("Failed to fetch {} from {}", file, repo_id))?;
    }

    tokenizer
        .parent()
        .map(Path::to_path_buf)
        .ok_or_else(|| anyhow::anyhow!("Downloaded tokenizer has no parent directory"))
}
