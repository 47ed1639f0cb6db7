// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! BLIP captioning pipeline
//!
//! Preprocess, encode, then greedily decode one English caption.

use anyhow::{Context, Result};
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

use super::decoder::BlipDecoder;
use super::encoder::BlipEncoder;
use super::preprocessing::preprocess_for_blip;

/// Encoder file names, in lookup order
pub const ENCODER_FILE_NAMES: [&str; 3] = [
    "onnx/vision_model.onnx",
    "vision_model.onnx",
    "onnx/vision_model_quantized.onnx",
];

/// Decoder file names, in lookup order
pub const DECODER_FILE_NAMES: [&str; 3] = [
    "onnx/text_decoder_model.onnx",
    "text_decoder_model.onnx",
    "onnx/text_decoder_model_quantized.onnx",
];

pub const TOKENIZER_FILE_NAME: &str = "tokenizer.json";

/// Output of a single caption run
#[derive(Debug, Clone)]
pub struct CaptionResult {
    pub caption: String,
    pub processing_time_ms: u64,
}

/// BLIP image captioning model
#[derive(Clone)]
pub struct BlipModel {
    encoder: BlipEncoder,
    decoder: BlipDecoder,
    model_dir: PathBuf,
}

impl std::fmt::Debug for BlipModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlipModel")
            .field("model_dir", &self.model_dir)
            .field("max_tokens", &self.decoder.max_tokens())
            .finish_non_exhaustive()
    }
}

impl BlipModel {
    /// Load the encoder, decoder and tokenizer from a model directory
    ///
    /// Both the flat layout and the `onnx/` subdirectory layout of the
    /// published ONNX exports are accepted.
    pub fn new<P: AsRef<Path>>(model_dir: P, max_tokens: usize, intra_threads: usize) -> Result<Self> {
        let model_dir = model_dir.as_ref();

        if !model_dir.exists() {
            anyhow::bail!("BLIP model directory not found: {}", model_dir.display());
        }

        info!("Loading BLIP captioning model from {}", model_dir.display());

        let encoder_path = find_model_file(model_dir, &ENCODER_FILE_NAMES)?;
        let decoder_path = find_model_file(model_dir, &DECODER_FILE_NAMES)?;
        let tokenizer_path = model_dir.join(TOKENIZER_FILE_NAME);

        let encoder =
            BlipEncoder::new(&encoder_path, intra_threads).context("Failed to load BLIP encoder")?;
        let decoder = BlipDecoder::new(&decoder_path, &tokenizer_path, intra_threads)
            .context("Failed to load BLIP decoder")?
            .with_max_tokens(max_tokens);

        info!("BLIP captioning pipeline ready (CPU)");

        Ok(Self {
            encoder,
            decoder,
            model_dir: model_dir.to_path_buf(),
        })
    }

    /// Caption an RGB image
    pub fn caption(&self, image: &DynamicImage) -> Result<CaptionResult> {
        let start = Instant::now();

        let pixel_values = preprocess_for_blip(image);
        debug!("Preprocessed image to {:?}", pixel_values.shape());

        let hidden_states = self.encoder.encode(&pixel_values)?;
        let caption = self.decoder.generate(&hidden_states)?;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Caption generated in {}ms ({}x{}): '{}'",
            processing_time_ms,
            image.width(),
            image.height(),
            caption
        );

        Ok(CaptionResult {
            caption,
            processing_time_ms,
        })
    }
}

/// Locate the first existing file under `dir` among `names`
pub fn find_model_file(dir: &Path, names: &[&str]) -> Result<PathBuf> {
    names
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
        .ok_or_else(|| {
            anyhow::anyhow!("Model file not found in {}. Tried: {:?}", dir.display(), names)
        })
}
