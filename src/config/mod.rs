// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Service configuration
//!
//! Every setting has a default and can be overridden with an environment
//! variable; command-line flags override both (see `cli`).

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::session::DEFAULT_HISTORY_CAPACITY;
use crate::translation::DEFAULT_TRANSLATE_ENDPOINT;
use crate::tts::{DEFAULT_AUDIO_PATH, DEFAULT_TTS_ENDPOINT};
use crate::vision::blip::decoder::DEFAULT_MAX_TOKENS;
use crate::vision::image_utils::DEFAULT_MAX_IMAGE_BYTES;
use crate::vision::VisionModelConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MODEL_DIR: &str = "./models/blip-image-captioning-base-onnx";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_INTRA_THREADS: usize = 4;

/// Configuration for the caption service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Local BLIP ONNX export directory
    pub model_dir: String,
    /// Hugging Face repo used when `model_dir` does not exist
    pub model_repo: Option<String>,
    /// Generation limit per caption
    pub max_tokens: usize,
    /// ONNX Runtime intra-op threads per session
    pub intra_threads: usize,
    /// Largest accepted upload in bytes
    pub max_image_bytes: usize,
    pub translate_endpoint: String,
    pub tts_endpoint: String,
    /// Timeout for translation and TTS requests
    pub request_timeout_ms: u64,
    /// Shared MP3 output file
    pub audio_output_path: String,
    /// Caption records kept for `/audio?caption_id=`
    pub history_capacity: usize,
}

impl ServiceConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env::var("CAPTION_NODE_HOST").unwrap_or(defaults.host),
            port: parse_env("CAPTION_NODE_PORT").unwrap_or(defaults.port),
            model_dir: env::var("CAPTION_MODEL_DIR").unwrap_or(defaults.model_dir),
            model_repo: env::var("CAPTION_MODEL_REPO")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            max_tokens: parse_env("CAPTION_MAX_TOKENS").unwrap_or(defaults.max_tokens),
            intra_threads: parse_env("CAPTION_INTRA_THREADS").unwrap_or(defaults.intra_threads),
            max_image_bytes: parse_env("MAX_IMAGE_BYTES").unwrap_or(defaults.max_image_bytes),
            translate_endpoint: env::var("TRANSLATE_ENDPOINT")
                .unwrap_or(defaults.translate_endpoint),
            tts_endpoint: env::var("TTS_ENDPOINT").unwrap_or(defaults.tts_endpoint),
            request_timeout_ms: parse_env("EXTERNAL_REQUEST_TIMEOUT_MS")
                .unwrap_or(defaults.request_timeout_ms),
            audio_output_path: env::var("AUDIO_OUTPUT_PATH")
                .unwrap_or(defaults.audio_output_path),
            history_capacity: parse_env("CAPTION_HISTORY_CAPACITY")
                .unwrap_or(defaults.history_capacity),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port must be greater than 0".to_string());
        }
        if self.request_timeout_ms == 0 {
            return Err("External request timeout must be greater than 0".to_string());
        }
        if self.history_capacity == 0 {
            return Err("Caption history capacity must be greater than 0".to_string());
        }
        if self.max_image_bytes == 0 {
            return Err("Maximum image size must be greater than 0".to_string());
        }
        if self.intra_threads == 0 {
            return Err("Intra-op thread count must be greater than 0".to_string());
        }
        if self.audio_output_path.trim().is_empty() {
            return Err("Audio output path must not be empty".to_string());
        }
        self.socket_addr()?;
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| format!("Invalid listen address {}:{}: {}", self.host, self.port, e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn vision_model_config(&self) -> VisionModelConfig {
        VisionModelConfig {
            model_dir: self.model_dir.clone(),
            model_repo: self.model_repo.clone(),
            max_tokens: self.max_tokens,
            intra_threads: self.intra_threads,
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            model_dir: DEFAULT_MODEL_DIR.to_string(),
            model_repo: None,
            max_tokens: DEFAULT_MAX_TOKENS,
            intra_threads: DEFAULT_INTRA_THREADS,
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            translate_endpoint: DEFAULT_TRANSLATE_ENDPOINT.to_string(),
            tts_endpoint: DEFAULT_TTS_ENDPOINT.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            audio_output_path: DEFAULT_AUDIO_PATH.to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
