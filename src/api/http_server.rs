// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::audio::audio_handler;
use super::caption::caption_handler;
use super::health::health_handler;
use crate::config::ServiceConfig;
use crate::session::CaptionStore;
use crate::translation::{GoogleTranslator, Translator};
use crate::tts::{AudioFileWriter, GoogleTts, SpeechSynthesizer};
use crate::vision::ImageCaptioner;

/// Slack on top of the image limit for multipart framing and other fields
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Shared state for all handlers
#[derive(Clone)]
pub struct AppState {
    pub captioner: Arc<dyn ImageCaptioner>,
    pub translator: Arc<dyn Translator>,
    pub synthesizer: Arc<dyn SpeechSynthesizer>,
    pub captions: Arc<CaptionStore>,
    pub audio_writer: Arc<AudioFileWriter>,
    pub max_image_bytes: usize,
}

impl AppState {
    pub fn new(
        captioner: Arc<dyn ImageCaptioner>,
        translator: Arc<dyn Translator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        config: &ServiceConfig,
    ) -> Self {
        Self {
            captioner,
            translator,
            synthesizer,
            captions: Arc::new(CaptionStore::new(config.history_capacity)),
            audio_writer: Arc::new(AudioFileWriter::new(&config.audio_output_path)),
            max_image_bytes: config.max_image_bytes,
        }
    }

    /// State backed by the Google translation and TTS endpoints in `config`
    pub fn from_config(captioner: Arc<dyn ImageCaptioner>, config: &ServiceConfig) -> Result<Self> {
        let translator = GoogleTranslator::new(&config.translate_endpoint, config.request_timeout())
            .context("Failed to create translation client")?;
        let synthesizer = GoogleTts::new(&config.tts_endpoint, config.request_timeout())
            .context("Failed to create TTS client")?;

        Ok(Self::new(
            captioner,
            Arc::new(translator),
            Arc::new(synthesizer),
            config,
        ))
    }
}

/// Build the router with every endpoint, permissive CORS and request tracing
pub fn create_app(state: AppState) -> Router {
    let body_limit = state.max_image_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        .route("/caption", post(caption_handler))
        .route("/caption/", post(caption_handler))
        .route("/audio", get(audio_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        // Mirrors origin and headers so credentialed requests are allowed
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind to the configured address and serve until Ctrl-C
pub async fn start_server(config: &ServiceConfig, state: AppState) -> Result<()> {
    let addr = config
        .socket_addr()
        .map_err(|e| anyhow::anyhow!(e))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Caption API listening on {}", addr);

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Caption API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
