// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::Result;
use caption_node::{
    api::{start_server, AppState},
    cli::Cli,
    config::ServiceConfig,
    version,
    vision::{CaptionModelManager, ImageCaptioner},
};
use clap::Parser;
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    tracing::info!("Starting {}", version::get_version_string());

    let config = Cli::parse().apply(ServiceConfig::from_env());
    if let Err(e) = config.validate() {
        anyhow::bail!("Invalid configuration: {}", e);
    }

    tracing::info!(
        "Model dir: {}, audio output: {}, translate: {}, tts: {}",
        config.model_dir,
        config.audio_output_path,
        config.translate_endpoint,
        config.tts_endpoint
    );

    let manager = CaptionModelManager::new(config.vision_model_config()).await;
    if !manager.is_ready() {
        tracing::warn!("⚠️ Serving without a captioning model; POST /caption will fail");
    }

    let captioner: Arc<dyn ImageCaptioner> = Arc::new(manager);
    let state = AppState::from_config(captioner, &config)?;

    start_server(&config, state).await
}
