// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Command-line flags for the caption node

use clap::Parser;

use crate::config::ServiceConfig;

/// Caption node: image captioning, translation and text-to-speech over HTTP
#[derive(Parser, Debug, Default)]
#[command(name = "caption-node")]
#[command(version)]
#[command(about = "Caption images, translate the captions and speak them", long_about = None)]
pub struct Cli {
    /// Address to listen on
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory holding the BLIP ONNX export
    #[arg(long)]
    pub model_dir: Option<String>,

    /// Where synthesized audio is written
    #[arg(long)]
    pub audio_path: Option<String>,
}

impl Cli {
    /// Overlay the given flags on top of `config`
    pub fn apply(self, mut config: ServiceConfig) -> ServiceConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(model_dir) = self.model_dir {
            config.model_dir = model_dir;
        }
        if let Some(audio_path) = self.audio_path {
            config.audio_output_path = audio_path;
        }
        config
    }
}
