// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Writer for the single shared audio output file

use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::debug;

use super::types::SynthesisError;

/// Default output path, relative to the working directory
pub const DEFAULT_AUDIO_PATH: &str = "caption.mp3";

/// Overwrites one fixed file with the latest synthesized audio
///
/// Writers queue on an async mutex so the file always holds one complete
/// clip.
#[derive(Debug)]
pub struct AudioFileWriter {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AudioFileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the file contents with `audio`
    pub async fn write(&self, audio: &[u8]) -> Result<(), SynthesisError> {
        let _guard = self.lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, audio).await?;

        debug!("Wrote {} bytes to {}", audio.len(), self.path.display());
        Ok(())
    }
}

impl Default for AudioFileWriter {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIO_PATH)
    }
}
