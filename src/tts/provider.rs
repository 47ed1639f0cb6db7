// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Speech synthesizer trait definition

use async_trait::async_trait;

use super::types::SynthesisError;

/// Produces MP3 audio for a piece of text
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` spoken in `lang`, returning MP3 bytes
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, SynthesisError>;

    fn name(&self) -> &'static str;
}
