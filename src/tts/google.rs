// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Translate text-to-speech backend
//!
//! The `translate_tts` endpoint speaks at most [`MAX_CHUNK_CHARS`] characters
//! per request, so longer text is split and the MP3 frames are concatenated.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::provider::SpeechSynthesizer;
use super::types::SynthesisError;
use crate::translation::is_valid_language_code;

/// Default endpoint base URL
pub const DEFAULT_TTS_ENDPOINT: &str = "https://translate.google.com";

/// Longest text accepted by one `translate_tts` request
pub const MAX_CHUNK_CHARS: usize = 100;

const TTS_PATH: &str = "/translate_tts";

const SPLIT_PUNCTUATION: [char; 10] = ['.', ',', ';', ':', '!', '?', '¿', '¡', '…', '\n'];

pub struct GoogleTts {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl GoogleTts {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("caption-node/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    async fn fetch_chunk(
        &self,
        chunk: &str,
        lang: &str,
        idx: usize,
        total: usize,
    ) -> Result<Vec<u8>, SynthesisError> {
        let url = format!("{}{}", self.base_url, TTS_PATH);
        let total = total.to_string();
        let idx = idx.to_string();
        let textlen = chunk.chars().count().to_string();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("ie", "UTF-8"),
                ("client", "tw-ob"),
                ("tl", lang),
                ("q", chunk),
                ("total", total.as_str()),
                ("idx", idx.as_str()),
                ("textlen", textlen.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    SynthesisError::ApiError {
                        status: 0,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::ApiError {
                status: status.as_u16(),
                message: format!("translate_tts request failed for language '{}'", lang),
            });
        }

        let bytes = response.bytes().await.map_err(|e| SynthesisError::ApiError {
            status: status.as_u16(),
            message: e.to_string(),
        })?;

        if bytes.is_empty() {
            return Err(SynthesisError::ApiError {
                status: status.as_u16(),
                message: "empty audio response".to_string(),
            });
        }

        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTts {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, SynthesisError> {
        if !is_valid_language_code(lang) {
            return Err(SynthesisError::UnsupportedLanguage(lang.to_string()));
        }

        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(SynthesisError::EmptyText);
        }

        debug!("Synthesizing {} chunk(s) in '{}'", chunks.len(), lang);

        let mut audio = Vec::new();
        for (idx, chunk) in chunks.iter().enumerate() {
            let bytes = self.fetch_chunk(chunk, lang, idx, chunks.len()).await?;
            audio.extend_from_slice(&bytes);
        }

        Ok(audio)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

/// Split text into speakable chunks of at most `max_chars` characters
///
/// Cuts after the last punctuation mark inside the window, else at the last
/// whitespace, else hard at `max_chars`. Chunks with nothing to pronounce
/// (empty or punctuation only) are dropped.
pub fn split_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text.trim();

    while !rest.is_empty() {
        let chars: Vec<(usize, char)> = rest.char_indices().collect();

        let cut = if chars.len() <= max_chars {
            rest.len()
        } else {
            let window = &chars[..max_chars];
            let boundary = |is_boundary: fn(char) -> bool| {
                window
                    .iter()
                    .rposition(|&(_, c)| is_boundary(c))
                    .filter(|&pos| pos > 0)
                    .map(|pos| window[pos].0 + window[pos].1.len_utf8())
            };
            boundary(|c| SPLIT_PUNCTUATION.contains(&c))
                .or_else(|| boundary(char::is_whitespace))
                .unwrap_or(chars[max_chars].0)
        };

        let (head, tail) = rest.split_at(cut);
        let head = head.trim();
        if head.chars().any(char::is_alphanumeric) {
            chunks.push(head.to_string());
        }
        rest = tail.trim_start();
    }

    chunks
}
