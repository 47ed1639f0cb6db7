// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for text-to-speech

use thiserror::Error;

/// Errors that can occur while synthesizing or storing speech
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("No text to speak")]
    EmptyText,

    #[error("Language not supported: {0}")]
    UnsupportedLanguage(String),

    #[error("TTS API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("TTS timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Failed to write audio file: {0}")]
    Io(#[from] std::io::Error),
}
