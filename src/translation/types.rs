// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Core types for caption translation

use thiserror::Error;

/// Language every caption is produced in
pub const SOURCE_LANGUAGE: &str = "en";

/// Prefix of the text substituted for a caption whose translation failed
pub const TRANSLATION_ERROR_MARKER: &str = "[Translation error:";

/// Errors from a translation backend
#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("unsupported language code: {0}")]
    UnsupportedLanguage(String),

    #[error("translation API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("translation timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("unexpected translation response: {0}")]
    InvalidResponse(String),
}

/// Result of translating one caption
///
/// Translation never fails a caption request; a backend error is carried
/// as `Failed` and rendered into the returned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationOutcome {
    /// Target language is the source language; no backend call was made
    Unchanged(String),
    Translated(String),
    Failed { error: String },
}

impl TranslationOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    /// Text to return and store as the translated caption
    pub fn into_display_text(self) -> String {
        match self {
            Self::Unchanged(text) | Self::Translated(text) => text,
            Self::Failed { error } => format!("{} {}]", TRANSLATION_ERROR_MARKER, error),
        }
    }
}

/// Accepts ISO-639 style codes such as `es`, `fr`, `zh-CN`, `haw`
pub fn is_valid_language_code(lang: &str) -> bool {
    let mut parts = lang.split('-');
    let primary = parts.next().unwrap_or_default();
    if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    parts.all(|part| (2..=4).contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphanumeric()))
}
