// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Translator trait definition

use async_trait::async_trait;
use tracing::{debug, warn};

use super::types::{TranslationError, TranslationOutcome, SOURCE_LANGUAGE};

/// Translates English text into a target language
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Translate a caption, absorbing any backend failure
///
/// The backend is not called when `lang` is the source language.
pub async fn translate_caption(
    translator: &dyn Translator,
    text: &str,
    lang: &str,
) -> TranslationOutcome {
    if lang == SOURCE_LANGUAGE {
        return TranslationOutcome::Unchanged(text.to_string());
    }

    match translator.translate(text, lang).await {
        Ok(translated) => {
            debug!("{} translated caption to {}", translator.name(), lang);
            TranslationOutcome::Translated(translated)
        }
        Err(e) => {
            warn!("{} translation to {} failed: {}", translator.name(), lang, e);
            TranslationOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}
