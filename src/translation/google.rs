// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Google Translate backend
//!
//! Uses the keyless `translate_a/single` web endpoint. The response is a
//! nested JSON array whose first element lists `[translated, original, ...]`
//! segments.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::provider::Translator;
use super::types::{is_valid_language_code, TranslationError, SOURCE_LANGUAGE};

/// Default endpoint base URL
pub const DEFAULT_TRANSLATE_ENDPOINT: &str = "https://translate.googleapis.com";

const TRANSLATE_PATH: &str = "/translate_a/single";

pub struct GoogleTranslator {
    client: Client,
    base_url: String,
    timeout_ms: u64,
}

impl GoogleTranslator {
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
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError> {
        if !is_valid_language_code(target_lang) {
            return Err(TranslationError::UnsupportedLanguage(target_lang.to_string()));
        }
        if text.trim().is_empty() {
            return Ok(String::new());
        }

        let url = format!("{}{}", self.base_url, TRANSLATE_PATH);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", SOURCE_LANGUAGE),
                ("tl", target_lang),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TranslationError::Timeout {
                        timeout_ms: self.timeout_ms,
                    }
                } else {
                    TranslationError::ApiError {
                        status: 0,
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranslationError::ApiError {
                status: status.as_u16(),
                message: "translate request failed".to_string(),
            });
        }

        let body = response.text().await.map_err(|e| TranslationError::ApiError {
            status: status.as_u16(),
            message: e.to_string(),
        })?;

        parse_translation(&body)
    }

    fn name(&self) -> &'static str {
        "google"
    }
}

/// Concatenate the translated segments of a `translate_a/single` body
fn parse_translation(body: &str) -> Result<String, TranslationError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| TranslationError::InvalidResponse(e.to_string()))?;

    let segments = json
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslationError::InvalidResponse("missing segment list".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(TranslationError::InvalidResponse(
            "no translated text in response".to_string(),
        ));
    }

    Ok(translated)
}
