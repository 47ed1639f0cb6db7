// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Caption request query parameters

use serde::Deserialize;

use crate::translation::SOURCE_LANGUAGE;

/// Multipart field holding the uploaded image
pub const FILE_FIELD: &str = "file";

/// Query string of POST /caption
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptionQuery {
    /// Target language for the translated caption
    #[serde(default)]
    pub lang: Option<String>,
}

impl CaptionQuery {
    /// Requested language, with absent or blank values meaning English
    pub fn language(&self) -> String {
        self.lang
            .as_deref()
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .unwrap_or(SOURCE_LANGUAGE)
            .to_string()
    }
}
