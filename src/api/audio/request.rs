// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Audio request query parameters

use serde::Deserialize;

/// Query string of GET /audio
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AudioQuery {
    /// Caption to speak; the last caption when absent
    #[serde(default)]
    pub caption_id: Option<String>,
}

impl AudioQuery {
    /// The requested id, with blank values treated as absent
    pub fn caption_id(&self) -> Option<&str> {
        self.caption_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}
