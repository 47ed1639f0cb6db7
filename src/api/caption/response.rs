// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Caption response body

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::CaptionRecord;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CaptionResponse {
    /// English caption from the model
    pub original_caption: String,
    /// Caption in the requested language, or a translation error annotation
    pub translated_caption: String,
    /// Id accepted by GET /audio?caption_id=
    pub caption_id: Uuid,
    pub lang: String,
}

impl From<CaptionRecord> for CaptionResponse {
    fn from(record: CaptionRecord) -> Self {
        Self {
            original_caption: record.original_caption,
            translated_caption: record.translated_caption,
            caption_id: record.caption_id,
            lang: record.lang,
        }
    }
}
