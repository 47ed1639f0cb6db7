// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-memory caption state shared by the caption and audio endpoints
//!
//! Holds the most recent caption (what an id-less `/audio` call speaks) and a
//! bounded LRU of caption records addressable by id.

use lru::LruCache;
use serde::Serialize;
use std::num::NonZeroUsize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::translation::SOURCE_LANGUAGE;

/// Default number of caption records kept
pub const DEFAULT_HISTORY_CAPACITY: usize = 256;

/// One successful caption request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptionRecord {
    pub caption_id: Uuid,
    pub original_caption: String,
    pub translated_caption: String,
    pub lang: String,
}

/// The caption most recently produced by any client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastCaption {
    pub caption: String,
    pub lang: String,
}

impl Default for LastCaption {
    fn default() -> Self {
        Self {
            caption: String::new(),
            lang: SOURCE_LANGUAGE.to_string(),
        }
    }
}

impl LastCaption {
    pub fn is_available(&self) -> bool {
        !self.caption.is_empty()
    }
}

struct StoreInner {
    last: LastCaption,
    records: LruCache<Uuid, CaptionRecord>,
}

/// Caption state behind a single lock so the caption and its language are
/// always read and written together
pub struct CaptionStore {
    inner: RwLock<StoreInner>,
    capacity: usize,
}

impl CaptionStore {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: RwLock::new(StoreInner {
                last: LastCaption::default(),
                records: LruCache::new(capacity),
            }),
            capacity: capacity.get(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Store a new caption and make it the last caption
    pub async fn record(
        &self,
        original_caption: impl Into<String>,
        translated_caption: impl Into<String>,
        lang: impl Into<String>,
    ) -> CaptionRecord {
        let record = CaptionRecord {
            caption_id: Uuid::new_v4(),
            original_caption: original_caption.into(),
            translated_caption: translated_caption.into(),
            lang: lang.into(),
        };

        let mut inner = self.inner.write().await;
        inner.last = LastCaption {
            caption: record.translated_caption.clone(),
            lang: record.lang.clone(),
        };
        inner.records.put(record.caption_id, record.clone());

        record
    }

    pub async fn last(&self) -> LastCaption {
        self.inner.read().await.last.clone()
    }

    /// Look up a record, marking it recently used
    pub async fn get(&self, caption_id: &Uuid) -> Option<CaptionRecord> {
        self.inner.write().await.records.get(caption_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for CaptionStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
