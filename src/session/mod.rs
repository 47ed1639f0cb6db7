// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Caption state kept between requests

pub mod caption_store;

pub use caption_store::{CaptionRecord, CaptionStore, LastCaption, DEFAULT_HISTORY_CAPACITY};
