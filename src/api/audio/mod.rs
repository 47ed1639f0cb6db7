// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Audio API endpoint module
//!
//! Provides GET /audio for speaking a caption.

pub mod handler;
pub mod request;

pub use handler::{audio_handler, AUDIO_CONTENT_DISPOSITION, AUDIO_CONTENT_TYPE};
pub use request::AudioQuery;
