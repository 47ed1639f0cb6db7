// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod session;
pub mod translation;
pub mod tts;
pub mod version;
pub mod vision;

pub use api::{create_app, AppState};
pub use config::ServiceConfig;
pub use session::{CaptionRecord, CaptionStore};
pub use translation::{TranslationError, TranslationOutcome, Translator};
pub use tts::{SpeechSynthesizer, SynthesisError};
pub use vision::{CaptionError, ImageCaptioner};
