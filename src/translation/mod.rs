// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Caption translation
//!
//! Captions are produced in English; other languages go through a
//! [`Translator`] backend. Failures degrade into the caption text rather
//! than failing the request.

pub mod google;
pub mod provider;
pub mod types;

pub use google::{GoogleTranslator, DEFAULT_TRANSLATE_ENDPOINT};
pub use provider::{translate_caption, Translator};
pub use types::{
    is_valid_language_code, TranslationError, TranslationOutcome, SOURCE_LANGUAGE,
    TRANSLATION_ERROR_MARKER,
};
