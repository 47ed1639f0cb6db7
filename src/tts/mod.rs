// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Text-to-speech for captions
//!
//! - `provider` - [`SpeechSynthesizer`] trait
//! - `google` - Google Translate TTS backend
//! - `audio_file` - The shared MP3 output file

pub mod audio_file;
pub mod google;
pub mod provider;
pub mod types;

pub use audio_file::{AudioFileWriter, DEFAULT_AUDIO_PATH};
pub use google::{split_text, GoogleTts, DEFAULT_TTS_ENDPOINT, MAX_CHUNK_CHARS};
pub use provider::SpeechSynthesizer;
pub use types::SynthesisError;
