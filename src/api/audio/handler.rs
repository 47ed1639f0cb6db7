// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Audio endpoint handler

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tracing::info;
use uuid::Uuid;

use super::request::AudioQuery;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;

pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";
pub const AUDIO_CONTENT_DISPOSITION: &str = "attachment; filename=\"caption.mp3\"";

/// GET /audio - Speak a caption as MP3
///
/// With `caption_id`, speaks that caption record. Without it, speaks the most
/// recent caption produced by any client.
pub async fn audio_handler(
    State(state): State<AppState>,
    Query(query): Query<AudioQuery>,
) -> Result<Response, ApiError> {
    let (text, lang) = match query.caption_id() {
        Some(raw_id) => {
            let record = match Uuid::parse_str(raw_id) {
                Ok(id) => state.captions.get(&id).await,
                Err(_) => None,
            }
            .ok_or_else(|| ApiError::CaptionNotFound(raw_id.to_string()))?;
            (record.translated_caption, record.lang)
        }
        None => {
            let last = state.captions.last().await;
            (last.caption, last.lang)
        }
    };

    if text.trim().is_empty() {
        return Err(ApiError::NoCaptionAvailable);
    }

    let audio = state.synthesizer.synthesize(&text, &lang).await?;
    state.audio_writer.write(&audio).await?;

    info!(
        "Synthesized {} bytes of audio in '{}' via {}",
        audio.len(),
        lang,
        state.synthesizer.name()
    );

    Ok((
        [
            (header::CONTENT_TYPE, AUDIO_CONTENT_TYPE),
            (header::CONTENT_DISPOSITION, AUDIO_CONTENT_DISPOSITION),
        ],
        audio,
    )
        .into_response())
}
