// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Caption endpoint handler

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use bytes::Bytes;
use tracing::{info, warn};

use super::request::{CaptionQuery, FILE_FIELD};
use super::response::CaptionResponse;
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::translation::translate_caption;
use crate::vision::{caption_blocking, decode_image_bytes};

/// POST /caption - Caption an uploaded image
///
/// Decodes the `file` field, captions it on the blocking pool, translates the
/// caption when `lang` is not English, and records it as the last caption.
pub async fn caption_handler(
    State(state): State<AppState>,
    Query(query): Query<CaptionQuery>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<CaptionResponse>, ApiError> {
    let lang = query.language();
    let multipart = multipart.map_err(|_| ApiError::NoFileUploaded)?;
    let upload = read_file_field(multipart).await?;

    let (image, image_info) = decode_image_bytes(&upload, state.max_image_bytes)?;
    info!(
        "Received {}x{} {:?} image ({} bytes)",
        image_info.width, image_info.height, image_info.format, image_info.size_bytes
    );

    let caption = caption_blocking(state.captioner.clone(), image).await?;
    info!("Generated caption: {}", caption);

    let outcome = translate_caption(state.translator.as_ref(), &caption, &lang).await;
    if outcome.is_failure() {
        warn!("Returning caption with translation error annotation for '{}'", lang);
    }

    let record = state
        .captions
        .record(caption, outcome.into_display_text(), lang)
        .await;

    Ok(Json(CaptionResponse::from(record)))
}

/// Pull the bytes of the first `file` field, skipping any other fields
async fn read_file_field(mut multipart: Multipart) -> Result<Bytes, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(field_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        return field.bytes().await.map_err(field_error);
    }

    Err(ApiError::NoFileUploaded)
}

/// Body-limit overruns can surface while reading a field header or its data
fn field_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::DecodeError(e.body_text())
    } else {
        ApiError::NoFileUploaded
    }
}
