// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tts::SynthesisError;
use crate::vision::{CaptionError, ImageError};

/// JSON body of every error response
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file uploaded")]
    NoFileUploaded,

    #[error("Unsupported image format")]
    UnsupportedFormat,

    #[error("Error loading image: {0}")]
    DecodeError(String),

    #[error("Caption generation error: {0}")]
    InferenceError(String),

    #[error("Text-to-speech error: {0}")]
    SynthesisError(String),

    #[error("No caption available to generate audio.")]
    NoCaptionAvailable,

    #[error("Caption not found: {0}")]
    CaptionNotFound(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoFileUploaded
            | ApiError::UnsupportedFormat
            | ApiError::NoCaptionAvailable => StatusCode::BAD_REQUEST,
            ApiError::CaptionNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::DecodeError(_)
            | ApiError::InferenceError(_)
            | ApiError::SynthesisError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::UnsupportedFormat => ApiError::UnsupportedFormat,
            ImageError::DecodeFailed(detail) => ApiError::DecodeError(detail),
            too_large @ ImageError::TooLarge(..) => ApiError::DecodeError(too_large.to_string()),
        }
    }
}

impl From<CaptionError> for ApiError {
    fn from(err: CaptionError) -> Self {
        ApiError::InferenceError(err.to_string())
    }
}

impl From<SynthesisError> for ApiError {
    fn from(err: SynthesisError) -> Self {
        ApiError::SynthesisError(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("Rejected request: {}", self);
        }
        (status, Json(self.to_response())).into_response()
    }
}
