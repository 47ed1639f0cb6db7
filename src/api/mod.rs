// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod audio;
pub mod caption;
pub mod errors;
pub mod health;
pub mod http_server;

pub use audio::{audio_handler, AudioQuery};
pub use caption::{caption_handler, CaptionQuery, CaptionResponse};
pub use errors::{ApiError, ErrorResponse};
pub use health::{health_handler, HealthResponse};
pub use http_server::{create_app, start_server, AppState};
