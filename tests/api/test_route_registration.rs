// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Route registration tests
//!
//! These tests verify that:
//! - /caption, /audio and /health are registered with the right methods
//! - CORS preflight is answered permissively, credentials included
//! - The server still answers when no captioning model is loaded

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use caption_node::{api::http_server::create_app, vision::CaptionModelManager};
use std::sync::Arc;
use tower::util::ServiceExt;

use super::helpers::*;

#[tokio::test]
async fn test_health_route() {
    let app = default_test_app();

    let response = create_app(app.state.clone())
        .oneshot(get_request("/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["caption_model_loaded"], true);
}

#[tokio::test]
async fn test_server_runs_without_model() {
    let app = setup_test_state(
        Arc::new(CaptionModelManager::empty()),
        Arc::new(MockTranslator::working()),
        Arc::new(MockSynthesizer::working()),
    );

    let health = create_app(app.state.clone())
        .oneshot(get_request("/health"))
        .await
        .unwrap();
    assert_eq!(body_json(health).await["caption_model_loaded"], false);

    let response = create_app(app.state.clone())
        .oneshot(caption_request("/caption", "file", &png_bytes(8, 8)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Caption generation error: captioning model is not loaded"
    );
}

#[tokio::test]
async fn test_caption_rejects_get() {
    let app = default_test_app();

    let response = create_app(app.state.clone())
        .oneshot(get_request("/caption"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_audio_rejects_post() {
    let app = default_test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/audio")
        .body(Body::empty())
        .unwrap();
    let response = create_app(app.state.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route() {
    let app = default_test_app();

    let response = create_app(app.state.clone())
        .oneshot(get_request("/v1/caption"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_preflight_allows_credentials() {
    let app = default_test_app();

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/caption")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
        .body(Body::empty())
        .unwrap();
    let response = create_app(app.state.clone()).oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );
    assert!(headers.contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_cors_on_simple_request() {
    let app = default_test_app();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .header(header::ORIGIN, "https://example.org")
        .body(Body::empty())
        .unwrap();
    let response = create_app(app.state.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "https://example.org"
    );
}
