// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Caption endpoint tests for POST /caption
//!
//! These tests verify that caption_handler:
//! - Returns the model caption unchanged for English
//! - Translates for other languages and degrades translation failures
//! - Rejects missing uploads and non-image bytes with 400
//! - Reports decode and captioning failures with 500

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use caption_node::{api::http_server::create_app, config::ServiceConfig};
use std::sync::Arc;
use tower::util::ServiceExt;
use uuid::Uuid;

use super::helpers::*;

#[tokio::test]
async fn test_english_caption_is_unchanged() {
    let app = default_test_app();
    let router = create_app(app.state.clone());

    let response = router
        .oneshot(caption_request("/caption?lang=en", "file", &png_bytes(16, 16)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["original_caption"], "a dog on a beach");
    assert_eq!(json["translated_caption"], json["original_caption"]);
    assert_eq!(json["lang"], "en");
    assert!(Uuid::parse_str(json["caption_id"].as_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_missing_and_empty_lang_default_to_english() {
    let translator = Arc::new(MockTranslator::working());
    let app = setup_test_state(
        Arc::new(MockCaptioner::new("a red bicycle")),
        translator.clone(),
        Arc::new(MockSynthesizer::working()),
    );

    for uri in ["/caption", "/caption?lang="] {
        let response = create_app(app.state.clone())
            .oneshot(caption_request(uri, "file", &png_bytes(8, 8)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK, "uri {}", uri);
        let json = body_json(response).await;
        assert_eq!(json["lang"], "en");
        assert_eq!(json["translated_caption"], "a red bicycle");
    }

    assert_eq!(translator.call_count(), 0, "English must not hit the translator");
}

#[tokio::test]
async fn test_non_english_caption_is_translated() {
    let app = default_test_app();

    let response = create_app(app.state.clone())
        .oneshot(caption_request("/caption?lang=es", "file", &png_bytes(16, 16)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["original_caption"], "a dog on a beach");
    assert_eq!(json["translated_caption"], "[es] a dog on a beach");
    assert_eq!(json["lang"], "es");
}

#[tokio::test]
async fn test_translation_failure_is_soft() {
    let app = setup_test_state(
        Arc::new(MockCaptioner::new("a dog on a beach")),
        Arc::new(MockTranslator::failing()),
        Arc::new(MockSynthesizer::working()),
    );

    let response = create_app(app.state.clone())
        .oneshot(caption_request("/caption?lang=fr", "file", &png_bytes(16, 16)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["original_caption"], "a dog on a beach");
    let translated = json["translated_caption"].as_str().unwrap();
    assert!(translated.starts_with("[Translation error:"), "got {}", translated);
    assert!(translated.contains("connection refused"));
    assert_eq!(json["lang"], "fr");
}

#[tokio::test]
async fn test_trailing_slash_route() {
    let app = default_test_app();

    let response = create_app(app.state.clone())
        .oneshot(caption_request("/caption/", "file", &png_bytes(8, 8)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_non_image_upload_is_unsupported() {
    let app = default_test_app();

    let response = create_app(app.state.clone())
        .oneshot(caption_request(
            "/caption",
            "file",
            b"this is a plain text file, not an image",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Unsupported image format");
}

#[tokio::test]
async fn test_empty_upload_is_unsupported() {
    let app = default_test_app();

    let response = create_app(app.state.clone())
        .oneshot(caption_request("/caption", "file", b""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Unsupported image format");
}

#[tokio::test]
async fn test_truncated_image_is_decode_error() {
    let app = default_test_app();
    let png = png_bytes(32, 32);

    let response = create_app(app.state.clone())
        .oneshot(caption_request("/caption", "file", &png[..png.len() / 2]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Error loading image: "));
}

#[tokio::test]
async fn test_oversized_image_is_decode_error() {
    let config = ServiceConfig {
        max_image_bytes: 64,
        ..Default::default()
    };
    let app = setup_test_state_with_config(
        Arc::new(MockCaptioner::new("a dog")),
        Arc::new(MockTranslator::working()),
        Arc::new(MockSynthesizer::working()),
        config,
    );

    let response = create_app(app.state.clone())
        .oneshot(caption_request("/caption", "file", &png_bytes(64, 64)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Error loading image: "));
}

#[tokio::test]
async fn test_upload_over_body_limit_is_decode_error() {
    let config = ServiceConfig {
        max_image_bytes: 64,
        ..Default::default()
    };
    let app = setup_test_state_with_config(
        Arc::new(MockCaptioner::new("a dog")),
        Arc::new(MockTranslator::working()),
        Arc::new(MockSynthesizer::working()),
        config,
    );

    // Past max_image_bytes plus the multipart allowance
    let mut upload = png_bytes(8, 8);
    upload.resize(64 + 64 * 1024 + 4096, 0);

    let response = create_app(app.state.clone())
        .oneshot(caption_request("/caption", "file", &upload))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"]
        .as_str()
        .unwrap()
        .starts_with("Error loading image: "));
    assert!(app.state.captions.is_empty().await);
}

#[tokio::test]
async fn test_missing_file_field() {
    let app = default_test_app();

    let response = create_app(app.state.clone())
        .oneshot(caption_request("/caption", "image", &png_bytes(8, 8)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No file uploaded");
}

#[tokio::test]
async fn test_non_multipart_body() {
    let app = default_test_app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/caption")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"file": "nope"}"#))
        .unwrap();
    let response = create_app(app.state.clone()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "No file uploaded");
}

#[tokio::test]
async fn test_captioner_failure() {
    let app = setup_test_state(
        Arc::new(FailingCaptioner),
        Arc::new(MockTranslator::working()),
        Arc::new(MockSynthesizer::working()),
    );

    let response = create_app(app.state.clone())
        .oneshot(caption_request("/caption", "file", &png_bytes(8, 8)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "Caption generation error: decoder session crashed"
    );
}

#[tokio::test]
async fn test_failed_request_leaves_last_caption_untouched() {
    let app = default_test_app();

    let response = create_app(app.state.clone())
        .oneshot(caption_request("/caption", "file", b"garbage bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(!app.state.captions.last().await.is_available());
    assert!(app.state.captions.is_empty().await);
}

#[tokio::test]
async fn test_successful_caption_is_recorded() {
    let app = default_test_app();

    let response = create_app(app.state.clone())
        .oneshot(caption_request("/caption?lang=de", "file", &png_bytes(8, 8)))
        .await
        .unwrap();
    let json = body_json(response).await;
    let id = Uuid::parse_str(json["caption_id"].as_str().unwrap()).unwrap();

    let last = app.state.captions.last().await;
    assert_eq!(last.caption, "[de] a dog on a beach");
    assert_eq!(last.lang, "de");

    let record = app.state.captions.get(&id).await.unwrap();
    assert_eq!(record.original_caption, "a dog on a beach");
}
