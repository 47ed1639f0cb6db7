// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Shared fixtures for the HTTP endpoint tests
//!
//! Mock captioner, translator and synthesizer wired through the real router,
//! plus helpers for building multipart uploads and reading bodies.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
};
use caption_node::{
    api::http_server::AppState,
    config::ServiceConfig,
    translation::{TranslationError, Translator},
    tts::{SpeechSynthesizer, SynthesisError},
    vision::{CaptionError, ImageCaptioner},
};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgb};
use std::io::Cursor;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;

pub const BOUNDARY: &str = "caption-node-test-boundary";

/// Returns captions from a fixed list, one per call, repeating the last
pub struct MockCaptioner {
    captions: Vec<String>,
    calls: AtomicUsize,
}

impl MockCaptioner {
    pub fn new(caption: &str) -> Self {
        Self::sequence(&[caption])
    }

    pub fn sequence(captions: &[&str]) -> Self {
        Self {
            captions: captions.iter().map(|c| c.to_string()).collect(),
            calls: AtomicUsize::new(0),
        }
    }
}

impl ImageCaptioner for MockCaptioner {
    fn caption(&self, _image: &DynamicImage) -> Result<String, CaptionError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let idx = call.min(self.captions.len().saturating_sub(1));
        Ok(self.captions[idx].clone())
    }
}

pub struct FailingCaptioner;

impl ImageCaptioner for FailingCaptioner {
    fn caption(&self, _image: &DynamicImage) -> Result<String, CaptionError> {
        Err(CaptionError::Inference("decoder session crashed".to_string()))
    }
}

/// Prefixes the text with the target language, or fails every call
pub struct MockTranslator {
    fail: bool,
    pub calls: AtomicUsize,
}

impl MockTranslator {
    pub fn working() -> Self {
        Self {
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String, TranslationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(TranslationError::ApiError {
                status: 0,
                message: "connection refused".to_string(),
            });
        }
        Ok(format!("[{}] {}", target_lang, text))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// "Audio" is the language and text, so tests can tell clips apart
pub struct MockSynthesizer {
    fail: bool,
}

impl MockSynthesizer {
    pub fn working() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl SpeechSynthesizer for MockSynthesizer {
    async fn synthesize(&self, text: &str, lang: &str) -> Result<Vec<u8>, SynthesisError> {
        if self.fail {
            return Err(SynthesisError::ApiError {
                status: 503,
                message: "tts offline".to_string(),
            });
        }
        Ok(clip_for(text, lang))
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Bytes the mock synthesizer returns for `text` in `lang`
pub fn clip_for(text: &str, lang: &str) -> Vec<u8> {
    format!("MP3|{}|{}", lang, text).into_bytes()
}

/// Test state plus the temp dir holding its audio file
pub struct TestApp {
    pub state: AppState,
    pub audio_path: PathBuf,
    _dir: TempDir,
}

pub fn setup_test_state(
    captioner: Arc<dyn ImageCaptioner>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
) -> TestApp {
    setup_test_state_with_config(captioner, translator, synthesizer, ServiceConfig::default())
}

pub fn setup_test_state_with_config(
    captioner: Arc<dyn ImageCaptioner>,
    translator: Arc<dyn Translator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    mut config: ServiceConfig,
) -> TestApp {
    let dir = TempDir::new().unwrap();
    let audio_path = dir.path().join("caption.mp3");
    config.audio_output_path = audio_path.to_string_lossy().to_string();

    TestApp {
        state: AppState::new(captioner, translator, synthesizer, &config),
        audio_path,
        _dir: dir,
    }
}

/// Default fixture: captions "a dog on a beach", working backends
pub fn default_test_app() -> TestApp {
    setup_test_state(
        Arc::new(MockCaptioner::new("a dog on a beach")),
        Arc::new(MockTranslator::working()),
        Arc::new(MockSynthesizer::working()),
    )
}

pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img: ImageBuffer<Rgb<u8>, Vec<u8>> =
        ImageBuffer::from_fn(width, height, |x, y| Rgb([(x * 8) as u8, (y * 8) as u8, 128]));
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

/// Build a multipart/form-data body with a single file field
pub fn multipart_body(field_name: &str, filename: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field_name, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn caption_request(uri: &str, field_name: &str, data: &[u8]) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(field_name, "upload.png", data)))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
