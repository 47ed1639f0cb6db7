// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! BLIP image captioning on ONNX Runtime
//!
//! Components:
//! - `encoder` - ViT vision encoder
//! - `decoder` - Greedy text decoder
//! - `model` - Combined pipeline
//! - `preprocessing` - Resize and normalize for encoder input

pub mod decoder;
pub mod encoder;
pub mod model;
pub mod preprocessing;

pub use decoder::BlipDecoder;
pub use encoder::BlipEncoder;
pub use model::{BlipModel, CaptionResult};
