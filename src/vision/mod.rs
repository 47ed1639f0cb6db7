// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing: upload decoding and CPU image captioning
//!
//! Captioning runs the BLIP ONNX export on CPU through ONNX Runtime.

pub mod blip;
pub mod captioner;
pub mod image_utils;
pub mod model_manager;

pub use captioner::{caption_blocking, CaptionError, ImageCaptioner};
pub use image_utils::{decode_image_bytes, detect_format, ImageError, ImageInfo};
pub use model_manager::{CaptionModelManager, VisionModelConfig};
