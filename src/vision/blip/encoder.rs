// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! BLIP vision encoder model
//!
//! Runs the ViT image tower and returns the patch embeddings that condition
//! the text decoder.

use anyhow::{Context, Result};
use ndarray::{Array2, Array4, ArrayViewD, Ix3};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::preprocessing::BLIP_INPUT_SIZE;

/// BLIP vision encoder
///
/// The session is shared behind a mutex because ONNX Runtime needs mutable
/// access to run.
#[derive(Clone)]
pub struct BlipEncoder {
    session: Arc<Mutex<Session>>,
    input_name: String,
}

impl std::fmt::Debug for BlipEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlipEncoder")
            .field("input_name", &self.input_name)
            .finish_non_exhaustive()
    }
}

impl BlipEncoder {
    /// Load the vision encoder from an ONNX file (vision_model.onnx)
    pub fn new<P: AsRef<Path>>(model_path: P, intra_threads: usize) -> Result<Self> {
        let model_path = model_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("BLIP vision encoder not found: {}", model_path.display());
        }

        info!("Loading BLIP vision encoder from {}", model_path.display());

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(intra_threads)
            .context("Failed to set intra threads")?
            .commit_from_file(model_path)
            .with_context(|| {
                format!("Failed to load BLIP encoder from {}", model_path.display())
            })?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "pixel_values".to_string());

        debug!("BLIP encoder input: {}", input_name);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
        })
    }

    /// Encode a preprocessed [1, 3, H, W] tensor into [seq_len, hidden] embeddings
    pub fn encode(&self, pixel_values: &Array4<f32>) -> Result<Array2<f32>> {
        let shape = pixel_values.shape();
        if shape[0] != 1 || shape[1] != 3 {
            anyhow::bail!("Invalid input shape: {:?}, expected [1, 3, H, W]", shape);
        }
        if shape[2] != BLIP_INPUT_SIZE as usize || shape[3] != BLIP_INPUT_SIZE as usize {
            debug!(
                "Input size {}x{} differs from expected {}x{}",
                shape[2], shape[3], BLIP_INPUT_SIZE, BLIP_INPUT_SIZE
            );
        }

        let input_value = Value::from_array(pixel_values.to_owned())
            .context("Failed to create pixel_values tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("BLIP encoder session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_value])
            .context("Encoder inference failed")?;

        let hidden = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract encoder output")?;

        debug!("Encoder output shape: {:?}", hidden.shape());

        hidden_states_to_2d(hidden)
    }
}

/// Collapse encoder output into [seq_len, hidden]
///
/// Accepts [1, seq_len, hidden] or [seq_len, hidden].
pub(crate) fn hidden_states_to_2d(output: ArrayViewD<'_, f32>) -> Result<Array2<f32>> {
    match output.ndim() {
        3 => {
            let view = output
                .into_dimensionality::<Ix3>()
                .context("Encoder output is not 3-dimensional")?;
            if view.shape()[0] != 1 {
                anyhow::bail!("Expected batch size 1, got {}", view.shape()[0]);
            }
            Ok(view.index_axis(ndarray::Axis(0), 0).to_owned())
        }
        2 => Ok(output
            .into_dimensionality::<ndarray::Ix2>()
            .context("Encoder output is not 2-dimensional")?
            .to_owned()),
        _ => anyhow::bail!("Unexpected encoder output shape: {:?}", output.shape()),
    }
}
