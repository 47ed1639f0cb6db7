// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! BLIP text decoder model
//!
//! Greedy autoregressive caption generation conditioned on the vision
//! encoder's hidden states.

use anyhow::{Context, Result};
use ndarray::{Array2, Array3, ArrayViewD, IxDyn};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::Tokenizer;
use tracing::{debug, info, warn};

/// Default maximum tokens to generate
pub const DEFAULT_MAX_TOKENS: usize = 20;

/// Minimum tokens to generate
pub const MIN_TOKENS: usize = 5;

/// Maximum tokens to generate
pub const MAX_TOKENS: usize = 100;

/// Fallback id of the `[DEC]` start-of-caption token in the BLIP vocabulary
const DEFAULT_BOS_TOKEN_ID: u32 = 30522;

/// Fallback id of `[SEP]`
const DEFAULT_EOS_TOKEN_ID: u32 = 102;

/// Markers that survive `skip_special_tokens` in some tokenizer exports
const SPECIAL_MARKERS: [&str; 5] = ["[CLS]", "[SEP]", "[PAD]", "[DEC]", "[UNK]"];

/// BLIP text decoder
#[derive(Clone)]
pub struct BlipDecoder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    max_tokens: usize,
    bos_token_id: u32,
    eos_token_id: u32,
    /// Some exports take an explicit mask over encoder positions, some don't
    has_encoder_mask: bool,
}

impl std::fmt::Debug for BlipDecoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlipDecoder")
            .field("max_tokens", &self.max_tokens)
            .field("bos_token_id", &self.bos_token_id)
            .field("eos_token_id", &self.eos_token_id)
            .field("has_encoder_mask", &self.has_encoder_mask)
            .finish_non_exhaustive()
    }
}

impl BlipDecoder {
    /// Load the decoder and its tokenizer
    ///
    /// # Arguments
    /// - `model_path`: text_decoder_model.onnx
    /// - `tokenizer_path`: tokenizer.json
    /// - `intra_threads`: ONNX Runtime intra-op thread count
    pub fn new<P: AsRef<Path>, T: AsRef<Path>>(
        model_path: P,
        tokenizer_path: T,
        intra_threads: usize,
    ) -> Result<Self> {
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            anyhow::bail!("BLIP text decoder not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            anyhow::bail!("BLIP tokenizer not found: {}", tokenizer_path.display());
        }

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        info!(
            "Loaded tokenizer with {} tokens",
            tokenizer.get_vocab_size(true)
        );

        info!("Loading BLIP text decoder from {}", model_path.display());

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
                format!("Failed to load BLIP decoder from {}", model_path.display())
            })?;

        let input_names: Vec<&str> = session.inputs.iter().map(|i| i.name.as_str()).collect();
        debug!("Decoder inputs: {:?}", input_names);
        let has_encoder_mask = input_names.contains(&"encoder_attention_mask");

        let bos_token_id = tokenizer
            .token_to_id("[DEC]")
            .unwrap_or(DEFAULT_BOS_TOKEN_ID);
        let eos_token_id = tokenizer
            .token_to_id("[SEP]")
            .unwrap_or(DEFAULT_EOS_TOKEN_ID);

        debug!("Special tokens - BOS: {}, EOS: {}", bos_token_id, eos_token_id);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            max_tokens: DEFAULT_MAX_TOKENS,
            bos_token_id,
            eos_token_id,
            has_encoder_mask,
        })
    }

    /// Set the maximum tokens to generate (clamped to MIN_TOKENS..=MAX_TOKENS)
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = clamp_max_tokens(max_tokens);
        self
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Generate a caption from encoder hidden states [seq_len, hidden]
    pub fn generate(&self, encoder_hidden_states: &Array2<f32>) -> Result<String> {
        let (seq_len, hidden) = encoder_hidden_states.dim();
        if seq_len == 0 || hidden == 0 {
            anyhow::bail!("Empty encoder hidden states: {:?}", encoder_hidden_states.dim());
        }

        if encoder_hidden_states.iter().any(|v| v.is_nan()) {
            warn!("Encoder output contains NaN values");
        }

        let encoder_states = encoder_hidden_states
            .clone()
            .into_shape_with_order((1, seq_len, hidden))
            .context("Failed to reshape encoder hidden states")?;

        let mut tokens = vec![self.bos_token_id];

        for step in 0..self.max_tokens {
            let logits = self.forward(&encoder_states, &tokens)?;
            let next_token = argmax(&logits)
                .ok_or_else(|| anyhow::anyhow!("Decoder returned empty logits"))?;

            if next_token == self.eos_token_id {
                debug!("Generation stopped at EOS after {} steps", step + 1);
                break;
            }

            tokens.push(next_token);
        }

        let text = self
            .tokenizer
            .decode(&tokens, true)
            .map_err(|e| anyhow::anyhow!("Decoding failed: {}", e))?;

        let caption = clean_caption(&text);
        debug!("Generated {} tokens: '{}'", tokens.len(), caption);

        Ok(caption)
    }

    /// One decoder step; returns the logits at the last position
    fn forward(&self, encoder_states: &Array3<f32>, tokens: &[u32]) -> Result<Vec<f32>> {
        let token_len = tokens.len();
        let input_ids = Array2::from_shape_vec(
            (1, token_len),
            tokens.iter().map(|&t| t as i64).collect(),
        )
        .context("Failed to build input_ids")?;
        let attention_mask = Array2::<i64>::ones((1, token_len));

        let input_ids = Value::from_array(input_ids).context("Failed to create input_ids tensor")?;
        let attention_mask =
            Value::from_array(attention_mask).context("Failed to create attention_mask tensor")?;
        let encoder_value = Value::from_array(encoder_states.clone())
            .context("Failed to create encoder_hidden_states tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow::anyhow!("BLIP decoder session lock poisoned"))?;

        let outputs = if self.has_encoder_mask {
            let encoder_mask = Value::from_array(Array2::<i64>::ones((1, encoder_states.dim().1)))
                .context("Failed to create encoder_attention_mask tensor")?;
            session
                .run(ort::inputs![
                    "input_ids" => input_ids,
                    "attention_mask" => attention_mask,
                    "encoder_hidden_states" => encoder_value,
                    "encoder_attention_mask" => encoder_mask
                ])
                .context("Decoder inference failed")?
        } else {
            session
                .run(ort::inputs![
                    "input_ids" => input_ids,
                    "attention_mask" => attention_mask,
                    "encoder_hidden_states" => encoder_value
                ])
                .context("Decoder inference failed")?
        };

        let logits = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract logits")?;

        last_position_logits(logits)
    }
}

/// Clamp a requested generation length to the supported range
pub fn clamp_max_tokens(max_tokens: usize) -> usize {
    max_tokens.clamp(MIN_TOKENS, MAX_TOKENS)
}

/// Index of the highest logit
///
/// NaN compares as equal so it never wins over a real value ahead of it.
pub(crate) fn argmax(logits: &[f32]) -> Option<u32> {
    logits
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(idx, _)| idx as u32)
}

/// Slice out the logits for the final sequence position
///
/// Accepts [1, seq, vocab] or [seq, vocab].
pub(crate) fn last_position_logits(output: ArrayViewD<'_, f32>) -> Result<Vec<f32>> {
    let shape = output.shape().to_vec();
    match shape.as_slice() {
        [1, seq, vocab] if *seq > 0 => {
            Ok((0..*vocab).map(|v| output[IxDyn(&[0, seq - 1, v])]).collect())
        }
        [seq, vocab] if *seq > 0 => Ok((0..*vocab).map(|v| output[IxDyn(&[seq - 1, v])]).collect()),
        _ => anyhow::bail!("Unexpected logits shape: {:?}", shape),
    }
}

/// Strip leftover special markers and collapse whitespace
pub(crate) fn clean_caption(text: &str) -> String {
    let mut cleaned = text.to_string();
    for marker in SPECIAL_MARKERS {
        cleaned = cleaned.replace(marker, " ");
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}
