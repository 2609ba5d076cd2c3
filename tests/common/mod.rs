#![allow(dead_code)]

use std::collections::HashMap;

use anyhow::{bail, Result};
use zenz::codec::VocabCodec;
use zenz::engine::{InferenceEngine, Logits};

/// Engine double that replays a fixed score row per decode step.
///
/// The step index is derived from how far the sequence has grown past
/// `start_len`; once the script runs out, the last row repeats. Rows for
/// earlier positions are zero-filled, which the greedy loop never reads.
/// Every call checks the mask invariant the decoder is supposed to
/// uphold: same length as the sequence, all ones.
pub struct ScriptedEngine {
    start_len: usize,
    vocab_size: usize,
    rows: Vec<Vec<f32>>,
}

impl ScriptedEngine {
    pub fn new(start_len: usize, vocab_size: usize, rows: Vec<Vec<f32>>) -> Self {
        assert!(!rows.is_empty(), "script needs at least one row");
        for row in &rows {
            assert_eq!(row.len(), vocab_size, "script row width must match vocab");
        }
        Self {
            start_len,
            vocab_size,
            rows,
        }
    }
}

impl InferenceEngine for ScriptedEngine {
    fn infer(&self, token_ids: &[u32], attention_mask: &[u32]) -> Result<Logits> {
        if attention_mask.len() != token_ids.len() {
            bail!(
                "mask length {} does not match sequence length {}",
                attention_mask.len(),
                token_ids.len()
            );
        }
        if attention_mask.iter().any(|&m| m != 1) {
            bail!("expected an all-ones attention mask");
        }
        if token_ids.len() < self.start_len {
            bail!(
                "sequence shrank below the scripted start length {}",
                self.start_len
            );
        }

        let step = token_ids.len() - self.start_len;
        let row = self.rows.get(step).unwrap_or_else(|| {
            self.rows.last().expect("script is non-empty")
        });

        let mut data = vec![0.0f32; token_ids.len() * self.vocab_size];
        let tail = (token_ids.len() - 1) * self.vocab_size;
        data[tail..].copy_from_slice(row);
        Logits::from_vec(data, token_ids.len(), self.vocab_size)
    }
}

/// Engine double that always fails, for error-propagation tests.
pub struct FailingEngine;

impl InferenceEngine for FailingEngine {
    fn infer(&self, _token_ids: &[u32], _attention_mask: &[u32]) -> Result<Logits> {
        bail!("backend out of resources")
    }
}

/// A one-hot score row: 1.0 at `hot`, 0.0 elsewhere.
pub fn one_hot(vocab_size: usize, hot: usize) -> Vec<f32> {
    let mut row = vec![0.0f32; vocab_size];
    row[hot] = 1.0;
    row
}

/// Small word codec: ids 1..=6 for A..F, id 3 reserved for the end
/// token and deliberately absent from the vocabulary.
pub fn toy_codec() -> VocabCodec {
    let vocab: HashMap<String, u32> = [
        ("A", 1u32),
        ("B", 2),
        ("C", 4),
        ("D", 5),
        ("E", 6),
        ("F", 7),
    ]
    .into_iter()
    .map(|(w, id)| (w.to_string(), id))
    .collect();
    VocabCodec::new(vocab)
}
