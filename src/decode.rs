use tracing::debug;

use crate::config::DecodeConfig;
use crate::engine::{InferenceEngine, Logits};
use crate::error::ConvertError;

/// Greedy autoregressive decoding.
///
/// Extends `ids` one token per step until the engine's argmax hits the
/// end token (not appended) or the sequence reaches
/// `max_sequence_length`. The caller owns the sequence exclusively for
/// the duration of the call; each engine invocation sees the full
/// current sequence with an all-ones attention mask. An empty sequence
/// is returned unchanged without invoking the engine.
pub fn greedy_decode<E: InferenceEngine>(
    engine: &E,
    ids: &mut Vec<u32>,
    config: &DecodeConfig,
) -> Result<(), ConvertError> {
    if ids.is_empty() {
        return Ok(());
    }

    let mut step = 0usize;
    while ids.len() < config.max_sequence_length {
        let mask = vec![1u32; ids.len()];
        let logits = engine
            .infer(ids, &mask)
            .map_err(|source| ConvertError::Inference { step, source })?;
        let row = last_row_checked(&logits, ids.len(), config.vocab_size)?;

        let next = argmax(row);
        if next == config.end_token_id {
            debug!(steps = step, len = ids.len(), "end token reached");
            return Ok(());
        }
        ids.push(next);
        step += 1;
    }
    debug!(steps = step, len = ids.len(), "length cap reached");
    Ok(())
}

/// Single-pass inspection: for every position of `ids`, the `k`
/// highest-scoring class ids in descending score order (ties toward the
/// lower id). One forward pass, no autoregression; this is a diagnostic
/// over the prompt, not the conversion path.
pub fn position_candidates<E: InferenceEngine>(
    engine: &E,
    ids: &[u32],
    config: &DecodeConfig,
    k: usize,
) -> Result<Vec<Vec<u32>>, ConvertError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let mask = vec![1u32; ids.len()];
    let logits = engine
        .infer(ids, &mask)
        .map_err(|source| ConvertError::Inference { step: 0, source })?;
    check_shape(&logits, ids.len(), config.vocab_size)?;

    let mut out = Vec::with_capacity(ids.len());
    for pos in 0..ids.len() {
        let row = logits
            .row(pos)
            .ok_or_else(|| shape_error(&logits, ids.len(), config.vocab_size))?;
        let mut order: Vec<u32> = (0..row.len() as u32).collect();
        // Stable sort keeps ascending ids for equal scores.
        order.sort_by(|&a, &b| ranked(row[b as usize]).total_cmp(&ranked(row[a as usize])));
        order.truncate(k.min(row.len()));
        out.push(order);
    }
    Ok(out)
}

/// First index achieving the maximum, scanning in ascending class order.
/// NaN never wins a comparison, so an all-NaN row resolves to class 0.
fn argmax(row: &[f32]) -> u32 {
    let (mut best_id, mut best_val) = (0u32, f32::NEG_INFINITY);
    for (i, &val) in row.iter().enumerate() {
        if val > best_val {
            best_val = val;
            best_id = i as u32;
        }
    }
    best_id
}

/// NaN sorts below every number when ranking candidates.
fn ranked(val: f32) -> f32 {
    if val.is_nan() {
        f32::NEG_INFINITY
    } else {
        val
    }
}

fn last_row_checked<'a>(
    logits: &'a Logits,
    expected_len: usize,
    expected_vocab: usize,
) -> Result<&'a [f32], ConvertError> {
    check_shape(logits, expected_len, expected_vocab)?;
    logits
        .last_row()
        .ok_or_else(|| shape_error(logits, expected_len, expected_vocab))
}

fn check_shape(
    logits: &Logits,
    expected_len: usize,
    expected_vocab: usize,
) -> Result<(), ConvertError> {
    if logits.seq_len() != expected_len || logits.vocab_size() != expected_vocab {
        return Err(shape_error(logits, expected_len, expected_vocab));
    }
    Ok(())
}

fn shape_error(logits: &Logits, expected_len: usize, expected_vocab: usize) -> ConvertError {
    ConvertError::LogitsShape {
        expected_len,
        expected_vocab,
        len: logits.seq_len(),
        vocab: logits.vocab_size(),
    }
}
