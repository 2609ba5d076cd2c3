use anyhow::{bail, Result};

/// Unnormalized next-token scores from one forward pass, laid out as a
/// row-major `[1, seq_len, vocab_size]` buffer. Produced fresh per call
/// and discarded once a token has been selected.
pub struct Logits {
    data: Vec<f32>,
    seq_len: usize,
    vocab_size: usize,
}

impl Logits {
    pub fn from_vec(data: Vec<f32>, seq_len: usize, vocab_size: usize) -> Result<Self> {
        let expected = seq_len
            .checked_mul(vocab_size)
            .ok_or_else(|| anyhow::anyhow!("logits shape {seq_len} x {vocab_size} overflows"))?;
        if data.len() != expected {
            bail!(
                "logits buffer holds {} values, expected {expected} ({seq_len} x {vocab_size})",
                data.len()
            );
        }
        Ok(Self {
            data,
            seq_len,
            vocab_size,
        })
    }

    pub fn seq_len(&self) -> usize {
        self.seq_len
    }

    pub fn vocab_size(&self) -> usize {
        self.vocab_size
    }

    /// Scores for every class at one sequence position.
    pub fn row(&self, pos: usize) -> Option<&[f32]> {
        if pos >= self.seq_len {
            return None;
        }
        let start = pos * self.vocab_size;
        Some(&self.data[start..start + self.vocab_size])
    }

    /// Scores at the last produced position, the only row the greedy
    /// loop consults.
    pub fn last_row(&self) -> Option<&[f32]> {
        self.seq_len.checked_sub(1).and_then(|pos| self.row(pos))
    }
}

/// Boundary to the model runtime. One call is one full forward pass over
/// the current sequence at batch size 1; `attention_mask` is the same
/// length as `token_ids` and all ones in this design.
///
/// Implementations take `&self`: the decode loop treats the engine as a
/// pure, stateless function, so independent conversions may run
/// concurrently whenever the underlying handle allows it.
pub trait InferenceEngine {
    fn infer(&self, token_ids: &[u32], attention_mask: &[u32]) -> Result<Logits>;
}
