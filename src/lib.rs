//! Greedy decoding harness for zenz-style kana-to-kanji models.
//!
//! The model runtime and the tokenizer are injected capabilities
//! ([`InferenceEngine`] and [`TextCodec`]); this crate owns only the
//! orchestration between them: encode the prompt, run the greedy
//! autoregressive loop, decode the result.

pub mod codec;
pub mod config;
pub mod decode;
pub mod engine;
pub mod error;

use tracing::debug;

pub use codec::TextCodec;
pub use config::DecodeConfig;
pub use engine::{InferenceEngine, Logits};
pub use error::ConvertError;

/// Opens the kana span to be converted (private-use area, matching the
/// model's training data). Opaque to the decode loop.
pub const READING_START: char = '\u{EE00}';
/// Closes the kana span to be converted.
pub const READING_END: char = '\u{EE01}';

/// Wraps a kana reading in the sentinel pair the model expects.
pub fn mark_reading(reading: &str) -> String {
    format!("{READING_START}{reading}{READING_END}")
}

/// Engine + codec + config, wired for repeated conversions.
///
/// A conversion owns its token sequence exclusively and the engine is
/// taken by shared reference, so independent `convert` calls may run
/// concurrently whenever the engine handle supports it.
pub struct Converter<E, C> {
    engine: E,
    codec: C,
    config: DecodeConfig,
}

impl<E: InferenceEngine, C: TextCodec> Converter<E, C> {
    pub fn new(engine: E, codec: C, config: DecodeConfig) -> Self {
        Self {
            engine,
            codec,
            config,
        }
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Full pipeline: encode, greedily extend until the end token or the
    /// length cap, decode. The output contains the prompt tokens.
    pub fn convert(&self, prompt: &str) -> Result<String, ConvertError> {
        let mut ids = self
            .codec
            .encode(prompt)
            .map_err(ConvertError::Encoding)?;
        debug!(prompt_tokens = ids.len(), "encoded prompt");
        decode::greedy_decode(&self.engine, &mut ids, &self.config)?;
        self.codec.decode(&ids).map_err(ConvertError::Decoding)
    }

    /// Single forward pass over the prompt, returning for each position
    /// the decoded text of its `k` highest-scoring classes. Diagnostic
    /// only; see [`decode::position_candidates`].
    pub fn candidates(&self, prompt: &str, k: usize) -> Result<Vec<String>, ConvertError> {
        let ids = self
            .codec
            .encode(prompt)
            .map_err(ConvertError::Encoding)?;
        let ranked = decode::position_candidates(&self.engine, &ids, &self.config, k)?;
        ranked
            .into_iter()
            .map(|row| self.codec.decode(&row).map_err(ConvertError::Decoding))
            .collect()
    }
}
