use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 128;
pub const DEFAULT_END_TOKEN_ID: u32 = 3;

/// Decode-loop bounds and special tokens.
///
/// `vocab_size` must match the width of the engine's logits; the decode
/// loop rejects mismatched output instead of indexing past it.
#[derive(Debug, Clone)]
pub struct DecodeConfig {
    /// Hard cap on the token sequence, prompt included. The loop never
    /// grows the sequence past this, so it also bounds total work.
    pub max_sequence_length: usize,
    /// Token id that terminates generation without being appended.
    pub end_token_id: u32,
    /// Number of classes in each logits row.
    pub vocab_size: usize,
}

impl DecodeConfig {
    pub fn new(vocab_size: usize) -> Self {
        Self {
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            end_token_id: DEFAULT_END_TOKEN_ID,
            vocab_size,
        }
    }

    pub fn with_max_sequence_length(mut self, max_sequence_length: usize) -> Self {
        self.max_sequence_length = max_sequence_length;
        self
    }

    pub fn with_end_token_id(mut self, end_token_id: u32) -> Self {
        self.end_token_id = end_token_id;
        self
    }
}

/// Hints read from a `tokenizer_config.json` shipped next to the vocab.
///
/// The codec owns the special-token ids, so whatever it declares here is
/// threaded into the decode configuration. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CodecSpec {
    #[serde(default)]
    pub eos_token_id: Option<u32>,
    #[serde(default)]
    pub model_max_length: Option<usize>,
}

impl CodecSpec {
    /// Overrides the config fields this codec declares; absent fields
    /// leave the config untouched.
    pub fn apply(&self, mut config: DecodeConfig) -> DecodeConfig {
        if let Some(id) = self.eos_token_id {
            config.end_token_id = id;
        }
        if let Some(len) = self.model_max_length {
            config.max_sequence_length = len;
        }
        config
    }
}

pub fn load_codec_spec(path: &Path) -> Result<CodecSpec> {
    let bytes = std::fs::read(path).with_context(|| format!("read {path:?}"))?;
    let spec: CodecSpec =
        serde_json::from_slice(&bytes).with_context(|| format!("parse {path:?}"))?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_model_card() {
        let cfg = DecodeConfig::new(6000);
        assert_eq!(cfg.max_sequence_length, 128);
        assert_eq!(cfg.end_token_id, 3);
        assert_eq!(cfg.vocab_size, 6000);
    }

    #[test]
    fn codec_spec_overrides_only_declared_fields() {
        let spec = CodecSpec {
            eos_token_id: Some(2),
            model_max_length: None,
        };
        let cfg = spec.apply(DecodeConfig::new(100));
        assert_eq!(cfg.end_token_id, 2);
        assert_eq!(cfg.max_sequence_length, DEFAULT_MAX_SEQUENCE_LENGTH);
    }

    #[test]
    fn codec_spec_ignores_unknown_json_fields() {
        let spec: CodecSpec = serde_json::from_str(
            r#"{"eos_token_id": 7, "model_max_length": 64, "tokenizer_class": "BertJapaneseTokenizer"}"#,
        )
        .expect("parse codec spec");
        let cfg = spec.apply(DecodeConfig::new(100));
        assert_eq!(cfg.end_token_id, 7);
        assert_eq!(cfg.max_sequence_length, 64);
    }
}
