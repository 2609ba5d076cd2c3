use std::collections::HashMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tokenizers::Tokenizer;

/// Text <-> token-id boundary. Implementations own the vocabulary and
/// any special-token conventions; the decode loop treats both directions
/// as opaque, including any sentinel characters embedded in the text.
pub trait TextCodec {
    fn encode(&self, text: &str) -> Result<Vec<u32>>;
    fn decode(&self, ids: &[u32]) -> Result<String>;
}

/// Whitespace codec over a flat `vocab.json` word -> id map.
///
/// Encoding fails on any word absent from the vocabulary rather than
/// silently dropping it, so a failed lookup cannot masquerade as a
/// shorter legitimate prompt. Decoding rejoins with single spaces, so
/// `decode(encode(text)) == text` for text made of known words separated
/// by single spaces.
pub struct VocabCodec {
    vocab: HashMap<String, u32>,
    reverse: HashMap<u32, String>,
}

impl VocabCodec {
    pub fn new(vocab: HashMap<String, u32>) -> Self {
        let reverse = vocab.iter().map(|(w, &id)| (id, w.clone())).collect();
        Self { vocab, reverse }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("read {path:?}"))?;
        let vocab: HashMap<String, u32> =
            serde_json::from_slice(&bytes).with_context(|| format!("parse {path:?}"))?;
        Ok(Self::new(vocab))
    }

    pub fn len(&self) -> usize {
        self.vocab.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocab.is_empty()
    }
}

impl TextCodec for VocabCodec {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        text.split_whitespace()
            .map(|word| {
                self.vocab
                    .get(word)
                    .copied()
                    .with_context(|| format!("word {word:?} not in vocabulary"))
            })
            .collect()
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        let words = ids
            .iter()
            .map(|id| {
                self.reverse
                    .get(id)
                    .map(String::as_str)
                    .with_context(|| format!("token id {id} not in vocabulary"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(words.join(" "))
    }
}

/// Codec backed by a Hugging Face `tokenizer.json` file.
pub struct HfCodec {
    inner: Tokenizer,
}

pub fn load_hf_codec(model_dir: &Path) -> Result<HfCodec> {
    let tok_json = model_dir.join("tokenizer.json");
    if !tok_json.exists() {
        bail!("missing tokenizer.json at {tok_json:?}");
    }
    let inner = Tokenizer::from_file(&tok_json)
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("load {tok_json:?}"))?;
    Ok(HfCodec { inner })
}

impl TextCodec for HfCodec {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        let enc = self
            .inner
            .encode(text, false)
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        Ok(enc.get_ids().to_vec())
    }

    fn decode(&self, ids: &[u32]) -> Result<String> {
        self.inner
            .decode(ids, true)
            .map_err(|e| anyhow::anyhow!("{e}"))
    }
}
