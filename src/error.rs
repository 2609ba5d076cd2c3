use thiserror::Error;

/// Terminal failures of a single conversion.
///
/// None of these are retried internally: the decode computation is
/// deterministic, so retrying the identical call cannot change the
/// outcome. Callers that want a fallback should handle the error at
/// their own layer instead of relying on an empty-string result.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The codec could not tokenize the prompt.
    #[error("prompt could not be tokenized")]
    Encoding(#[source] anyhow::Error),

    /// The engine failed to produce logits at a decode step.
    #[error("inference engine failed at step {step}")]
    Inference {
        step: usize,
        #[source]
        source: anyhow::Error,
    },

    /// The engine produced logits whose shape does not match the current
    /// sequence length and configured vocabulary size.
    #[error(
        "engine returned logits shaped [1, {len}, {vocab}], expected [1, {expected_len}, {expected_vocab}]"
    )]
    LogitsShape {
        expected_len: usize,
        expected_vocab: usize,
        len: usize,
        vocab: usize,
    },

    /// The codec could not map the final token ids back to text.
    #[error("generated token ids could not be decoded")]
    Decoding(#[source] anyhow::Error),
}
