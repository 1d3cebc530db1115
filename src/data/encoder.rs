// ============================================================
// Layer 4 — Pair Encoder (Tokenizer Stage)
// ============================================================
// Converts (set_a, set_b) text pairs into fixed-length model
// inputs:
//
//   [CLS] a1 a2 ... [SEP] b1 b2 ... [SEP] [PAD] [PAD] ...
//   |<------------------ max_length ------------------>|
//
//   input_ids       token ids, padded with the tokenizer's pad id
//   attention_mask  1 = real token, 0 = padding
//   token_type_ids  0 = first sentence, 1 = second sentence
//
// Longer pairs are truncated "longest first": tokens are taken
// off whichever sentence is currently longer until the pair fits,
// so a long set_b cannot push set_a out of the window.
//
// The pad token is taken from the tokenizer's own padding config
// when it has one, else from a known pad token in its vocabulary.
//
// Reference: tokenizers crate documentation (padding/truncation)

use anyhow::{bail, Result};
use tokenizers::{
    PaddingDirection, PaddingParams, PaddingStrategy, Tokenizer, TruncationParams,
    TruncationStrategy,
};

use crate::data::dataset::PairSample;
use crate::domain::pair::LabeledExample;

/// Pad tokens looked up when the tokenizer carries no padding config
const PAD_TOKENS: [&str; 2] = ["[PAD]", "<pad>"];

/// (pad_token, pad_id) the tokenizer was built with.
fn resolve_pad(tokenizer: &Tokenizer) -> Result<(String, u32)> {
    if let Some(params) = tokenizer.get_padding() {
        return Ok((params.pad_token.clone(), params.pad_id));
    }
    for token in PAD_TOKENS {
        if let Some(id) = tokenizer.token_to_id(token) {
            return Ok((token.to_string(), id));
        }
    }
    bail!("tokenizer has no padding token (looked for {:?})", PAD_TOKENS)
}

pub struct PairEncoder {
    tokenizer:  Tokenizer,
    max_length: usize,
}

impl PairEncoder {
    /// Configure `tokenizer` for fixed-length pair encoding.
    pub fn new(mut tokenizer: Tokenizer, max_length: usize) -> Result<Self> {
        let (pad_token, pad_id) = resolve_pad(&tokenizer)?;
        tracing::debug!("Padding with '{}' (id {})", pad_token, pad_id);

        tokenizer.with_padding(Some(PaddingParams {
            strategy:  PaddingStrategy::Fixed(max_length),
            direction: PaddingDirection::Right,
            pad_id,
            pad_token,
            ..Default::default()
        }));

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                strategy: TruncationStrategy::LongestFirst,
                ..Default::default()
            }))
            .map_err(|e| anyhow::anyhow!("Invalid truncation settings: {e}"))?;

        Ok(Self { tokenizer, max_length })
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Encode one pair. The label is left at 0; use `encode_example`
    /// for labelled data.
    pub fn encode_pair(&self, set_a: &str, set_b: &str) -> Result<PairSample> {
        let enc = self
            .tokenizer
            .encode((set_a, set_b), true)
            .map_err(|e| anyhow::anyhow!("Tokenisation error: {e}"))?;

        Ok(PairSample {
            input_ids:      enc.get_ids().to_vec(),
            attention_mask: enc.get_attention_mask().to_vec(),
            token_type_ids: enc.get_type_ids().to_vec(),
            label:          0,
        })
    }

    pub fn encode_example(&self, example: &LabeledExample) -> Result<PairSample> {
        let mut sample = self.encode_pair(&example.set_a, &example.set_b)?;
        sample.label = example.label;
        Ok(sample)
    }

    pub fn encode_all(&self, examples: &[LabeledExample]) -> Result<Vec<PairSample>> {
        let samples = examples
            .iter()
            .map(|e| self.encode_example(e))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!("Encoded {} examples to length {}", samples.len(), self.max_length);
        Ok(samples)
    }

    /// Text of the real (non-special, non-padding) tokens.
    pub fn decode(&self, ids: &[u32]) -> Result<String> {
        self.tokenizer
            .decode(ids, true)
            .map_err(|e| anyhow::anyhow!("Decode error: {e}"))
    }
}
