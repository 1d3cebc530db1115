// ============================================================
// Layer 4 — Pair Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<PairSample>
// into device tensors.
//
// How batching works here:
//   Input:  Vec of N PairSamples, each with sequences of length S
//   Output: PairBatch with tensors of shape [N, S] plus [N] labels
//
//   All sequences were padded to the same length by the
//   PairEncoder, so we only flatten and reshape:
//   [s1_t1, ..., s1_tS, s2_t1, ..., sN_tS] → [N, S]
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::PairSample;

// ─── PairBatch ────────────────────────────────────────────────────────────────
/// A batch of encoded pairs for the classifier forward pass.
#[derive(Debug, Clone)]
pub struct PairBatch<B: Backend> {
    /// Token ids — shape: [batch_size, seq_len]
    pub input_ids: Tensor<B, 2, Int>,

    /// 1 = real token, 0 = padding — shape: [batch_size, seq_len]
    pub attention_mask: Tensor<B, 2, Int>,

    /// 0 = set_a segment, 1 = set_b segment — shape: [batch_size, seq_len]
    pub token_type_ids: Tensor<B, 2, Int>,

    /// 1 = real paraphrase, 0 = fake — shape: [batch_size]
    pub labels: Tensor<B, 1, Int>,
}

// ─── PairBatcher ──────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct PairBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> PairBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }

    fn stack(&self, rows: Vec<&[u32]>, seq_len: usize) -> Tensor<B, 2, Int> {
        let batch_size = rows.len();
        let flat: Vec<i32> = rows
            .into_iter()
            .flat_map(|r| r.iter().map(|&x| x as i32))
            .collect();

        Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len])
    }
}

impl<B: Backend> Batcher<PairSample, PairBatch<B>> for PairBatcher<B> {
    fn batch(&self, items: Vec<PairSample>) -> PairBatch<B> {
        // All sequences have the same length (pre-padded)
        let seq_len = items[0].input_ids.len();

        let input_ids      = self.stack(items.iter().map(|s| s.input_ids.as_slice()).collect(), seq_len);
        let attention_mask = self.stack(items.iter().map(|s| s.attention_mask.as_slice()).collect(), seq_len);
        let token_type_ids = self.stack(items.iter().map(|s| s.token_type_ids.as_slice()).collect(), seq_len);

        let labels: Vec<i32> = items.iter().map(|s| s.label as i32).collect();
        let labels = Tensor::<B, 1, Int>::from_ints(labels.as_slice(), &self.device);

        PairBatch { input_ids, attention_mask, token_type_ids, labels }
    }
}
