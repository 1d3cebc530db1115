// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// This layer contains the Burn model, the training loop and the
// scorer. The data layer only touches burn for its Dataset and
// Batcher traits.
//
// What's in this layer:
//
//   model.rs      — The pair classifier
//                   • Token, position and segment embeddings
//                   • Multi-head self-attention with pad masking
//                   • Feed-forward networks (GELU activation)
//                   • Layer normalisation + residual connections
//                   • 2-way classification head on [CLS]
//
//   trainer.rs    — The training loop
//                   AdamW, linear warmup/decay, gradient
//                   accumulation, periodic evaluation, final save
//
//   inferencer.rs — The scorer
//                   Loads a finished run and returns the
//                   probability that a pair is a real paraphrase
//
// Reference: Burn Book §3 (Building Blocks)
//            Burn Book §5 (Training)
//            Devlin et al. (2019) BERT

/// Transformer encoder pair classifier
pub mod model;

/// Training loop with AdamW and metric evaluation
pub mod trainer;

/// Single-pair scoring from a saved run
pub mod inferencer;
