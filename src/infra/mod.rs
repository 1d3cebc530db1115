// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns that don't belong in any specific
// business layer:
//
//   checkpoint.rs      — Saving and loading model weights with
//                        Burn's CompactRecorder, plus the
//                        TrainConfig JSON that lets `score`
//                        rebuild the architecture. Also loads
//                        warm-start weights.
//
//   tokenizer_store.rs — Finds a pretrained tokenizer or builds a
//                        word-level one from the corpus, and keeps
//                        a copy next to the model.
//
//   metrics.rs         — Binary classification metrics and the
//                        per-evaluation CSV log.
//
// Reference: Rust Book §7 (Modules)
//            Rust Book §9 (Error Handling with anyhow)

/// Model checkpoint saving and loading
pub mod checkpoint;

/// Tokenizer resolution, building, and persistence
pub mod tokenizer_store;

/// Classification metrics and CSV logger
pub mod metrics;
