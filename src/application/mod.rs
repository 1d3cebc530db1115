// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// This layer orchestrates all the other layers to accomplish
// a specific goal (preparing data, training or scoring).
//
// Rules for this layer:
//   - No ML math or model code here
//   - No printing here (that's Layer 1)
//   - Only workflow coordination
//
// Reference: Clean Architecture pattern
//            Rust Book §7 (Module System)

// Corpus → labelled rows, shared by `prepare` and `train`
pub mod prepare_use_case;

// The training workflow
pub mod train_use_case;

// Single-pair scoring from a finished run
pub mod score_use_case;
