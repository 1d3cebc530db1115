// ============================================================
// Layer 3 — Pair Domain Types
// ============================================================
// The three shapes a sentence pair goes through on its way
// to the model:
//
//   Pair          (group_id, set_a, set_b)        — Pair Builder
//   NegativePair  Pair + `other` decoy sentence   — Negative Sampler
//   LabeledExample (set_a, set_b, label)          — Example Expander
//
// Label convention: 1 = real paraphrase, 0 = fake.
//
// Reference: Rust Book §5 (Structs)

use serde::{Deserialize, Serialize};

/// Label for a genuine paraphrase pair
pub const LABEL_REAL: u8 = 1;

/// Label for a synthetic (augmented or mismatched) pair
pub const LABEL_FAKE: u8 = 0;

/// An ordered pair of two different sentences from the same group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pair {
    pub group_id: u64,
    pub set_a:    String,
    pub set_b:    String,
}

impl Pair {
    pub fn new(group_id: u64, set_a: impl Into<String>, set_b: impl Into<String>) -> Self {
        Self {
            group_id,
            set_a: set_a.into(),
            set_b: set_b.into(),
        }
    }
}

/// A pair together with the sentence picked as its hard-negative candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NegativePair {
    pub group_id: u64,
    pub set_a:    String,
    pub set_b:    String,
    pub other:    String,
}

impl NegativePair {
    pub fn from_pair(pair: Pair, other: impl Into<String>) -> Self {
        Self {
            group_id: pair.group_id,
            set_a:    pair.set_a,
            set_b:    pair.set_b,
            other:    other.into(),
        }
    }
}

/// One row of the final classification dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub set_a: String,
    pub set_b: String,
    pub label: u8,
}

impl LabeledExample {
    pub fn new(set_a: impl Into<String>, set_b: impl Into<String>, label: u8) -> Self {
        Self {
            set_a: set_a.into(),
            set_b: set_b.into(),
            label,
        }
    }

    pub fn is_real(&self) -> bool {
        self.label == LABEL_REAL
    }
}
