// ============================================================
// Layer 3 — SentenceRecord Domain Type
// ============================================================
// One row of the paraphrase corpus after loading.
// Records that share a `group_id` (the corpus column
// `paraphrase_set_id`) are mutually paraphrastic.
//
// Reference: Rust Book §5 (Structs and Methods)

use serde::{Deserialize, Serialize};

/// A single sentence belonging to a paraphrase group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceRecord {
    /// Paraphrase group id — every sentence in a group means the same thing
    pub group_id: u64,

    /// Position of the sentence inside its group
    pub sentence_id: u64,

    /// Normalised, lower-cased sentence text
    pub text: String,
}

impl SentenceRecord {
    /// Create a new record. Uses impl Into<String> so callers can pass
    /// either &str or String.
    pub fn new(group_id: u64, sentence_id: u64, text: impl Into<String>) -> Self {
        Self {
            group_id,
            sentence_id,
            text: text.into(),
        }
    }
}
