// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// By programming against traits instead of concrete types,
// we can swap implementations without changing the code
// that uses them:
//   - CsvCorpusLoader implements CorpusSource
//   - BuiltinThesaurus / FileThesaurus implement SynonymSource
//   - EdaAugmenter implements Augmenter
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use anyhow::Result;
use rand::RngCore;

use crate::domain::sentence::SentenceRecord;

// ─── CorpusSource ─────────────────────────────────────────────────────────────
/// Any component that can produce the sentence records of a paraphrase corpus.
pub trait CorpusSource {
    /// Load every record that survives language filtering.
    fn load_all(&self) -> Result<Vec<SentenceRecord>>;
}

// ─── SynonymSource ────────────────────────────────────────────────────────────
/// A lookup of single-word synonyms used by word-level augmentation.
pub trait SynonymSource {
    /// Synonyms of `word`, never including `word` itself.
    /// An empty Vec means "no synonyms known".
    fn synonyms(&self, word: &str) -> Vec<String>;
}

// ─── Augmenter ────────────────────────────────────────────────────────────────
/// Produces one noisy variant of a sentence.
///
/// Takes `&mut dyn RngCore` so the caller decides the random source
/// and tests can seed it.
pub trait Augmenter {
    fn augment(&self, sentence: &str, rng: &mut dyn RngCore) -> String;
}
