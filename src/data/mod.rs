// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything from the corpus CSV to device-ready tensor batches.
//
//   corpus CSV
//       │
//       ▼
//   CsvCorpusLoader   → reads rows, filters language, normalises text
//       │
//       ▼
//   splitter          → optional group subsampling, train/valid split
//       │
//       ▼
//   pairing           → ordered pairs inside each paraphrase group
//       │
//       ▼
//   negatives         → rotated "other" sentence per pair
//       │
//       ▼
//   expander          → real + fake labelled examples (uses augment)
//       │
//       ▼
//   PairEncoder       → fixed-length token ids / masks / segments
//       │
//       ▼
//   PairDataset       → implements Burn's Dataset trait
//       │
//       ▼
//   PairBatcher       → stacks samples into tensor batches
//
// Each module is responsible for exactly one step.
//
// Reference: Burn Book §4 (Datasets and Dataloaders)

/// Reads the paraphrase corpus CSV
pub mod loader;

/// Normalises sentence text
pub mod preprocessor;

/// Group subsampling and the group-modulus train/validation split
pub mod splitter;

/// Builds ordered sentence pairs per paraphrase group
pub mod pairing;

/// Attaches rotated hard-negative candidates
pub mod negatives;

/// Synonym tables for augmentation
pub mod thesaurus;

/// EDA word-level augmentation
pub mod augment;

/// Expands pairs into real/fake labelled examples
pub mod expander;

/// Tokenizes sentence pairs into fixed-length inputs
pub mod encoder;

/// Implements Burn's Dataset trait for encoded pairs
pub mod dataset;

/// Implements Burn's Batcher trait to create tensor batches
pub mod batcher;
