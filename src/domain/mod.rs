// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust structs and traits that define the core concepts
// of the paraphrase critic.
//
// Rules for this layer:
//   - NO Burn framework types allowed here
//   - NO file I/O
//   - Only plain Rust structs, enums, and traits
//
// Think of this layer as the "dictionary" of the system —
// it defines what things ARE, not how they are produced.
//
// Reference: Rust Book §5 (Structs), §10 (Traits)

// One sentence of the paraphrase corpus
pub mod sentence;

// Ordered sentence pairs and their labelled expansions
pub mod pair;

// Core abstractions (traits) that other layers implement
pub mod traits;
