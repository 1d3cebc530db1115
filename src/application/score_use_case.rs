// ============================================================
// Layer 2 — ScoreUseCase
// ============================================================
// Loads a finished run from its output directory and scores one
// (set_a, set_b) pair. Both sentences are normalised exactly as
// the corpus was during training before they reach the model.

use anyhow::Result;

use crate::data::preprocessor::Preprocessor;
use crate::ml::inferencer::{InferBackend, Scorer};

pub struct ScoreUseCase {
    scorer:       Scorer<InferBackend>,
    preprocessor: Preprocessor,
}

impl ScoreUseCase {
    pub fn new(output_dir: &str) -> Result<Self> {
        tracing::info!("Loading trained classifier from '{}'", output_dir);
        let scorer = Scorer::from_output_dir(output_dir)?;
        Ok(Self { scorer, preprocessor: Preprocessor::new() })
    }

    /// Probability that `set_b` is a real paraphrase of `set_a`.
    pub fn score(&self, set_a: &str, set_b: &str) -> Result<f32> {
        let set_a = self.preprocessor.clean(set_a);
        let set_b = self.preprocessor.clean(set_b);
        self.scorer.probability_real(&set_a, &set_b)
    }
}
