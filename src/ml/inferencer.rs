// ============================================================
// Layer 5 — Scorer
// ============================================================
// Rebuilds the classifier from a finished training run and
// scores a single (set_a, set_b) pair.
//
// Everything comes from the output directory:
//   train_config.json  → architecture + max_length
//   model.mpk          → weights
//   tokenizer.json     → the vocabulary used during training
//
// The returned value is softmax(logits)[LABEL_REAL], i.e. the
// probability that set_b really paraphrases set_a.

use anyhow::Result;
use burn::{prelude::*, tensor::activation::softmax};

use crate::data::{
    batcher::PairBatcher,
    encoder::PairEncoder,
};
use crate::domain::pair::LABEL_REAL;
use crate::infra::{checkpoint::CheckpointManager, tokenizer_store::TokenizerStore};
use crate::ml::model::PairClassifier;
use burn::data::dataloader::batcher::Batcher;

pub type InferBackend = burn::backend::Wgpu;

pub struct Scorer<B: Backend> {
    model:   PairClassifier<B>,
    encoder: PairEncoder,
    batcher: PairBatcher<B>,
}

impl Scorer<InferBackend> {
    /// Load a scorer on the default WGPU device.
    pub fn from_output_dir(output_dir: &str) -> Result<Self> {
        let device = burn::backend::wgpu::WgpuDevice::default();
        Self::load(output_dir, device)
    }
}

impl<B: Backend> Scorer<B> {
    pub fn load(output_dir: &str, device: B::Device) -> Result<Self> {
        let ckpt = CheckpointManager::open(output_dir)?;
        let cfg  = ckpt.load_config()?;

        // dropout is irrelevant at inference time
        let mut model_cfg = cfg.model_config();
        model_cfg.dropout = 0.0;
        let model = ckpt.load_model(model_cfg.init::<B>(&device), &device)?;
        tracing::info!("Model loaded from '{}'", output_dir);

        let tokenizer = TokenizerStore::new(output_dir).load()?;
        let encoder   = PairEncoder::new(tokenizer, cfg.max_length)?;

        Ok(Self { model, encoder, batcher: PairBatcher::new(device) })
    }

    /// Probability that `set_b` is a real paraphrase of `set_a`.
    pub fn probability_real(&self, set_a: &str, set_b: &str) -> Result<f32> {
        let sample = self.encoder.encode_pair(set_a, set_b)?;
        tracing::debug!(
            "Scoring pair with {} real tokens: '{}'",
            sample.real_length(),
            self.encoder.decode(&sample.input_ids)?
        );

        let batch  = self.batcher.batch(vec![sample]);
        let logits = self.model.forward(batch.input_ids, batch.token_type_ids, batch.attention_mask);
        let probs  = softmax(logits, 1); // [1, 2]

        let real = LABEL_REAL as usize;
        let p: f32 = probs.slice([0..1, real..real + 1]).into_scalar().elem();
        Ok(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::train_use_case::TrainConfig;
    use burn::backend::NdArray;

    #[test]
    fn test_scores_a_pair_from_saved_run() {
        let dir = std::env::temp_dir().join(format!("paraphrase-critic-score-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let out = dir.to_string_lossy().to_string();

        let tokenizer = TokenizerStore::new(out.clone())
            .load_or_build("no-such-model", &["the cat sat", "a dog ran"], 100)
            .unwrap();

        let cfg = TrainConfig {
            output_dir: out.clone(),
            max_length: 16,
            d_model:    16,
            num_heads:  2,
            num_layers: 1,
            d_ff:       32,
            vocab_size: crate::infra::tokenizer_store::id_space(&tokenizer),
            ..TrainConfig::default()
        };
        let ckpt = CheckpointManager::new(out.clone()).unwrap();
        ckpt.save_config(&cfg).unwrap();
        let model: PairClassifier<NdArray> = cfg.model_config().init(&Default::default());
        ckpt.save_model(&model).unwrap();

        let scorer = Scorer::<NdArray>::load(&out, Default::default()).unwrap();
        let p = scorer.probability_real("the cat sat", "a dog ran").unwrap();
        assert!((0.0..=1.0).contains(&p));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_run_is_an_error() {
        let dir = std::env::temp_dir().join(format!("paraphrase-critic-score-empty-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let err = Scorer::<NdArray>::load(&dir.to_string_lossy(), Default::default()).err().unwrap();
        assert!(err.to_string().contains("does not exist"));
        // a mistyped directory is not created
        assert!(!dir.exists());
    }
}
