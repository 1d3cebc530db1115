// ============================================================
// Layer 2 — TrainUseCase
// ============================================================
// Orchestrates the full training pipeline in order:
//
//   Step 1: Load, subsample, split, pair  (Layer 2 - prepare)
//   Step 2: Attach negatives + expand     (Layer 2 - prepare)
//   Step 3: Build / load tokenizer        (Layer 6 - infra)
//   Step 4: Encode labelled pairs         (Layer 4 - data)
//   Step 5: Build datasets                (Layer 4 - data)
//   Step 6: Save config                   (Layer 6 - infra)
//   Step 7: Run training loop             (Layer 5 - ml)
//
// Reference: Rust Book §13 (Iterators and Closures)
//            Burn Book §5 (Training)

use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::application::prepare_use_case::build_examples;
use crate::data::{dataset::PairDataset, encoder::PairEncoder};
use crate::infra::{
    checkpoint::CheckpointManager,
    metrics::MetricsLogger,
    tokenizer_store::{id_space, TokenizerStore},
};
use crate::ml::{
    model::PairClassifierConfig,
    trainer::{run_training, TrainingSummary},
};

// ─── Training Configuration ──────────────────────────────────────────────────
// Every knob of a run lives here and is passed down explicitly.
// Serialisable so `score` can rebuild the same architecture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainConfig {
    /// CSV with paraphrase_set_id, sentence_id, paraphrase columns
    pub corpus:        String,
    pub language:      String,
    /// Groups drawn (with replacement) before splitting; 0 keeps all
    pub sample_groups: usize,
    pub seed:          u64,

    /// Directory holding a pretrained tokenizer.json / model.mpk
    pub model_name:    String,
    pub output_dir:    String,
    /// Optional tab-separated synonym file for augmentation
    pub thesaurus:     Option<String>,
    pub expand_batch:  usize,

    pub max_length:    usize,
    pub batch_size:    usize,
    pub epochs:        usize,
    pub eval_steps:    usize,
    pub lr:            f64,
    pub warmup_steps:  usize,
    pub grad_accum:    usize,
    pub weight_decay:  f64,

    pub d_model:       usize,
    pub num_heads:     usize,
    pub num_layers:    usize,
    pub d_ff:          usize,
    pub dropout:       f64,
    /// Word cap when a vocabulary has to be built from the corpus
    pub max_words:     usize,
    /// Embedding rows; overwritten from the tokenizer before training
    pub vocab_size:    usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            corpus:        "data/tapaco_en.csv".to_string(),
            language:      "en".to_string(),
            sample_groups: 1000,
            seed:          42,
            model_name:    "models/base".to_string(),
            output_dir:    "models/fake_paraphrase_detector".to_string(),
            thesaurus:     None,
            expand_batch:  crate::data::expander::DEFAULT_EXPAND_BATCH,
            max_length:    256,
            batch_size:    32,
            epochs:        20,
            eval_steps:    100,
            lr:            5e-5,
            warmup_steps:  500,
            grad_accum:    2,
            weight_decay:  0.01,
            d_model:       256,
            num_heads:     8,
            num_layers:    6,
            d_ff:          1024,
            dropout:       0.1,
            max_words:     30000,
            vocab_size:    30522,
        }
    }
}

impl TrainConfig {
    /// Reject values that would make the run meaningless.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_length", self.max_length),
            ("batch_size", self.batch_size),
            ("epochs", self.epochs),
            ("eval_steps", self.eval_steps),
            ("grad_accum", self.grad_accum),
            ("expand_batch", self.expand_batch),
            ("num_heads", self.num_heads),
        ];
        for (name, value) in positive {
            if value == 0 {
                bail!("'{name}' must be greater than zero");
            }
        }
        if self.d_model % self.num_heads != 0 {
            bail!("d_model ({}) must be divisible by num_heads ({})", self.d_model, self.num_heads);
        }
        if self.max_length < 3 {
            bail!("max_length must leave room for [CLS] and two [SEP] tokens");
        }
        if self.lr.is_nan() || self.lr <= 0.0 {
            bail!("learning rate must be positive, got {}", self.lr);
        }
        if !(0.0..1.0).contains(&self.dropout) {
            bail!("dropout must be in [0, 1), got {}", self.dropout);
        }
        if self.weight_decay < 0.0 {
            bail!("weight_decay must not be negative");
        }
        Ok(())
    }

    pub fn model_config(&self) -> PairClassifierConfig {
        PairClassifierConfig::new(
            self.vocab_size,
            self.max_length,
            self.d_model,
            self.num_heads,
            self.num_layers,
            self.d_ff,
            self.dropout,
        )
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
pub struct TrainUseCase {
    config: TrainConfig,
}

impl TrainUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Execute the full training pipeline end to end
    pub fn execute(&self) -> Result<TrainingSummary> {
        let mut cfg = self.config.clone();
        cfg.validate()?;
        let mut rng = StdRng::seed_from_u64(cfg.seed);

        // ── Steps 1–2: labelled examples for both splits ──────────────────────
        let prepared = build_examples(&cfg, &mut rng)?;

        // ── Step 3: Build / load tokenizer ────────────────────────────────────
        // Vocabulary comes from training text only
        let texts: Vec<&str> = prepared
            .train
            .iter()
            .flat_map(|e| [e.set_a.as_str(), e.set_b.as_str()])
            .collect();
        let tok_store = TokenizerStore::new(cfg.output_dir.as_str());
        let tokenizer = tok_store.load_or_build(&cfg.model_name, &texts, cfg.max_words)?;
        cfg.vocab_size = id_space(&tokenizer);
        tracing::info!("Tokenizer id space: {}", cfg.vocab_size);

        // ── Step 4: Encode ────────────────────────────────────────────────────
        let encoder = PairEncoder::new(tokenizer, cfg.max_length)?;
        tracing::info!("Encoding pairs to {} tokens", encoder.max_length());
        let train_samples = encoder
            .encode_all(&prepared.train)
            .context("Failed to encode training pairs")?;
        let valid_samples = encoder
            .encode_all(&prepared.valid)
            .context("Failed to encode validation pairs")?;

        // ── Step 5: Build Burn datasets ───────────────────────────────────────
        let train_dataset = PairDataset::new(train_samples);
        let valid_dataset = PairDataset::new(valid_samples);
        let (real, fake) = train_dataset.label_counts();
        tracing::info!(
            "Datasets: {} train ({} real / {} fake), {} validation",
            train_dataset.sample_count(), real, fake, valid_dataset.sample_count()
        );
        if train_dataset.sample_count() == 0 {
            bail!("no trainable pairs: the training split is empty");
        }

        // ── Step 6: Save config for scoring ───────────────────────────────────
        let ckpt_manager = CheckpointManager::new(cfg.output_dir.as_str())?;
        ckpt_manager.save_config(&cfg)?;
        let logger = MetricsLogger::new(cfg.output_dir.as_str())?;

        // ── Step 7: Run training loop (Layer 5) ───────────────────────────────
        let summary = run_training(&cfg, train_dataset, valid_dataset, &ckpt_manager, &logger)?;
        tracing::info!(
            "Artifacts in '{}', metrics in '{}'",
            ckpt_manager.dir().display(),
            logger.csv_path().display()
        );
        Ok(summary)
    }
}
