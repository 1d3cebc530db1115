// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `prepare`, `train` and `score`
// and all their configurable flags.
//
// `prepare` and `train` share the data flags (DataArgs) through
// #[command(flatten)], so both see the same corpus the same way.
//
// Reference: Rust Book §12 (Building a CLI Program)

use clap::{Args, Subcommand};
use crate::application::train_use_case::TrainConfig;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build labelled pairs and write train.csv / valid.csv snapshots
    Prepare(PrepareArgs),

    /// Train the fake-paraphrase classifier
    Train(TrainArgs),

    /// Score one sentence pair with a trained model
    Score(ScoreArgs),
}

/// Flags that decide which labelled rows get built.
#[derive(Args, Debug)]
pub struct DataArgs {
    /// Paraphrase corpus CSV (paraphrase_set_id, sentence_id, paraphrase[, language])
    #[arg(long, default_value = "data/tapaco_en.csv")]
    pub corpus: String,

    /// Only rows with this language code are kept
    #[arg(long, default_value = "en")]
    pub language: String,

    /// Number of paraphrase groups drawn with replacement (0 = use all)
    #[arg(long, default_value_t = 1000)]
    pub sample_groups: usize,

    /// Seed for subsampling, augmentation and shuffling
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Tab-separated synonym file used by augmentation
    /// (defaults to a small built-in thesaurus)
    #[arg(long)]
    pub thesaurus: Option<String>,

    /// Pairs per expansion batch; each batch flips one coin
    #[arg(long, default_value_t = 1000)]
    pub expand_batch: usize,

    /// Directory for snapshots, tokenizer, metrics and weights
    #[arg(long, default_value = "models/fake_paraphrase_detector")]
    pub output_dir: String,
}

#[derive(Args, Debug)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Directory with a pretrained tokenizer.json and/or model.mpk
    #[arg(long, default_value = "models/base")]
    pub model_name: String,

    /// Tokens per encoded pair: [CLS] set_a [SEP] set_b [SEP] + padding
    #[arg(long, default_value_t = 256)]
    pub max_length: usize,

    #[arg(long, default_value_t = 32)]
    pub batch_size: usize,

    #[arg(long, default_value_t = 20)]
    pub epochs: usize,

    /// Evaluate every N optimizer steps
    #[arg(long, default_value_t = 100)]
    pub eval_steps: usize,

    /// Peak learning rate reached after warmup
    #[arg(long, default_value_t = 5e-5)]
    pub lr: f64,

    #[arg(long, default_value_t = 500)]
    pub warmup_steps: usize,

    /// Micro-batches whose gradients are summed per optimizer step
    #[arg(long, default_value_t = 2)]
    pub grad_accum: usize,

    /// AdamW decoupled weight decay
    #[arg(long, default_value_t = 0.01)]
    pub weight_decay: f64,

    /// Hidden dimension of the transformer
    #[arg(long, default_value_t = 256)]
    pub d_model: usize,

    /// d_model must be divisible by num_heads
    #[arg(long, default_value_t = 8)]
    pub num_heads: usize,

    #[arg(long, default_value_t = 6)]
    pub num_layers: usize,

    /// Inner dimension of the feed-forward network, typically 4x d_model
    #[arg(long, default_value_t = 1024)]
    pub d_ff: usize,

    #[arg(long, default_value_t = 0.1)]
    pub dropout: f64,

    /// Vocabulary cap when no pretrained tokenizer is found
    #[arg(long, default_value_t = 30000)]
    pub max_words: usize,
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Output directory of a finished `train` run
    #[arg(long, default_value = "models/fake_paraphrase_detector")]
    pub output_dir: String,

    /// The reference sentence
    #[arg(long)]
    pub set_a: String,

    /// The candidate paraphrase
    #[arg(long)]
    pub set_b: String,
}

impl DataArgs {
    fn apply(self, cfg: TrainConfig) -> TrainConfig {
        TrainConfig {
            corpus:        self.corpus,
            language:      self.language,
            sample_groups: self.sample_groups,
            seed:          self.seed,
            thesaurus:     self.thesaurus,
            expand_batch:  self.expand_batch,
            output_dir:    self.output_dir,
            ..cfg
        }
    }
}

/// The application layer never sees clap types.
impl From<PrepareArgs> for TrainConfig {
    fn from(a: PrepareArgs) -> Self {
        a.data.apply(TrainConfig::default())
    }
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        let model = TrainConfig {
            model_name:   a.model_name,
            max_length:   a.max_length,
            batch_size:   a.batch_size,
            epochs:       a.epochs,
            eval_steps:   a.eval_steps,
            lr:           a.lr,
            warmup_steps: a.warmup_steps,
            grad_accum:   a.grad_accum,
            weight_decay: a.weight_decay,
            d_model:      a.d_model,
            num_heads:    a.num_heads,
            num_layers:   a.num_layers,
            d_ff:         a.d_ff,
            dropout:      a.dropout,
            max_words:    a.max_words,
            ..TrainConfig::default()
        };
        a.data.apply(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_train_flags_reach_config() {
        let cli = Cli::try_parse_from([
            "paraphrase-critic", "train",
            "--corpus", "c.csv", "--sample-groups", "0",
            "--max-length", "64", "--eval-steps", "10", "--grad-accum", "4",
        ])
        .unwrap();
        let Commands::Train(args) = cli.command else { panic!("expected train") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.corpus, "c.csv");
        assert_eq!(cfg.sample_groups, 0);
        assert_eq!(cfg.max_length, 64);
        assert_eq!(cfg.eval_steps, 10);
        assert_eq!(cfg.grad_accum, 4);
        assert_eq!(cfg.batch_size, 32);
    }

    #[test]
    fn test_prepare_uses_defaults() {
        let cli = Cli::try_parse_from(["paraphrase-critic", "prepare", "--seed", "9"]).unwrap();
        let Commands::Prepare(args) = cli.command else { panic!("expected prepare") };
        let cfg: TrainConfig = args.into();
        assert_eq!(cfg.seed, 9);
        assert_eq!(cfg.language, "en");
        assert!(cfg.thesaurus.is_none());
    }

    #[test]
    fn test_score_requires_both_sentences() {
        assert!(Cli::try_parse_from(["paraphrase-critic", "score", "--set-a", "x"]).is_err());
    }
}
