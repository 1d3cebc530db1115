// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// This is the entry point for all user interaction.
// It uses the `clap` crate to parse command line arguments.
// All business logic is delegated to Layer 2 (application).
//
// Three commands are supported:
//   1. `prepare` — writes labelled train/valid snapshots
//   2. `train`   — runs the full pipeline and fine-tunes the model
//   3. `score`   — loads a finished run and scores one pair
//
// Reference: Rust Book §7 (Modules), §12 (CLI programs)

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, PrepareArgs, ScoreArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "paraphrase-critic",
    version,
    about = "Train a classifier that tells real paraphrases from fake ones."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Match on the subcommand and dispatch to the correct use case.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Prepare(args) => run_prepare(args),
            Commands::Train(args)   => run_train(args),
            Commands::Score(args)   => run_score(args),
        }
    }
}

fn run_prepare(args: PrepareArgs) -> Result<()> {
    use crate::application::prepare_use_case::PrepareUseCase;

    let (train, valid) = PrepareUseCase::new(args.into()).execute()?;
    println!("Wrote {} and {}", train.display(), valid.display());
    Ok(())
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainUseCase;

    tracing::info!("Starting training on corpus: {}", args.data.corpus);
    let summary = TrainUseCase::new(args.into()).execute()?;

    let m = summary.final_eval.metrics;
    println!(
        "Training complete after {} steps. Final: acc={:.1}% precision={:.3} recall={:.3} f1={:.3} (best f1={:.3})",
        summary.steps, m.accuracy * 100.0, m.precision, m.recall, m.f1, summary.best_f1
    );
    Ok(())
}

fn run_score(args: ScoreArgs) -> Result<()> {
    use crate::application::score_use_case::ScoreUseCase;

    let use_case = ScoreUseCase::new(&args.output_dir)?;
    let p = use_case.score(&args.set_a, &args.set_b)?;
    let verdict = if p >= 0.5 { "real paraphrase" } else { "fake paraphrase" };
    println!("P(real) = {:.4} → {}", p, verdict);
    Ok(())
}
