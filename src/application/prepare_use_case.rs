// ============================================================
// Layer 2 — PrepareUseCase
// ============================================================
// Everything that happens before tokenisation, shared by the
// `train` and `prepare` commands:
//
//   Step 1: Load the corpus CSV          (Layer 4 - data)
//   Step 2: Subsample paraphrase groups  (Layer 4 - data)
//   Step 3: Split train / valid by group (Layer 4 - data)
//   Step 4: Build ordered pairs          (Layer 4 - data)
//   Step 5: Attach rotated negatives     (Layer 4 - data)
//   Step 6: Expand into labelled rows    (Layer 4 - data)
//
// `prepare` stops here and writes train.csv / valid.csv so the
// labelled data can be inspected without training.

use anyhow::{bail, Context, Result};
use rand::{rngs::StdRng, RngCore, SeedableRng};
use std::path::{Path, PathBuf};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    augment::EdaAugmenter,
    expander::expand,
    loader::CsvCorpusLoader,
    negatives::{attach_negatives, NegativeReport},
    pairing::build_pairs,
    splitter::{split_by_group, subsample_groups},
    thesaurus::{BuiltinThesaurus, FileThesaurus},
};
use crate::domain::{
    pair::LabeledExample,
    traits::{Augmenter, CorpusSource},
};

/// Groups with `group_id % VALID_MODULUS == 0` form the validation split
pub const VALID_MODULUS: u64 = 4;

/// Labelled rows for both splits plus the negative-sampling reports.
#[derive(Debug)]
pub struct PreparedExamples {
    pub train:        Vec<LabeledExample>,
    pub valid:        Vec<LabeledExample>,
    pub train_report: NegativeReport,
    pub valid_report: NegativeReport,
}

fn build_augmenter(cfg: &TrainConfig) -> Result<Box<dyn Augmenter>> {
    match &cfg.thesaurus {
        Some(path) => {
            let thesaurus = FileThesaurus::load(path)?;
            Ok(Box::new(EdaAugmenter::new(thesaurus)))
        }
        None => Ok(Box::new(EdaAugmenter::new(BuiltinThesaurus::new()))),
    }
}

/// Run the pipeline from corpus file to shuffled labelled rows.
pub fn build_examples(cfg: &TrainConfig, rng: &mut dyn RngCore) -> Result<PreparedExamples> {
    // ── Step 1: Load ──────────────────────────────────────────────────────────
    tracing::info!("Loading corpus '{}' (language '{}')", cfg.corpus, cfg.language);
    let records = CsvCorpusLoader::new(&cfg.corpus, cfg.language.as_str()).load_all()?;
    if records.is_empty() {
        bail!("Corpus '{}' has no '{}' sentences", cfg.corpus, cfg.language);
    }

    // ── Steps 2–3: Subsample and split ────────────────────────────────────────
    let records = subsample_groups(records, cfg.sample_groups, &mut *rng);
    let (train_records, valid_records) = split_by_group(records, VALID_MODULUS);

    // ── Step 4: Pairs ─────────────────────────────────────────────────────────
    let train_pairs = build_pairs(&train_records);
    let valid_pairs = build_pairs(&valid_records);
    tracing::info!("Built {} train / {} validation pairs", train_pairs.len(), valid_pairs.len());
    if train_pairs.is_empty() && valid_pairs.is_empty() {
        bail!("no trainable pairs: every paraphrase group has fewer than two sentences");
    }

    // ── Step 5: Negatives ─────────────────────────────────────────────────────
    let (train_neg, train_report) = attach_negatives(train_pairs);
    let (valid_neg, valid_report) = attach_negatives(valid_pairs);

    // ── Step 6: Expand ────────────────────────────────────────────────────────
    let augmenter = build_augmenter(cfg)?;
    let train = expand(&train_neg, cfg.expand_batch, rng, augmenter.as_ref());
    let valid = expand(&valid_neg, cfg.expand_batch, rng, augmenter.as_ref());
    tracing::info!("Labelled rows: {} train, {} validation", train.len(), valid.len());

    Ok(PreparedExamples { train, valid, train_report, valid_report })
}

/// Write labelled rows as CSV with header `set_a,set_b,label`.
pub fn write_snapshot(path: impl AsRef<Path>, examples: &[LabeledExample]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Cannot create snapshot '{}'", path.display()))?;
    for example in examples {
        writer.serialize(example)?;
    }
    writer
        .flush()
        .with_context(|| format!("Cannot write snapshot '{}'", path.display()))?;
    tracing::debug!("Wrote {} rows to '{}'", examples.len(), path.display());
    Ok(())
}

// ─── PrepareUseCase ───────────────────────────────────────────────────────────
pub struct PrepareUseCase {
    config: TrainConfig,
}

impl PrepareUseCase {
    pub fn new(config: TrainConfig) -> Self {
        Self { config }
    }

    /// Build the labelled data and write both snapshots.
    /// Returns the (train, valid) file paths.
    pub fn execute(&self) -> Result<(PathBuf, PathBuf)> {
        let cfg = &self.config;
        let mut rng = StdRng::seed_from_u64(cfg.seed);
        let prepared = build_examples(cfg, &mut rng)?;

        let dir = PathBuf::from(&cfg.output_dir);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;

        let train_path = dir.join("train.csv");
        let valid_path = dir.join("valid.csv");
        write_snapshot(&train_path, &prepared.train)?;
        write_snapshot(&valid_path, &prepared.valid)?;

        let splits = [
            ("train", &prepared.train, &prepared.train_report),
            ("valid", &prepared.valid, &prepared.valid_report),
        ];
        for (name, rows, report) in splits {
            let real = rows.iter().filter(|e| e.is_real()).count();
            tracing::info!(
                "{}: {} real / {} fake rows; negatives offset {}, effective shift {}, {} collisions",
                name, real, rows.len() - real,
                report.offset, report.effective_shift, report.collisions
            );
        }
        Ok((train_path, valid_path))
    }
}
