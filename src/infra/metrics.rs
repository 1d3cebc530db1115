// ============================================================
// Layer 6 — Classification Metrics and Metrics Logger
// ============================================================
// Two things live here:
//
//   compute_metrics  — pure function from (labels, predictions)
//                      to accuracy / precision / recall / F1,
//                      binary averaging with class 1 ("real
//                      paraphrase") as the positive class
//
//   MetricsLogger    — appends one CSV row per evaluation so a
//                      run can be plotted afterwards
//
// Binary averaging:
//   precision = TP / (TP + FP)
//   recall    = TP / (TP + FN)
//   f1        = 2 · P · R / (P + R)
// Any 0/0 is reported as 0.0 instead of NaN.
//
// Output file: <output_dir>/metrics.csv, written with the csv crate
//
//   step,epoch,train_loss,eval_loss,accuracy,precision,recall,f1
//   100,1,0.6831,0.6712,0.581,0.602,0.499,0.5457
//
// Reference: Rust Book §12 (I/O and File Handling)
//            csv crate documentation (serde serialisation)

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, OpenOptions},
    path::PathBuf,
};

const POSITIVE: u8 = 1;

/// The four scalar classification metrics.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy:  f64,
    pub precision: f64,
    pub recall:    f64,
    pub f1:        f64,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

/// Binary-averaged metrics. Empty input yields all zeros.
/// Fails if `labels` and `preds` differ in length.
pub fn compute_metrics(labels: &[u8], preds: &[u8]) -> Result<ClassificationMetrics> {
    if labels.len() != preds.len() {
        bail!(
            "{} labels but {} predictions; cannot compute metrics",
            labels.len(),
            preds.len()
        );
    }

    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    let mut correct = 0usize;

    for (&y, &p) in labels.iter().zip(preds) {
        if y == p {
            correct += 1;
        }
        match (y == POSITIVE, p == POSITIVE) {
            (true, true)  => tp += 1,
            (false, true) => fp += 1,
            (true, false) => fn_ += 1,
            (false, false) => {}
        }
    }

    let precision = ratio(tp, tp + fp);
    let recall    = ratio(tp, tp + fn_);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    Ok(ClassificationMetrics {
        accuracy: ratio(correct, labels.len()),
        precision,
        recall,
        f1,
    })
}

/// One row of metrics data for a single evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalRecord {
    /// Optimizer step at which the evaluation ran
    pub step: usize,

    /// Epoch the step belongs to (starts at 1)
    pub epoch: usize,

    /// Mean training loss since the previous evaluation
    pub train_loss: f64,

    /// Mean validation loss
    pub eval_loss: f64,

    pub metrics: ClassificationMetrics,
}

impl EvalRecord {
    /// Returns true if this evaluation beat the best F1 seen so far
    pub fn is_improvement(&self, best_f1: f64) -> bool {
        self.metrics.f1 > best_f1
    }
}

/// Flat CSV row; the csv crate cannot write a nested struct with headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsRow {
    pub step:       usize,
    pub epoch:      usize,
    pub train_loss: f64,
    pub eval_loss:  f64,
    pub accuracy:   f64,
    pub precision:  f64,
    pub recall:     f64,
    pub f1:         f64,
}

impl From<&EvalRecord> for MetricsRow {
    fn from(r: &EvalRecord) -> Self {
        Self {
            step:       r.step,
            epoch:      r.epoch,
            train_loss: r.train_loss,
            eval_loss:  r.eval_loss,
            accuracy:   r.metrics.accuracy,
            precision:  r.metrics.precision,
            recall:     r.metrics.recall,
            f1:         r.metrics.f1,
        }
    }
}

const HEADER: [&str; 8] = [
    "step", "epoch", "train_loss", "eval_loss", "accuracy", "precision", "recall", "f1",
];

/// Logs evaluation records to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger, starting a fresh CSV with a header row.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create '{}'", dir.display()))?;

        let csv_path = dir.join("metrics.csv");
        let mut writer = csv::Writer::from_path(&csv_path)
            .with_context(|| format!("Cannot create '{}'", csv_path.display()))?;
        writer.write_record(HEADER)?;
        writer.flush()?;
        tracing::debug!("Created metrics CSV: '{}'", csv_path.display());

        Ok(Self { csv_path })
    }

    /// Append one evaluation as a new row in the CSV.
    pub fn log(&self, r: &EvalRecord) -> Result<()> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .with_context(|| format!("Cannot open '{}'", self.csv_path.display()))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        writer.serialize(MetricsRow::from(r))?;
        writer.flush()?;

        tracing::debug!("Logged step {} metrics: f1={:.4}", r.step, r.metrics.f1);
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}
