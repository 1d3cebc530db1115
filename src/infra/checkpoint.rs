// ============================================================
// Layer 6 — Checkpoint Manager
// ============================================================
// Saves and restores the classifier using Burn's CompactRecorder.
//
// What gets saved (only once, after training finishes):
//   1. model.mpk           — all learned parameters
//   2. train_config.json   — the full TrainConfig, so `score`
//                            can rebuild the same architecture
//
// Burn's CompactRecorder:
//   - Serialises model parameters to named MessagePack
//   - Stores floats at half precision
//   - Type-safe: loading fails if the architecture doesn't match
//
// The recorder picks the file extension itself, so every path
// here is built from `FileRecorder::file_extension()` rather
// than a hard-coded name.
//
// The same format doubles as the warm-start input: a directory
// passed as `model_name` that contains model.mpk is loaded
// into the freshly built model before fine-tuning.
//
// Reference: Burn Book §5 (Records and Checkpointing)

use anyhow::{bail, Context, Result};
use std::{fs, path::{Path, PathBuf}};
use burn::{
    prelude::*,
    record::{CompactRecorder, FileRecorder, Recorder},
};

use crate::application::train_use_case::TrainConfig;
use crate::ml::model::PairClassifier;

/// File stem; the recorder appends its own extension
const MODEL_STEM: &str = "model";
const CONFIG_FILE: &str = "train_config.json";

pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Create a CheckpointManager rooted at `dir`, creating it if needed.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)
            .with_context(|| format!("Cannot create output directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    /// Open an existing run directory without creating anything.
    pub fn open(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        if !dir.is_dir() {
            bail!("Output directory '{}' does not exist. Have you run 'train' first?", dir.display());
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write the final model weights to {dir}/model.mpk
    pub fn save_model<B: Backend>(&self, model: &PairClassifier<B>) -> Result<()> {
        let path = self.dir.join(MODEL_STEM);

        CompactRecorder::new()
            .record(model.clone().into_record(), path.clone())
            .with_context(|| format!("Failed to save model to '{}'", path.display()))?;

        tracing::info!("Saved model to '{}'", weights_path::<B>(&self.dir).display());
        Ok(())
    }

    /// Load the weights saved by `save_model` into `model`.
    pub fn load_model<B: Backend>(
        &self,
        model:  PairClassifier<B>,
        device: &B::Device,
    ) -> Result<PairClassifier<B>> {
        load_weights(&self.dir, model, device).with_context(|| {
            format!("Cannot load model from '{}'. Have you run 'train' first?", self.dir.display())
        })
    }

    /// Save the training configuration to JSON.
    pub fn save_config(&self, cfg: &TrainConfig) -> Result<()> {
        let path = self.dir.join(CONFIG_FILE);
        let json = serde_json::to_string_pretty(cfg)?;
        fs::write(&path, json)
            .with_context(|| format!("Cannot write config to '{}'", path.display()))?;
        tracing::debug!("Saved training config to '{}'", path.display());
        Ok(())
    }

    /// Load the training configuration written by `save_config`.
    pub fn load_config(&self) -> Result<TrainConfig> {
        let path = self.dir.join(CONFIG_FILE);
        let json = fs::read_to_string(&path).with_context(|| {
            format!(
                "Cannot read config from '{}'. Make sure you have run 'train' before 'score'.",
                path.display()
            )
        })?;
        serde_json::from_str(&json)
            .with_context(|| format!("Malformed config '{}'", path.display()))
    }
}

/// Where CompactRecorder puts the weights inside `dir`.
pub fn weights_path<B: Backend>(dir: impl AsRef<Path>) -> PathBuf {
    let ext = <CompactRecorder as FileRecorder<B>>::file_extension();
    dir.as_ref().join(MODEL_STEM).with_extension(ext)
}

/// True when `dir` holds weights in the CompactRecorder format.
pub fn has_weights<B: Backend>(dir: impl AsRef<Path>) -> bool {
    weights_path::<B>(dir).exists()
}

/// Load {dir}/model.mpk into `model`.
pub fn load_weights<B: Backend>(
    dir:    impl AsRef<Path>,
    model:  PairClassifier<B>,
    device: &B::Device,
) -> Result<PairClassifier<B>> {
    let path = dir.as_ref().join(MODEL_STEM);
    let record = CompactRecorder::new()
        .load(path.clone(), device)
        .with_context(|| format!("Cannot load weights '{}'", path.display()))?;
    Ok(model.load_record(record))
}
