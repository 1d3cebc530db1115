// ============================================================
// Layer 5 — Training Loop
// ============================================================
// Fine-tunes the pair classifier with Burn's DataLoader and AdamW.
//
//   - Gradients of `grad_accum` micro-batches are summed before
//     each optimizer step (the last micro-batches of an epoch
//     always flush, even if fewer than `grad_accum`)
//   - Learning rate: linear warmup for `warmup_steps`, then
//     linear decay to zero at the final step
//   - Every `eval_steps` optimizer steps, and once at the end,
//     the validation split is scored with `compute_metrics`
//   - Weights are written once, after the last step
//
// Key Burn insight:
//   - Training uses B (Autodiff<Wgpu>) for gradients
//   - model.valid() returns the model on B::InnerBackend
//   - The validation batcher must also use B::InnerBackend
//   - argmax(1) returns [batch,1] so we flatten before reading
//
// Reference: Burn Book §5, Loshchilov & Hutter (2019) AdamW

use anyhow::Result;
use burn::{
    data::dataloader::{DataLoader, DataLoaderBuilder},
    data::dataset::Dataset,
    module::AutodiffModule,
    optim::{AdamWConfig, GradientsAccumulator, GradientsParams, Optimizer},
    prelude::*,
    tensor::backend::AutodiffBackend,
};

use crate::application::train_use_case::TrainConfig;
use crate::data::{
    batcher::{PairBatch, PairBatcher},
    dataset::PairDataset,
};
use crate::infra::checkpoint::{has_weights, load_weights, CheckpointManager};
use crate::infra::metrics::{compute_metrics, ClassificationMetrics, EvalRecord, MetricsLogger};
use crate::ml::model::PairClassifier;

type MyBackend = burn::backend::Autodiff<burn::backend::Wgpu>;

/// What a finished run reports back to the use case.
#[derive(Debug, Clone)]
pub struct TrainingSummary {
    pub steps:      usize,
    pub final_eval: EvalRecord,
    pub best_f1:    f64,
}

/// Loss and metrics over one pass of the validation loader.
#[derive(Debug, Clone, Copy)]
pub struct EvalOutcome {
    pub loss:    f64,
    pub metrics: ClassificationMetrics,
    pub samples: usize,
}

pub fn run_training(
    cfg:           &TrainConfig,
    train_dataset: PairDataset,
    valid_dataset: PairDataset,
    ckpt_manager:  &CheckpointManager,
    logger:        &MetricsLogger,
) -> Result<TrainingSummary> {
    let device = burn::backend::wgpu::WgpuDevice::default();
    tracing::info!("Using WGPU device: {:?}", device);
    train_loop::<MyBackend>(cfg, train_dataset, valid_dataset, ckpt_manager, logger, device)
}

/// Linear warmup then linear decay, as a multiple of `base_lr`.
///
/// `step` counts optimizer steps from 0.
pub fn linear_warmup_lr(step: usize, base_lr: f64, warmup_steps: usize, total_steps: usize) -> f64 {
    if step < warmup_steps {
        return base_lr * step as f64 / warmup_steps.max(1) as f64;
    }
    let remaining = total_steps.saturating_sub(step) as f64;
    let decay_len = total_steps.saturating_sub(warmup_steps).max(1) as f64;
    base_lr * (remaining / decay_len).max(0.0)
}

/// Optimizer steps in a full run.
pub fn total_optimizer_steps(samples: usize, batch_size: usize, grad_accum: usize, epochs: usize) -> usize {
    let batches = samples.div_ceil(batch_size.max(1));
    batches.div_ceil(grad_accum.max(1)) * epochs
}

pub fn evaluate<B: Backend>(
    model:  &PairClassifier<B>,
    loader: &dyn DataLoader<PairBatch<B>>,
) -> Result<EvalOutcome> {
    let mut loss_sum = 0.0f64;
    let mut batches  = 0usize;
    let mut labels: Vec<u8> = Vec::new();
    let mut preds:  Vec<u8> = Vec::new();

    for batch in loader.iter() {
        let output = model.forward_classification(
            batch.input_ids,
            batch.token_type_ids,
            batch.attention_mask,
            batch.labels.clone(),
        );
        loss_sum += output.loss.into_scalar().elem::<f64>();
        batches  += 1;

        // argmax(1) returns shape [batch, 1] — flatten to [batch]
        let batch_preds = output.logits.argmax(1).flatten::<1>(0, 1);
        preds.extend(batch_preds.into_data().iter::<i64>().map(|p| p as u8));
        labels.extend(batch.labels.into_data().iter::<i64>().map(|y| y as u8));
    }

    Ok(EvalOutcome {
        loss:    if batches > 0 { loss_sum / batches as f64 } else { f64::NAN },
        metrics: compute_metrics(&labels, &preds)?,
        samples: labels.len(),
    })
}

/// Score the validation split, print and log the result.
fn report<B: Backend>(
    step:        usize,
    epoch:       usize,
    train_loss:  f64,
    model:       &PairClassifier<B>,
    loader:      &dyn DataLoader<PairBatch<B>>,
    logger:      &MetricsLogger,
) -> Result<EvalRecord> {
    let outcome = evaluate(model, loader)?;
    if outcome.samples == 0 {
        tracing::warn!("Validation split is empty; metrics are meaningless");
    }

    let record = EvalRecord {
        step,
        epoch,
        train_loss,
        eval_loss: outcome.loss,
        metrics:   outcome.metrics,
    };

    println!(
        "Step {:>6} | epoch {:>3} | train_loss={:.4} | eval_loss={:.4} | acc={:.1}% | precision={:.3} | recall={:.3} | f1={:.3}",
        step, epoch, train_loss, outcome.loss,
        outcome.metrics.accuracy * 100.0,
        outcome.metrics.precision, outcome.metrics.recall, outcome.metrics.f1,
    );

    logger.log(&record)?;
    Ok(record)
}

pub fn train_loop<B: AutodiffBackend>(
    cfg:           &TrainConfig,
    train_dataset: PairDataset,
    valid_dataset: PairDataset,
    ckpt_manager:  &CheckpointManager,
    logger:        &MetricsLogger,
    device:        B::Device,
) -> Result<TrainingSummary> {

    // ── Build model (optionally warm-started) ─────────────────────────────────
    let mut model: PairClassifier<B> = cfg.model_config().init(&device);
    if has_weights::<B>(&cfg.model_name) {
        model = load_weights(&cfg.model_name, model, &device)?;
        tracing::info!("Warm start from weights in '{}'", cfg.model_name);
    }
    tracing::info!(
        "Model ready: {} layers, d_model={}, vocab={}",
        cfg.num_layers, cfg.d_model, cfg.vocab_size
    );

    // ── AdamW optimiser ───────────────────────────────────────────────────────
    let mut optim = AdamWConfig::new()
        .with_weight_decay(cfg.weight_decay as f32)
        .init();
    let mut accumulator = GradientsAccumulator::<PairClassifier<B>>::new();

    let train_len   = train_dataset.len();
    let n_batches   = train_len.div_ceil(cfg.batch_size);
    let total_steps = total_optimizer_steps(train_len, cfg.batch_size, cfg.grad_accum, cfg.epochs);
    tracing::info!(
        "{} training samples, {} batches/epoch, {} optimizer steps",
        train_len, n_batches, total_steps
    );

    // ── Data loaders ──────────────────────────────────────────────────────────
    let train_batcher = PairBatcher::<B>::new(device.clone());
    let train_loader  = DataLoaderBuilder::new(train_batcher)
        .batch_size(cfg.batch_size)
        .shuffle(cfg.seed)
        .num_workers(1)
        .build(train_dataset);

    let valid_batcher = PairBatcher::<B::InnerBackend>::new(device.clone());
    let valid_loader  = DataLoaderBuilder::new(valid_batcher)
        .batch_size(cfg.batch_size)
        .num_workers(1)
        .build(valid_dataset);

    // ── Step loop ─────────────────────────────────────────────────────────────
    let mut step          = 0usize;
    let mut pending       = 0usize;
    let mut window_loss   = 0.0f64;
    let mut window_count  = 0usize;
    let mut best_f1       = 0.0f64;
    let mut last_record: Option<EvalRecord> = None;

    for epoch in 1..=cfg.epochs {
        for (batch_idx, batch) in train_loader.iter().enumerate() {
            let output = model.forward_classification(
                batch.input_ids,
                batch.token_type_ids,
                batch.attention_mask,
                batch.labels,
            );

            window_loss  += output.loss.clone().into_scalar().elem::<f64>();
            window_count += 1;

            let loss  = output.loss / (cfg.grad_accum as f64);
            let grads = GradientsParams::from_grads(loss.backward(), &model);
            accumulator.accumulate(&model, grads);
            pending += 1;

            let epoch_done = batch_idx + 1 == n_batches;
            if pending < cfg.grad_accum && !epoch_done {
                continue;
            }

            // Summed micro-batch gradients → one AdamW update
            let lr = linear_warmup_lr(step, cfg.lr, cfg.warmup_steps, total_steps);
            model = optim.step(lr, model, accumulator.grads());
            pending = 0;
            step   += 1;

            if step % cfg.eval_steps == 0 {
                let train_loss = window_loss / window_count.max(1) as f64;
                let record = report(step, epoch, train_loss, &model.valid(), valid_loader.as_ref(), logger)?;
                if record.is_improvement(best_f1) {
                    tracing::info!("New best f1 {:.4} at step {}", record.metrics.f1, step);
                    best_f1 = record.metrics.f1;
                }
                last_record = Some(record);
                window_loss  = 0.0;
                window_count = 0;
            }
        }
        tracing::info!("Epoch {}/{} finished at step {}", epoch, cfg.epochs, step);
    }

    // ── Final evaluation (unless the last step was just evaluated) ────────────
    let final_eval = match last_record {
        Some(record) if record.step == step => record,
        _ => {
            let train_loss = window_loss / window_count.max(1) as f64;
            report(step, cfg.epochs, train_loss, &model.valid(), valid_loader.as_ref(), logger)?
        }
    };
    best_f1 = best_f1.max(final_eval.metrics.f1);

    ckpt_manager.save_model(&model)?;
    tracing::info!("Training complete after {} steps (best f1={:.4})", step, best_f1);

    Ok(TrainingSummary { steps: step, final_eval, best_f1 })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::dataset::PairSample;
    use burn::backend::{Autodiff, NdArray};

    #[test]
    fn test_warmup_then_decay() {
        assert_eq!(linear_warmup_lr(0, 1.0, 10, 110), 0.0);
        assert!((linear_warmup_lr(5, 1.0, 10, 110) - 0.5).abs() < 1e-12);
        assert!((linear_warmup_lr(10, 1.0, 10, 110) - 1.0).abs() < 1e-12);
        assert!((linear_warmup_lr(60, 1.0, 10, 110) - 0.5).abs() < 1e-12);
        assert_eq!(linear_warmup_lr(110, 1.0, 10, 110), 0.0);
        assert_eq!(linear_warmup_lr(500, 1.0, 10, 110), 0.0);
    }

    #[test]
    fn test_warmup_longer_than_run() {
        // a short run never leaves warmup
        let lr = linear_warmup_lr(3, 2e-5, 500, 20);
        assert!(lr > 0.0 && lr < 2e-5);
    }

    #[test]
    fn test_total_optimizer_steps() {
        // 10 samples / batch 4 → 3 batches → ceil(3/2) = 2 steps per epoch
        assert_eq!(total_optimizer_steps(10, 4, 2, 3), 6);
        assert_eq!(total_optimizer_steps(0, 4, 2, 3), 0);
    }

    fn samples(n: usize) -> Vec<PairSample> {
        (0..n)
            .map(|i| {
                let label = (i % 2) as u8;
                PairSample {
                    input_ids:      vec![101, 104 + label as u32, 102, 106, 102, 0, 0, 0],
                    attention_mask: vec![1, 1, 1, 1, 1, 0, 0, 0],
                    token_type_ids: vec![0, 0, 0, 1, 1, 0, 0, 0],
                    label,
                }
            })
            .collect()
    }

    fn scratch(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("paraphrase-critic-train-{name}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn tiny_config(dir: &std::path::Path, grad_accum: usize, eval_steps: usize) -> TrainConfig {
        TrainConfig {
            output_dir:   dir.to_string_lossy().to_string(),
            model_name:   dir.join("no-weights").to_string_lossy().to_string(),
            max_length:   8,
            batch_size:   4,
            epochs:       2,
            eval_steps,
            warmup_steps: 1,
            grad_accum,
            d_model:      16,
            num_heads:    2,
            num_layers:   1,
            d_ff:         32,
            dropout:      0.0,
            vocab_size:   128,
            ..TrainConfig::default()
        }
    }

    fn run(cfg: &TrainConfig, train: usize, valid: usize) -> (TrainingSummary, MetricsLogger) {
        let ckpt   = CheckpointManager::new(cfg.output_dir.clone()).unwrap();
        let logger = MetricsLogger::new(cfg.output_dir.clone()).unwrap();
        let summary = train_loop::<Autodiff<NdArray>>(
            cfg,
            PairDataset::new(samples(train)),
            PairDataset::new(samples(valid)),
            &ckpt,
            &logger,
            Default::default(),
        )
        .unwrap();
        (summary, logger)
    }

    #[test]
    fn test_tiny_training_run() {
        let dir = scratch("tiny");
        let cfg = tiny_config(&dir, 1, 2);
        let (summary, logger) = run(&cfg, 8, 4);

        // 8 samples / batch 4 = 2 steps per epoch
        assert_eq!(summary.steps, 4);
        assert_eq!(summary.final_eval.step, 4);
        assert!(summary.final_eval.eval_loss.is_finite());
        assert!(has_weights::<Autodiff<NdArray>>(&dir));

        // header + evaluations at steps 2 and 4
        let csv = std::fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 3);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_accumulation_flushes_at_epoch_end() {
        let dir = scratch("accum");
        let cfg = tiny_config(&dir, 2, 3);

        // 12 samples / batch 4 = 3 micro-batches per epoch: one full
        // pair plus a lone remainder that must still step
        let (summary, logger) = run(&cfg, 12, 4);
        assert_eq!(summary.steps, total_optimizer_steps(12, 4, 2, 2));
        assert_eq!(summary.steps, 4);

        // header + eval at step 3 + final eval at step 4
        let csv = std::fs::read_to_string(logger.csv_path()).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert_eq!(summary.final_eval.step, 4);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_warm_start_from_previous_run() {
        let first = scratch("warm-first");
        run(&tiny_config(&first, 1, 2), 8, 4);
        assert!(has_weights::<Autodiff<NdArray>>(&first));

        let second = scratch("warm-second");
        let cfg = TrainConfig {
            model_name: first.to_string_lossy().to_string(),
            ..tiny_config(&second, 1, 2)
        };
        let (summary, _) = run(&cfg, 8, 4);
        assert_eq!(summary.steps, 4);

        let _ = std::fs::remove_dir_all(&first);
        let _ = std::fs::remove_dir_all(&second);
    }
}
