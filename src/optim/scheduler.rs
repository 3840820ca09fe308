use serde::{Serialize, Deserialize};
use std::f64::consts::PI;

/// Learning rate scheduler: returns the LR for a given step index
/// (0-based).  What counts as a "step" is fixed by the compile-time
/// `ScheduleCadence` — every training batch, or every epoch.
pub trait Scheduler {
    fn lr(&self, step: usize) -> f64;
}

/// When the driver advances the scheduler.
///
/// Per-batch is the default: cyclical and warmup-style policies assume it,
/// and coarse policies like step decay simply see larger step indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleCadence {
    PerBatch,
    PerEpoch,
}

impl Default for ScheduleCadence {
    fn default() -> Self {
        ScheduleCadence::PerBatch
    }
}

/// Constant learning rate (no decay).
pub struct ConstantLr {
    pub lr: f64,
}

impl Scheduler for ConstantLr {
    fn lr(&self, _step: usize) -> f64 {
        self.lr
    }
}

/// Step decay: multiply by `gamma` every `step_size` steps.
///
/// `lr(step) = initial_lr * gamma^(step / step_size)`
pub struct StepLr {
    pub initial_lr: f64,
    pub step_size: usize,
    pub gamma: f64,
}

impl Scheduler for StepLr {
    fn lr(&self, step: usize) -> f64 {
        let exponent = (step / self.step_size) as i32;
        self.initial_lr * self.gamma.powi(exponent)
    }
}

/// Cosine annealing from `initial_lr` down to `min_lr` over `total_steps`.
///
/// `lr(step) = min_lr + (initial_lr - min_lr) * 0.5 * (1 + cos(pi * step / total_steps))`
pub struct CosineAnnealingLr {
    pub initial_lr: f64,
    pub min_lr: f64,
    pub total_steps: usize,
}

impl Scheduler for CosineAnnealingLr {
    fn lr(&self, step: usize) -> f64 {
        let t = step as f64 / self.total_steps as f64;
        self.min_lr + (self.initial_lr - self.min_lr) * 0.5 * (1.0 + (PI * t).cos())
    }
}
