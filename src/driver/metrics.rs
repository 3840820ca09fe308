use serde::{Serialize, Deserialize};

use crate::error::TrainError;

/// Scalar result of `Driver::evaluate`: mean loss plus the task's headline
/// metric over one full pass of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    Classification { loss: f64, accuracy: f64 },
    Regression { loss: f64, mse: f64 },
}

impl Evaluation {
    pub fn loss(&self) -> f64 {
        match *self {
            Evaluation::Classification { loss, .. } => loss,
            Evaluation::Regression { loss, .. } => loss,
        }
    }
}

/// Full metric suite from `Driver::metrics`, computed fresh on every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricsReport {
    Classification(ClassificationMetrics),
    Regression(RegressionMetrics),
}

/// Multi-class metrics; precision and F1 are macro-averaged (unweighted mean
/// of the per-class values; a class with a zero denominator contributes 0).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassificationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub f1: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

/// Index of the maximum element in a slice.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Fraction of samples whose predicted class (argmax) matches the target's.
pub fn accuracy(predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
    if predictions.is_empty() {
        return 0.0;
    }
    let correct = predictions.iter().zip(targets.iter())
        .filter(|(p, t)| argmax(p) == argmax(t))
        .count();
    correct as f64 / predictions.len() as f64
}

/// Per-class (true positive, false positive, false negative) counts.
/// The class count is the target vector width.
fn confusion_counts(predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> Vec<(usize, usize, usize)> {
    let n_classes = targets.first().map(|t| t.len()).unwrap_or(0);
    let mut counts = vec![(0usize, 0usize, 0usize); n_classes];
    for (p, t) in predictions.iter().zip(targets.iter()) {
        let predicted = argmax(p);
        let actual = argmax(t);
        if predicted == actual {
            counts[actual].0 += 1;
        } else {
            counts[predicted].1 += 1;
            counts[actual].2 += 1;
        }
    }
    counts
}

/// Macro-averaged precision: mean over classes of tp / (tp + fp).
pub fn macro_precision(predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
    let counts = confusion_counts(predictions, targets);
    if counts.is_empty() {
        return 0.0;
    }
    let sum: f64 = counts.iter()
        .map(|&(tp, fp, _)| {
            let denom = tp + fp;
            if denom == 0 { 0.0 } else { tp as f64 / denom as f64 }
        })
        .sum();
    sum / counts.len() as f64
}

/// Macro-averaged F1: mean over classes of the harmonic mean of the class's
/// precision and recall.
pub fn macro_f1(predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
    let counts = confusion_counts(predictions, targets);
    if counts.is_empty() {
        return 0.0;
    }
    let sum: f64 = counts.iter()
        .map(|&(tp, fp, fn_)| {
            let p_denom = tp + fp;
            let r_denom = tp + fn_;
            if p_denom == 0 || r_denom == 0 {
                return 0.0;
            }
            let precision = tp as f64 / p_denom as f64;
            let recall = tp as f64 / r_denom as f64;
            if precision + recall == 0.0 {
                0.0
            } else {
                2.0 * precision * recall / (precision + recall)
            }
        })
        .sum();
    sum / counts.len() as f64
}

/// Mean squared error over all output components of all samples.
pub fn mse(predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for (p, t) in predictions.iter().zip(targets.iter()) {
        for (a, b) in p.iter().zip(t.iter()) {
            sum += (a - b).powi(2);
            n += 1;
        }
    }
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Root mean squared error: √MSE.
pub fn rmse(predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
    mse(predictions, targets).sqrt()
}

/// Mean absolute error over all output components of all samples.
pub fn mae(predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> f64 {
    let mut sum = 0.0;
    let mut n = 0usize;
    for (p, t) in predictions.iter().zip(targets.iter()) {
        for (a, b) in p.iter().zip(t.iter()) {
            sum += (a - b).abs();
            n += 1;
        }
    }
    if n == 0 { 0.0 } else { sum / n as f64 }
}

/// Coefficient of determination, pooled over all output components:
/// `R² = 1 − SS_res / SS_tot`.
///
/// Errors with `DegenerateMetric` when the targets have zero variance
/// (SS_tot = 0) — R² is undefined there and must never come back as NaN.
pub fn r_squared(predictions: &[Vec<f64>], targets: &[Vec<f64>]) -> Result<f64, TrainError> {
    let flat_targets: Vec<f64> = targets.iter().flat_map(|t| t.iter().copied()).collect();
    if flat_targets.is_empty() {
        return Err(TrainError::DegenerateMetric { what: "R²" });
    }
    let mean = flat_targets.iter().sum::<f64>() / flat_targets.len() as f64;
    let ss_tot: f64 = flat_targets.iter().map(|y| (y - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return Err(TrainError::DegenerateMetric { what: "R²" });
    }
    let ss_res: f64 = predictions.iter().zip(targets.iter())
        .flat_map(|(p, t)| p.iter().zip(t.iter()))
        .map(|(a, b)| (a - b).powi(2))
        .sum();
    Ok(1.0 - ss_res / ss_tot)
}
