use crate::loss::Loss;

/// Mean absolute error.  Pair with an Identity output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mae;

impl Loss for Mae {
    /// Scalar MAE: mean(|predicted - target|)
    fn loss(&self, predicted: &[f64], target: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(target.iter())
            .map(|(p, y)| (p - y).abs())
            .sum::<f64>() / n
    }

    /// Per-output subgradient: sign(p - y) / n  (0 when equal)
    fn gradient(&self, predicted: &[f64], target: &[f64]) -> Vec<f64> {
        let n = predicted.len() as f64;
        predicted.iter().zip(target.iter())
            .map(|(p, y)| {
                let diff = p - y;
                if diff > 0.0 { 1.0 / n } else if diff < 0.0 { -1.0 / n } else { 0.0 }
            })
            .collect()
    }
}
