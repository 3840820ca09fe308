use crate::loss::Loss;

/// Binary cross-entropy.  Pair with a Sigmoid output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bce;

const EPS: f64 = 1e-12;

impl Loss for Bce {
    /// Scalar BCE: -mean(y·log(p+ε) + (1-y)·log(1-p+ε))
    fn loss(&self, predicted: &[f64], target: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(target.iter())
            .map(|(p, y)| -(y * (p + EPS).ln() + (1.0 - y) * (1.0 - p + EPS).ln()))
            .sum::<f64>() / n
    }

    /// Per-output gradient: (p - y) / ((p + ε) · (1 - p + ε))
    fn gradient(&self, predicted: &[f64], target: &[f64]) -> Vec<f64> {
        predicted.iter().zip(target.iter())
            .map(|(p, y)| (p - y) / ((p + EPS) * (1.0 - p + EPS)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn penalizes_confident_wrong_answers() {
        let good = Bce.loss(&[0.9], &[1.0]);
        let bad = Bce.loss(&[0.1], &[1.0]);
        assert!(bad > good);
    }
}
