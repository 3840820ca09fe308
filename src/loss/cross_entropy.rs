use crate::loss::Loss;

/// Categorical cross-entropy for use with a Softmax output layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct CrossEntropy;

/// Small epsilon added inside log() to prevent log(0) = -inf.
const EPS: f64 = 1e-12;

impl Loss for CrossEntropy {
    /// Computes the scalar cross-entropy loss:
    ///   L = -sum(target[i] * log(predicted[i] + eps))
    ///
    /// `predicted` — softmax probabilities, shape [n_classes]
    /// `target`    — one-hot (or soft) target distribution, shape [n_classes]
    fn loss(&self, predicted: &[f64], target: &[f64]) -> f64 {
        predicted.iter().zip(target.iter())
            .map(|(p, e)| -e * (p + EPS).ln())
            .sum()
    }

    /// Gradient of the combined Softmax + cross-entropy w.r.t. the
    /// pre-softmax logits:
    ///   ∂L/∂z_i = predicted[i] - target[i]   (element-wise)
    ///
    /// The Softmax activation's own derivative step is identity (1.0) so the
    /// combined gradient is not double-applied during backpropagation.
    fn gradient(&self, predicted: &[f64], target: &[f64]) -> Vec<f64> {
        predicted.iter().zip(target.iter())
            .map(|(p, e)| p - e)
            .collect()
    }
}
