pub mod mse;
pub mod cross_entropy;
pub mod bce;
pub mod mae;
pub mod huber;

pub use mse::Mse;
pub use cross_entropy::CrossEntropy;
pub use bce::Bce;
pub use mae::Mae;
pub use huber::Huber;

/// A differentiable loss: maps (prediction, target) to a scalar, and knows
/// its own gradient with respect to the prediction.
pub trait Loss {
    /// Scalar loss for one sample.
    fn loss(&self, predicted: &[f64], target: &[f64]) -> f64;

    /// ∂L/∂prediction for one sample, same length as `predicted`.
    fn gradient(&self, predicted: &[f64], target: &[f64]) -> Vec<f64>;
}
