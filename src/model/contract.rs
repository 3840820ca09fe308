use crate::math::matrix::Matrix;

/// The driver-side view of a trainable computation graph.
///
/// The epoch driver accepts *any* implementor — there is no base network
/// type to inherit from.  A model owns its parameters, knows how to run a
/// forward evaluation, how to accumulate gradients from a loss gradient, and
/// how to expose its parameters for the optimizer and for gradient clipping.
pub trait Model {
    /// Number of scalar inputs one sample must provide.
    fn input_dim(&self) -> usize;

    /// Number of scalar outputs one forward evaluation produces.
    fn output_dim(&self) -> usize;

    /// Switches between training mode (forward passes cache the activations
    /// the backward pass needs) and evaluation mode (no bookkeeping, no
    /// gradient tracking).
    fn set_training(&mut self, training: bool);

    fn is_training(&self) -> bool;

    /// Forward evaluation of one sample.
    fn forward(&mut self, input: &[f64]) -> Vec<f64>;

    /// Backward pass for the sample last seen by a training-mode `forward`.
    /// `loss_grad` is ∂L/∂output.  Gradients are *accumulated* into the
    /// model's buffers, not overwritten.
    fn backward(&mut self, input: &[f64], loss_grad: &[f64]);

    /// Visits every (parameter, accumulated gradient) pair in a stable
    /// order.  Optimizers key their per-parameter state on that order;
    /// gradient clipping makes two passes over it.
    fn visit_parameters(&mut self, f: &mut dyn FnMut(&mut Matrix, &mut Matrix));

    /// Zeroes all accumulated gradients.
    fn zero_gradients(&mut self) {
        self.visit_parameters(&mut |_, grad| grad.zero_in_place());
    }
}
