use serde::{Serialize, Deserialize};
use crate::math::matrix::Matrix;
use crate::activation::activation::{softmax, ActivationFunction};

/// A fully-connected layer with persistent gradient buffers.
///
/// The forward pass caches pre- and post-activation values only while the
/// owning network is in training mode; the backward pass consumes those
/// caches and *accumulates* into `weight_grad` / `bias_grad` rather than
/// overwriting them, so a mini-batch can sum per-sample gradients before the
/// optimizer step (and gradient clipping can inspect the summed buffers).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub size: usize,
    pub weights: Matrix,
    pub biases: Matrix,
    pub activator: ActivationFunction,
    /// Post-activation values from the last training-mode forward pass.
    #[serde(skip, default)]
    pub(crate) neurons: Matrix,
    /// Pre-activation values (z = xW + b) needed for the activation derivative.
    #[serde(skip, default)]
    pre_neurons: Matrix,
    #[serde(skip, default)]
    pub(crate) weight_grad: Matrix,
    #[serde(skip, default)]
    pub(crate) bias_grad: Matrix,
}

impl Layer {
    pub fn new(size: usize, input_size: usize, activation: ActivationFunction) -> Layer {
        // He before ReLU, Xavier otherwise.
        let weights = match activation {
            ActivationFunction::ReLU => Matrix::he(input_size, size),
            _ => Matrix::xavier(input_size, size),
        };

        Layer {
            size,
            weights,
            biases: Matrix::zeros(1, size),
            activator: activation,
            neurons: Matrix::zeros(1, size),
            pre_neurons: Matrix::zeros(1, size),
            weight_grad: Matrix::zeros(input_size, size),
            bias_grad: Matrix::zeros(1, size),
        }
    }

    /// Forward pass for one sample.  `cache` is true in training mode, where
    /// the backward pass will need the pre-activations and activations.
    pub fn feed_from(&mut self, input: &[f64], cache: bool) -> Vec<f64> {
        let z = Matrix::from_data(vec![input.to_vec()]) * self.weights.clone() + self.biases.clone();
        let a = match self.activator {
            ActivationFunction::Softmax => Matrix::from_data(vec![softmax(&z.data[0])]),
            _ => z.map(|x| self.activator.function(x)),
        };
        if cache {
            self.pre_neurons = z;
            self.neurons = a.clone();
        }
        a.data[0].clone()
    }

    /// Backward pass for one sample.  `delta` is ∂L/∂a for this layer (error
    /// in activation space), `inputs` the layer's input row from the cached
    /// forward pass.  Accumulates into the gradient buffers and returns
    /// ∂L/∂a for the previous layer.
    pub fn accumulate_gradients(&mut self, delta: &Matrix, inputs: &Matrix) -> Matrix {
        // Use pre-activation z so that derivative(z) = σ'(z) is computed correctly.
        let act_derivative = self.pre_neurons.map(|x| self.activator.derivative(x));
        // Element-wise (Hadamard) product: δ = error ⊙ σ'(z)
        let layer_delta = hadamard(delta, &act_derivative);

        self.ensure_grad_shape();
        self.weight_grad.add_in_place(&(inputs.transpose() * layer_delta.clone()));
        self.bias_grad.add_in_place(&layer_delta);

        // Propagate δ through the weights to get ∂L/∂a_{prev}.
        layer_delta * self.weights.transpose()
    }

    /// Scales both gradient buffers, e.g. by 1/batch_size to average a
    /// mini-batch, or by a clipping factor.
    pub fn scale_gradients(&mut self, factor: f64) {
        self.weight_grad.scale_in_place(factor);
        self.bias_grad.scale_in_place(factor);
    }

    /// Zeroes both gradient buffers.
    pub fn zero_grad(&mut self) {
        self.ensure_grad_shape();
        self.weight_grad.zero_in_place();
        self.bias_grad.zero_in_place();
    }

    /// Sum of squared gradient elements across both buffers.
    pub fn grad_sq_sum(&self) -> f64 {
        self.weight_grad.sq_sum() + self.bias_grad.sq_sum()
    }

    // Deserialized layers come back with empty (0x0) gradient buffers; size
    // them against the weights on first use.
    pub(crate) fn ensure_grad_shape(&mut self) {
        if self.weight_grad.rows != self.weights.rows || self.weight_grad.cols != self.weights.cols {
            self.weight_grad = Matrix::zeros(self.weights.rows, self.weights.cols);
        }
        if self.bias_grad.rows != self.biases.rows || self.bias_grad.cols != self.biases.cols {
            self.bias_grad = Matrix::zeros(self.biases.rows, self.biases.cols);
        }
    }
}

/// Element-wise (Hadamard) product of two same-shape matrices.
fn hadamard(a: &Matrix, b: &Matrix) -> Matrix {
    assert_eq!(a.rows, b.rows);
    assert_eq!(a.cols, b.cols);
    let data = a.data.iter().zip(b.data.iter())
        .map(|(row_a, row_b)| {
            row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect()
        })
        .collect();
    Matrix::from_data(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity_layer() -> Layer {
        let mut layer = Layer::new(2, 2, ActivationFunction::Identity);
        layer.weights = Matrix::from_data(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        layer.biases = Matrix::zeros(1, 2);
        layer
    }

    #[test]
    fn identity_forward_passes_input_through() {
        let mut layer = identity_layer();
        let out = layer.feed_from(&[3.0, -1.5], false);
        assert_eq!(out, vec![3.0, -1.5]);
    }

    #[test]
    fn gradients_accumulate_across_samples() {
        let mut layer = identity_layer();
        let input = Matrix::from_data(vec![vec![1.0, 2.0]]);
        let delta = Matrix::from_data(vec![vec![1.0, 1.0]]);

        layer.feed_from(&[1.0, 2.0], true);
        layer.accumulate_gradients(&delta, &input);
        layer.feed_from(&[1.0, 2.0], true);
        layer.accumulate_gradients(&delta, &input);

        // d/dW = xᵀδ accumulated twice.
        assert_eq!(layer.weight_grad.data[0], vec![2.0, 2.0]);
        assert_eq!(layer.weight_grad.data[1], vec![4.0, 4.0]);
        assert_eq!(layer.bias_grad.data[0], vec![2.0, 2.0]);

        layer.zero_grad();
        assert_eq!(layer.grad_sq_sum(), 0.0);
    }

    #[test]
    fn softmax_layer_outputs_distribution() {
        let mut layer = Layer::new(3, 2, ActivationFunction::Softmax);
        let out = layer.feed_from(&[0.2, -0.4], false);
        let sum: f64 = out.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(out.iter().all(|&p| p > 0.0));
    }
}
