use serde::{Serialize, Deserialize};
use crate::activation::activation::ActivationFunction;
use crate::layers::dense::Layer;
use crate::math::matrix::Matrix;
use crate::model::contract::Model;

/// A plain feed-forward network of dense layers.
///
/// This is the concrete `Model` the canned presets build; the driver itself
/// only ever sees the `Model` trait.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Network {
    pub layers: Vec<Layer>,
    #[serde(skip, default)]
    training: bool,
}

impl Network {
    /// Builds a network from (size, input_size, activation) tuples.
    pub fn new(layer_specs: Vec<(usize, usize, ActivationFunction)>) -> Network {
        let layers = layer_specs.into_iter()
            .map(|(size, input_size, activation)| Layer::new(size, input_size, activation))
            .collect();
        Network { layers, training: false }
    }

    /// Serializes the network weights to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a network from a JSON file previously written by `save_json`.
    pub fn load_json(path: &str) -> std::io::Result<Network> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }
}

impl Model for Network {
    fn input_dim(&self) -> usize {
        self.layers.first().map(|l| l.weights.rows).unwrap_or(0)
    }

    fn output_dim(&self) -> usize {
        self.layers.last().map(|l| l.size).unwrap_or(0)
    }

    fn set_training(&mut self, training: bool) {
        self.training = training;
    }

    fn is_training(&self) -> bool {
        self.training
    }

    fn forward(&mut self, input: &[f64]) -> Vec<f64> {
        let cache = self.training;
        let mut current = input.to_vec();
        for layer in &mut self.layers {
            current = layer.feed_from(&current, cache);
        }
        current
    }

    fn backward(&mut self, input: &[f64], loss_grad: &[f64]) {
        let mut delta = Matrix::from_data(vec![loss_grad.to_vec()]);

        for i in (0..self.layers.len()).rev() {
            let input_for_layer = if i == 0 {
                Matrix::from_data(vec![input.to_vec()])
            } else {
                self.layers[i - 1].neurons.clone()
            };

            delta = self.layers[i].accumulate_gradients(&delta, &input_for_layer);
        }
    }

    fn visit_parameters(&mut self, f: &mut dyn FnMut(&mut Matrix, &mut Matrix)) {
        for layer in &mut self.layers {
            layer.ensure_grad_shape();
            f(&mut layer.weights, &mut layer.weight_grad);
            f(&mut layer.biases, &mut layer.bias_grad);
        }
    }
}
