use crate::activation::activation::ActivationFunction;
use crate::model::network::Network;

/// Builds the layer tuple list for `Network::new` from an input dimension,
/// hidden sizes, an output size, and the output activation.
fn stack(
    input_dim: usize,
    hidden: &[usize],
    output_dim: usize,
    hidden_act: ActivationFunction,
    output_act: ActivationFunction,
) -> Network {
    let mut specs = Vec::with_capacity(hidden.len() + 1);
    let mut prev = input_dim;
    for &size in hidden {
        specs.push((size, prev, hidden_act));
        prev = size;
    }
    specs.push((output_dim, prev, output_act));
    Network::new(specs)
}

/// Canned image classifier: flattened `width × height` grayscale input,
/// ReLU hidden layers, softmax over `n_classes`.
///
/// Pair with `CrossEntropy` and feed it inputs produced by
/// `data::image_bytes_to_grayscale_input` with the same dimensions.
pub fn image_classifier(width: u32, height: u32, hidden: &[usize], n_classes: usize) -> Network {
    stack(
        (width * height) as usize,
        hidden,
        n_classes,
        ActivationFunction::ReLU,
        ActivationFunction::Softmax,
    )
}

/// Canned tabular classifier: `n_features` inputs, ReLU hidden layers,
/// softmax over `n_classes`.  Targets are one-hot vectors.
pub fn tabular_classifier(n_features: usize, hidden: &[usize], n_classes: usize) -> Network {
    stack(
        n_features,
        hidden,
        n_classes,
        ActivationFunction::ReLU,
        ActivationFunction::Softmax,
    )
}

/// Canned tabular regressor: `n_features` inputs, ReLU hidden layers,
/// identity output over `n_outputs` targets.  Pair with `Mse` (or `Mae` /
/// `Huber`).
pub fn tabular_regressor(n_features: usize, hidden: &[usize], n_outputs: usize) -> Network {
    stack(
        n_features,
        hidden,
        n_outputs,
        ActivationFunction::ReLU,
        ActivationFunction::Identity,
    )
}
