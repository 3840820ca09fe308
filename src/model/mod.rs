pub mod contract;
pub mod network;
pub mod presets;

pub use contract::Model;
pub use network::Network;
pub use presets::{image_classifier, tabular_classifier, tabular_regressor};
