pub mod math;
pub mod activation;
pub mod layers;
pub mod model;
pub mod loss;
pub mod optim;
pub mod data;
pub mod driver;
pub mod plot;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::activation::ActivationFunction;
pub use layers::dense::Layer;
pub use model::{image_classifier, tabular_classifier, tabular_regressor, Model, Network};
pub use loss::{Bce, CrossEntropy, Huber, Loss, Mae, Mse};
pub use optim::{Adam, ConstantLr, CosineAnnealingLr, Optimizer, ScheduleCadence, Scheduler, Sgd, StepLr};
pub use data::{Batch, DataStream, MemoryStream};
pub use driver::{CompileConfig, Driver, Evaluation, History, MetricsReport, TaskKind};
pub use error::TrainError;
