pub mod driver;
pub mod config;
pub mod history;
pub mod metrics;
pub mod clip;

pub use driver::Driver;
pub use config::{CompileConfig, TaskKind};
pub use history::{EpochRecord, History};
pub use metrics::{ClassificationMetrics, Evaluation, MetricsReport, RegressionMetrics};
pub use clip::clip_gradient_norm;
