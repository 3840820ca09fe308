use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::error::TrainError;
use crate::loss::Loss;
use crate::optim::{Optimizer, ScheduleCadence, Scheduler};

/// Which kind of supervised task the driver is running.
///
/// A closed two-case set: per-epoch and evaluation metrics are computed by
/// matching on this, never by inspecting strings at runtime.  The textual
/// names the tabular front door accepts (`"classification"` /
/// `"regression"`) go through `FromStr`, where an unknown name is a usage
/// error surfaced before any training.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Classification,
    Regression,
}

impl FromStr for TaskKind {
    type Err = TrainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "classification" => Ok(TaskKind::Classification),
            "regression" => Ok(TaskKind::Regression),
            other => Err(TrainError::UnknownTask(other.to_string())),
        }
    }
}

/// Everything `compile` fixes for the lifetime of the driver.
///
/// Immutable after `compile`: the driver only ever reads it.  The loss and
/// optimizer are mandatory; the scheduler and gradient clip are opt-in via
/// the builder methods.
///
/// ```no_run
/// # use kiln_nn::driver::{CompileConfig, TaskKind};
/// # use kiln_nn::loss::Mse;
/// # use kiln_nn::optim::{Sgd, StepLr, ScheduleCadence};
/// let config = CompileConfig::new(TaskKind::Regression, Mse, Sgd::new(0.01))
///     .with_scheduler(StepLr { initial_lr: 0.01, step_size: 100, gamma: 0.5 })
///     .with_cadence(ScheduleCadence::PerEpoch)
///     .with_gradient_clip(5.0);
/// ```
pub struct CompileConfig {
    pub(crate) task: TaskKind,
    pub(crate) loss: Box<dyn Loss>,
    pub(crate) optimizer: Box<dyn Optimizer>,
    pub(crate) scheduler: Option<Box<dyn Scheduler>>,
    pub(crate) cadence: ScheduleCadence,
    pub(crate) gradient_clip: Option<f64>,
}

impl CompileConfig {
    pub fn new(
        task: TaskKind,
        loss: impl Loss + 'static,
        optimizer: impl Optimizer + 'static,
    ) -> CompileConfig {
        CompileConfig {
            task,
            loss: Box::new(loss),
            optimizer: Box::new(optimizer),
            scheduler: None,
            cadence: ScheduleCadence::default(),
            gradient_clip: None,
        }
    }

    /// Attaches a learning-rate scheduler, advanced per the configured
    /// cadence (default: once per training batch).
    pub fn with_scheduler(mut self, scheduler: impl Scheduler + 'static) -> CompileConfig {
        self.scheduler = Some(Box::new(scheduler));
        self
    }

    pub fn with_cadence(mut self, cadence: ScheduleCadence) -> CompileConfig {
        self.cadence = cadence;
        self
    }

    /// Clips the global L2 gradient norm to `max_norm` before every
    /// optimizer step.
    pub fn with_gradient_clip(mut self, max_norm: f64) -> CompileConfig {
        self.gradient_clip = Some(max_norm);
        self
    }

    pub fn task(&self) -> TaskKind {
        self.task
    }
}
