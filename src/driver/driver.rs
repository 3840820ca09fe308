use log::debug;

use crate::data::{Batch, DataStream};
use crate::driver::clip::clip_gradient_norm;
use crate::driver::config::{CompileConfig, TaskKind};
use crate::driver::history::{EpochRecord, History};
use crate::driver::metrics::{
    self, ClassificationMetrics, Evaluation, MetricsReport, RegressionMetrics,
};
use crate::error::TrainError;
use crate::model::Model;
use crate::optim::ScheduleCadence;

/// The epoch driver: Keras-style `compile`/`fit`/`predict`/`evaluate`/
/// `metrics` over any `Model` implementor.
///
/// State machine: uncompiled → compiled (one-way, via `compile`); every
/// other operation is a usage error until then.  The driver owns the model
/// and mutates its parameters only inside `fit`; `predict`, `evaluate` and
/// `metrics` run forward-only passes in evaluation mode.
pub struct Driver<M: Model> {
    model: M,
    config: Option<CompileConfig>,
    /// Completed optimizer steps; the per-batch scheduler index.
    batch_steps: usize,
    /// Completed epochs across all `fit` calls; the per-epoch scheduler index.
    epoch_steps: usize,
}

impl<M: Model> Driver<M> {
    pub fn new(model: M) -> Driver<M> {
        Driver {
            model,
            config: None,
            batch_steps: 0,
            epoch_steps: 0,
        }
    }

    /// Stores the training configuration.  Must be called exactly once:
    /// the second call is an error, and the config is never mutated after.
    pub fn compile(&mut self, config: CompileConfig) -> Result<(), TrainError> {
        if self.config.is_some() {
            return Err(TrainError::AlreadyCompiled);
        }
        self.config = Some(config);
        Ok(())
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut M {
        &mut self.model
    }

    pub fn into_model(self) -> M {
        self.model
    }

    /// Runs `epochs` sequential passes over `train`, updating parameters
    /// every batch, and returns one `EpochRecord` per epoch.
    ///
    /// Per batch: forward → loss → backward (accumulate, averaged over the
    /// batch) → optional global-norm gradient clip → optimizer step →
    /// scheduler advance (per-batch cadence) → zero gradients.  The learning
    /// rate used for step `k` is `scheduler.lr(k)` (0-based; per-epoch
    /// cadence indexes by completed epochs instead).
    ///
    /// With a validation stream, each epoch ends with a forward-only pass in
    /// evaluation mode accumulating the same statistics.
    ///
    /// Any failure — shape mismatch, empty stream, degenerate epoch R² —
    /// aborts immediately and discards the partial history.
    pub fn fit(
        &mut self,
        epochs: usize,
        train: &mut dyn DataStream,
        mut val: Option<&mut dyn DataStream>,
    ) -> Result<History, TrainError> {
        if self.config.is_none() {
            return Err(TrainError::NotCompiled { op: "fit" });
        }

        let mut history = History::default();

        for epoch in 1..=epochs {
            let config = self.config.as_mut().unwrap();

            if config.cadence == ScheduleCadence::PerEpoch {
                if let Some(scheduler) = &config.scheduler {
                    config.optimizer.set_learning_rate(scheduler.lr(self.epoch_steps));
                }
            }

            self.model.set_training(true);
            train.reset();

            let mut stats = PassStats::new(config.task);
            while let Some(batch) = train.next_batch() {
                train_one_batch(
                    &mut self.model,
                    config,
                    &batch,
                    &mut self.batch_steps,
                    &mut stats,
                )?;
            }
            if stats.samples == 0 {
                return Err(TrainError::EmptyStream { op: "fit" });
            }
            self.epoch_steps += 1;

            let train_loss = stats.mean_loss();
            let train_metric = stats.epoch_metric()?;

            let (val_loss, val_metric) = match val.as_deref_mut() {
                Some(stream) => {
                    let vstats = eval_pass(&mut self.model, config, stream, "fit")?;
                    (Some(vstats.mean_loss()), Some(vstats.epoch_metric()?))
                }
                None => (None, None),
            };

            match (val_loss, val_metric) {
                (Some(vl), Some(vm)) => debug!(
                    "epoch {epoch}/{epochs}: train_loss={train_loss:.6} \
                     train_metric={train_metric:.4} val_loss={vl:.6} val_metric={vm:.4}"
                ),
                _ => debug!(
                    "epoch {epoch}/{epochs}: train_loss={train_loss:.6} \
                     train_metric={train_metric:.4}"
                ),
            }

            history.epochs.push(EpochRecord {
                epoch,
                train_loss,
                val_loss,
                train_metric,
                val_metric,
            });
        }

        Ok(history)
    }

    /// Forward passes over every batch in evaluation mode; predictions come
    /// back concatenated in exact input order.  No state is mutated beyond
    /// the model's mode flag.
    pub fn predict(&mut self, stream: &mut dyn DataStream) -> Result<Vec<Vec<f64>>, TrainError> {
        if self.config.is_none() {
            return Err(TrainError::NotCompiled { op: "predict" });
        }

        self.model.set_training(false);
        stream.reset();

        let mut outputs = Vec::new();
        while let Some(batch) = stream.next_batch() {
            for input in &batch.inputs {
                if input.len() != self.model.input_dim() {
                    return Err(TrainError::ShapeMismatch {
                        what: "batch input",
                        got: input.len(),
                        expected: self.model.input_dim(),
                    });
                }
                outputs.push(self.model.forward(input));
            }
        }
        if outputs.is_empty() {
            return Err(TrainError::EmptyStream { op: "predict" });
        }
        Ok(outputs)
    }

    /// One forward-only pass over the stream, returning the mean loss plus
    /// the task's headline metric (accuracy / MSE).
    pub fn evaluate(&mut self, stream: &mut dyn DataStream) -> Result<Evaluation, TrainError> {
        let config = self.config.as_ref().ok_or(TrainError::NotCompiled { op: "evaluate" })?;
        let stats = eval_pass(&mut self.model, config, stream, "evaluate")?;

        Ok(match config.task {
            TaskKind::Classification => Evaluation::Classification {
                loss: stats.mean_loss(),
                accuracy: stats.eval_metric(),
            },
            TaskKind::Regression => Evaluation::Regression {
                loss: stats.mean_loss(),
                mse: stats.eval_metric(),
            },
        })
    }

    /// Full metric suite over one forward-only pass: accuracy + macro
    /// precision + macro F1 for classification; MSE, RMSE, MAE, R² for
    /// regression.  R² over zero-variance targets is an explicit error.
    pub fn metrics(&mut self, stream: &mut dyn DataStream) -> Result<MetricsReport, TrainError> {
        let config = self.config.as_ref().ok_or(TrainError::NotCompiled { op: "metrics" })?;

        self.model.set_training(false);
        stream.reset();

        let mut predictions: Vec<Vec<f64>> = Vec::new();
        let mut targets: Vec<Vec<f64>> = Vec::new();
        while let Some(batch) = stream.next_batch() {
            validate_batch(&self.model, &batch)?;
            for (input, target) in batch.inputs.iter().zip(batch.targets.iter()) {
                predictions.push(self.model.forward(input));
                targets.push(target.clone());
            }
        }
        if predictions.is_empty() {
            return Err(TrainError::EmptyStream { op: "metrics" });
        }

        Ok(match config.task {
            TaskKind::Classification => MetricsReport::Classification(ClassificationMetrics {
                accuracy: metrics::accuracy(&predictions, &targets),
                precision: metrics::macro_precision(&predictions, &targets),
                f1: metrics::macro_f1(&predictions, &targets),
            }),
            TaskKind::Regression => {
                let mse = metrics::mse(&predictions, &targets);
                MetricsReport::Regression(RegressionMetrics {
                    mse,
                    rmse: mse.sqrt(),
                    mae: metrics::mae(&predictions, &targets),
                    r2: metrics::r_squared(&predictions, &targets)?,
                })
            }
        })
    }
}

/// Forward/backward/step for one mini-batch.  Free function so the caller
/// can hold disjoint borrows of the driver's model and config.
fn train_one_batch<M: Model>(
    model: &mut M,
    config: &mut CompileConfig,
    batch: &Batch,
    batch_steps: &mut usize,
    stats: &mut PassStats,
) -> Result<(), TrainError> {
    if batch.is_empty() {
        return Ok(());
    }
    validate_batch(model, batch)?;

    for (input, target) in batch.inputs.iter().zip(batch.targets.iter()) {
        let output = model.forward(input);
        stats.record(config.loss.loss(&output, target), &output, target);
        let grad = config.loss.gradient(&output, target);
        model.backward(input, &grad);
    }

    // Average the accumulated gradients over the mini-batch.
    let inv_batch = 1.0 / batch.len() as f64;
    model.visit_parameters(&mut |_, grad| grad.scale_in_place(inv_batch));

    if let Some(max_norm) = config.gradient_clip {
        clip_gradient_norm(model, max_norm);
    }

    if config.cadence == ScheduleCadence::PerBatch {
        if let Some(scheduler) = &config.scheduler {
            config.optimizer.set_learning_rate(scheduler.lr(*batch_steps));
        }
    }

    config.optimizer.begin_step();
    let optimizer = &mut config.optimizer;
    let mut slot = 0usize;
    model.visit_parameters(&mut |value, grad| {
        optimizer.update(slot, value, grad);
        slot += 1;
    });
    *batch_steps += 1;

    model.zero_gradients();
    Ok(())
}

/// Forward-only pass over a whole stream in evaluation mode.
fn eval_pass<M: Model>(
    model: &mut M,
    config: &CompileConfig,
    stream: &mut dyn DataStream,
    op: &'static str,
) -> Result<PassStats, TrainError> {
    model.set_training(false);
    stream.reset();

    let mut stats = PassStats::new(config.task);
    while let Some(batch) = stream.next_batch() {
        validate_batch(model, &batch)?;
        for (input, target) in batch.inputs.iter().zip(batch.targets.iter()) {
            let output = model.forward(input);
            stats.record(config.loss.loss(&output, target), &output, target);
        }
    }
    if stats.samples == 0 {
        return Err(TrainError::EmptyStream { op });
    }
    Ok(stats)
}

fn validate_batch<M: Model>(model: &M, batch: &Batch) -> Result<(), TrainError> {
    for input in &batch.inputs {
        if input.len() != model.input_dim() {
            return Err(TrainError::ShapeMismatch {
                what: "batch input",
                got: input.len(),
                expected: model.input_dim(),
            });
        }
    }
    for target in &batch.targets {
        if target.len() != model.output_dim() {
            return Err(TrainError::ShapeMismatch {
                what: "batch target",
                got: target.len(),
                expected: model.output_dim(),
            });
        }
    }
    Ok(())
}

/// Running statistics over one pass of a stream.
///
/// Classification keeps a running correct-prediction count; regression
/// keeps the prediction/target pairs so R² can be computed at pass end.
struct PassStats {
    loss_sum: f64,
    samples: usize,
    running: RunningStats,
}

enum RunningStats {
    Classification { correct: usize },
    Regression { predictions: Vec<Vec<f64>>, targets: Vec<Vec<f64>> },
}

impl PassStats {
    fn new(task: TaskKind) -> PassStats {
        let running = match task {
            TaskKind::Classification => RunningStats::Classification { correct: 0 },
            TaskKind::Regression => RunningStats::Regression {
                predictions: Vec::new(),
                targets: Vec::new(),
            },
        };
        PassStats { loss_sum: 0.0, samples: 0, running }
    }

    fn record(&mut self, loss: f64, output: &[f64], target: &[f64]) {
        self.loss_sum += loss;
        self.samples += 1;
        match &mut self.running {
            RunningStats::Classification { correct } => {
                if metrics::argmax(output) == metrics::argmax(target) {
                    *correct += 1;
                }
            }
            RunningStats::Regression { predictions, targets } => {
                predictions.push(output.to_vec());
                targets.push(target.to_vec());
            }
        }
    }

    fn mean_loss(&self) -> f64 {
        self.loss_sum / self.samples.max(1) as f64
    }

    /// The per-epoch History metric: accuracy or R².
    fn epoch_metric(&self) -> Result<f64, TrainError> {
        match &self.running {
            RunningStats::Classification { correct } => {
                Ok(*correct as f64 / self.samples.max(1) as f64)
            }
            RunningStats::Regression { predictions, targets } => {
                metrics::r_squared(predictions, targets)
            }
        }
    }

    /// The `evaluate` metric: accuracy or MSE.
    fn eval_metric(&self) -> f64 {
        match &self.running {
            RunningStats::Classification { correct } => {
                *correct as f64 / self.samples.max(1) as f64
            }
            RunningStats::Regression { predictions, targets } => {
                metrics::mse(predictions, targets)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::data::MemoryStream;
    use crate::loss::{CrossEntropy, Mse};
    use crate::math::matrix::Matrix;
    use crate::model::Network;
    use crate::optim::{Sgd, StepLr};

    /// 1-input, 1-output identity model: predicts `w·x + b` with w=1, b=0.
    fn identity_model() -> Network {
        let mut net = Network::new(vec![(1, 1, ActivationFunction::Identity)]);
        net.layers[0].weights = Matrix::from_data(vec![vec![1.0]]);
        net.layers[0].biases = Matrix::zeros(1, 1);
        net
    }

    /// Deterministic 2-feature, 2-class softmax model.
    fn two_class_model() -> Network {
        let mut net = Network::new(vec![(2, 2, ActivationFunction::Softmax)]);
        net.layers[0].weights = Matrix::from_data(vec![vec![1.0, -1.0], vec![-1.0, 1.0]]);
        net.layers[0].biases = Matrix::zeros(1, 2);
        net
    }

    fn two_class_dataset() -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let inputs = vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.8, 0.2],
            vec![0.1, 0.9],
        ];
        let targets = vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
        ];
        (inputs, targets)
    }

    fn regression_config() -> CompileConfig {
        CompileConfig::new(TaskKind::Regression, Mse, Sgd::new(0.01))
    }

    #[test]
    fn every_operation_before_compile_is_a_usage_error() {
        let (inputs, targets) = two_class_dataset();
        let mut stream = MemoryStream::new(inputs, targets, 2).unwrap();
        let mut driver = Driver::new(two_class_model());

        assert!(matches!(
            driver.fit(1, &mut stream, None),
            Err(TrainError::NotCompiled { op: "fit" })
        ));
        assert!(matches!(
            driver.predict(&mut stream),
            Err(TrainError::NotCompiled { op: "predict" })
        ));
        assert!(matches!(
            driver.evaluate(&mut stream),
            Err(TrainError::NotCompiled { op: "evaluate" })
        ));
        assert!(matches!(
            driver.metrics(&mut stream),
            Err(TrainError::NotCompiled { op: "metrics" })
        ));
    }

    #[test]
    fn compile_is_one_way_and_single_shot() {
        let mut driver = Driver::new(identity_model());
        driver.compile(regression_config()).unwrap();
        assert!(matches!(
            driver.compile(regression_config()),
            Err(TrainError::AlreadyCompiled)
        ));
    }

    #[test]
    fn history_length_equals_requested_epochs() {
        let inputs = vec![vec![0.0], vec![1.0], vec![2.0]];
        let targets = vec![vec![0.5], vec![1.5], vec![2.5]];
        let mut stream = MemoryStream::new(inputs, targets, 2).unwrap();

        let mut driver = Driver::new(identity_model());
        driver.compile(regression_config()).unwrap();

        let history = driver.fit(0, &mut stream, None).unwrap();
        assert_eq!(history.len(), 0);

        let history = driver.fit(3, &mut stream, None).unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history.epochs[0].epoch, 1);
        assert_eq!(history.epochs[2].epoch, 3);
    }

    #[test]
    fn classification_end_to_end_single_epoch() {
        let (inputs, targets) = two_class_dataset();
        let mut train = MemoryStream::new(inputs, targets, 2).unwrap();

        let mut driver = Driver::new(two_class_model());
        driver
            .compile(CompileConfig::new(
                TaskKind::Classification,
                CrossEntropy,
                Sgd::new(0.1),
            ))
            .unwrap();

        let history = driver.fit(1, &mut train, None).unwrap();
        assert_eq!(history.len(), 1);
        let record = &history.epochs[0];
        assert!(record.train_loss.is_finite());
        assert!(record.train_loss >= 0.0);
        assert!((0.0..=1.0).contains(&record.train_metric));
        assert!(record.val_loss.is_none());
    }

    #[test]
    fn validation_stream_fills_val_columns() {
        let (inputs, targets) = two_class_dataset();
        let mut train = MemoryStream::new(inputs.clone(), targets.clone(), 2).unwrap();
        let mut val = MemoryStream::new(inputs, targets, 4).unwrap();

        let mut driver = Driver::new(two_class_model());
        driver
            .compile(CompileConfig::new(
                TaskKind::Classification,
                CrossEntropy,
                Sgd::new(0.1),
            ))
            .unwrap();

        let history = driver.fit(2, &mut train, Some(&mut val)).unwrap();
        assert_eq!(history.len(), 2);
        for record in &history.epochs {
            assert!(record.val_loss.is_some());
            assert!(record.val_metric.is_some());
        }
    }

    #[test]
    fn predict_preserves_input_order() {
        let inputs = vec![vec![1.0], vec![2.0], vec![3.0], vec![4.0]];
        let targets = vec![vec![0.0]; 4];
        let mut stream = MemoryStream::new(inputs, targets, 3).unwrap();

        let mut driver = Driver::new(identity_model());
        driver.compile(regression_config()).unwrap();

        let predictions = driver.predict(&mut stream).unwrap();
        let flat: Vec<f64> = predictions.iter().map(|p| p[0]).collect();
        assert_eq!(flat, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn evaluate_and_metrics_leave_parameters_untouched() {
        let inputs = vec![vec![1.0], vec![2.0], vec![3.0]];
        let targets = vec![vec![1.5], vec![2.0], vec![2.5]];
        let mut stream = MemoryStream::new(inputs, targets, 2).unwrap();

        let mut driver = Driver::new(identity_model());
        driver.compile(regression_config()).unwrap();

        let before = serde_json::to_string(driver.model()).unwrap();
        driver.evaluate(&mut stream).unwrap();
        driver.metrics(&mut stream).unwrap();
        let after = serde_json::to_string(driver.model()).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn fit_mutates_parameters_in_place() {
        let inputs = vec![vec![1.0], vec![2.0]];
        let targets = vec![vec![5.0], vec![7.0]];
        let mut stream = MemoryStream::new(inputs, targets, 2).unwrap();

        let mut driver = Driver::new(identity_model());
        driver.compile(regression_config()).unwrap();

        let before = serde_json::to_string(driver.model()).unwrap();
        driver.fit(1, &mut stream, None).unwrap();
        let after = serde_json::to_string(driver.model()).unwrap();
        assert_ne!(before, after);
    }

    #[test]
    fn constant_target_regression_is_exact_but_r2_degenerate() {
        let inputs = vec![vec![1.0], vec![2.0], vec![3.0]];
        let targets = vec![vec![2.5]; 3];
        let mut stream = MemoryStream::new(inputs, targets, 3).unwrap();

        // w=0, b=2.5 predicts the constant exactly.
        let mut net = identity_model();
        net.layers[0].weights = Matrix::from_data(vec![vec![0.0]]);
        net.layers[0].biases = Matrix::from_data(vec![vec![2.5]]);

        let mut driver = Driver::new(net);
        driver.compile(regression_config()).unwrap();

        match driver.evaluate(&mut stream).unwrap() {
            Evaluation::Regression { loss, mse } => {
                assert_eq!(loss, 0.0);
                assert_eq!(mse, 0.0);
            }
            other => panic!("expected regression evaluation, got {:?}", other),
        }

        assert!(matches!(
            driver.metrics(&mut stream),
            Err(TrainError::DegenerateMetric { .. })
        ));
    }

    #[test]
    fn regression_metrics_report_is_consistent() {
        let inputs = vec![vec![1.0], vec![2.0], vec![3.0]];
        let targets = vec![vec![1.2], vec![1.8], vec![3.1]];
        let mut stream = MemoryStream::new(inputs, targets, 3).unwrap();

        let mut driver = Driver::new(identity_model());
        driver.compile(regression_config()).unwrap();

        match driver.metrics(&mut stream).unwrap() {
            MetricsReport::Regression(m) => {
                assert!((m.rmse - m.mse.sqrt()).abs() < 1e-12);
                assert!(m.mae >= 0.0);
                assert!(m.r2 <= 1.0);
            }
            other => panic!("expected regression metrics, got {:?}", other),
        }
    }

    #[test]
    fn shape_mismatch_is_surfaced_not_recovered() {
        let inputs = vec![vec![1.0, 2.0, 3.0]];
        let targets = vec![vec![0.0]];
        let mut stream = MemoryStream::new(inputs, targets, 1).unwrap();

        let mut driver = Driver::new(identity_model());
        driver.compile(regression_config()).unwrap();

        assert!(matches!(
            driver.fit(1, &mut stream, None),
            Err(TrainError::ShapeMismatch { what: "batch input", got: 3, expected: 1 })
        ));
    }

    #[test]
    fn empty_stream_is_an_error_everywhere() {
        let mut empty = MemoryStream::new(vec![], vec![], 1).unwrap();

        let mut driver = Driver::new(identity_model());
        driver.compile(regression_config()).unwrap();

        assert!(matches!(
            driver.fit(1, &mut empty, None),
            Err(TrainError::EmptyStream { op: "fit" })
        ));
        assert!(matches!(
            driver.predict(&mut empty),
            Err(TrainError::EmptyStream { op: "predict" })
        ));
        assert!(matches!(
            driver.evaluate(&mut empty),
            Err(TrainError::EmptyStream { op: "evaluate" })
        ));
        assert!(matches!(
            driver.metrics(&mut empty),
            Err(TrainError::EmptyStream { op: "metrics" })
        ));
    }

    #[test]
    fn per_batch_scheduler_advances_once_per_optimizer_step() {
        let inputs = vec![vec![1.0], vec![2.0]];
        let targets = vec![vec![1.0], vec![2.0]];
        // batch_size 1 → two optimizer steps per epoch.
        let mut stream = MemoryStream::new(inputs, targets, 1).unwrap();

        let mut driver = Driver::new(identity_model());
        driver
            .compile(
                CompileConfig::new(TaskKind::Regression, Mse, Sgd::new(1.0)).with_scheduler(
                    StepLr { initial_lr: 1.0, step_size: 1, gamma: 0.5 },
                ),
            )
            .unwrap();

        driver.fit(1, &mut stream, None).unwrap();
        // Step 0 used lr(0)=1.0, step 1 used lr(1)=0.5.
        assert_eq!(driver.batch_steps, 2);
        let lr = driver.config.as_ref().unwrap().optimizer.learning_rate();
        assert!((lr - 0.5).abs() < 1e-12);
    }

    #[test]
    fn per_epoch_scheduler_indexes_by_epoch() {
        let inputs = vec![vec![1.0], vec![2.0]];
        let targets = vec![vec![1.0], vec![2.0]];
        let mut stream = MemoryStream::new(inputs, targets, 1).unwrap();

        let mut driver = Driver::new(identity_model());
        driver
            .compile(
                CompileConfig::new(TaskKind::Regression, Mse, Sgd::new(1.0))
                    .with_scheduler(StepLr { initial_lr: 1.0, step_size: 1, gamma: 0.5 })
                    .with_cadence(ScheduleCadence::PerEpoch),
            )
            .unwrap();

        driver.fit(2, &mut stream, None).unwrap();
        // Epoch 1 ran at lr(0)=1.0, epoch 2 at lr(1)=0.5.
        assert_eq!(driver.epoch_steps, 2);
        let lr = driver.config.as_ref().unwrap().optimizer.learning_rate();
        assert!((lr - 0.5).abs() < 1e-12);
    }

    #[test]
    fn clipped_step_moves_parameters_by_at_most_lr_times_threshold() {
        // Large residuals → unclipped gradient far above the threshold.
        // Two distinct targets keep the epoch R² well-defined; batch_size 2
        // means a single clipped optimizer step.
        let inputs = vec![vec![10.0], vec![10.0]];
        let targets = vec![vec![-100.0], vec![100.0]];
        let mut stream = MemoryStream::new(inputs, targets, 2).unwrap();

        let mut driver = Driver::new(identity_model());
        driver
            .compile(
                CompileConfig::new(TaskKind::Regression, Mse, Sgd::new(1.0))
                    .with_gradient_clip(0.001),
            )
            .unwrap();

        let w_before = driver.model().layers[0].weights.data[0][0];
        let b_before = driver.model().layers[0].biases.data[0][0];
        driver.fit(1, &mut stream, None).unwrap();
        let dw = driver.model().layers[0].weights.data[0][0] - w_before;
        let db = driver.model().layers[0].biases.data[0][0] - b_before;

        // Post-clip gradient norm ≤ 0.001, lr = 1 → update norm ≤ 0.001 + ε.
        let step_norm = (dw * dw + db * db).sqrt();
        assert!(step_norm <= 0.001 + 1e-9, "step norm {} exceeds clip", step_norm);
        assert!(step_norm > 0.0);
    }
}
