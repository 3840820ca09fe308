use serde::{Serialize, Deserialize};

/// Per-epoch training statistics recorded by `Driver::fit`.
///
/// `train_metric` / `val_metric` hold accuracy in [0, 1] for classification
/// tasks and R² for regression tasks; validation fields are `None` when no
/// validation stream was supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochRecord {
    /// 1-based epoch number.
    pub epoch: usize,
    /// Mean training loss over all samples in this epoch.
    pub train_loss: f64,
    /// Mean validation loss, if a validation stream was provided.
    pub val_loss: Option<f64>,
    /// Training accuracy (classification) or R² (regression).
    pub train_metric: f64,
    /// Validation counterpart of `train_metric`.
    pub val_metric: Option<f64>,
}

/// The ordered, append-only record of a `fit` run: one entry per completed
/// epoch.  `fit` returns it by value; the driver keeps nothing behind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    pub epochs: Vec<EpochRecord>,
}

impl History {
    pub fn len(&self) -> usize {
        self.epochs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.epochs.is_empty()
    }

    pub fn last(&self) -> Option<&EpochRecord> {
        self.epochs.last()
    }

    /// Serializes the history to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> std::io::Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Deserializes a history previously written by `save_json`.
    pub fn load_json(path: &str) -> std::io::Result<History> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        serde_json::from_reader(reader)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))
    }

    /// Loss curves (train solid, validation dashed) as a standalone SVG.
    pub fn loss_curve_svg(&self) -> String {
        crate::plot::loss_curve_svg(self)
    }

    /// Accuracy/R² curves as a standalone SVG.
    pub fn metric_curve_svg(&self) -> String {
        crate::plot::metric_curve_svg(self)
    }
}
