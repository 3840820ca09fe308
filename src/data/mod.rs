pub mod stream;
pub mod csv;
pub mod image;

pub use stream::{Batch, DataStream, MemoryStream};
pub use csv::{parse_csv, LabelMode};
pub use image::{image_bytes_to_grayscale_input, image_bytes_to_rgb_input};

use thiserror::Error;

/// Failures while building or ingesting datasets, before the driver ever
/// sees a batch.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("csv row {row}: {message}")]
    Csv { row: usize, message: String },

    #[error("csv: {0}")]
    CsvFormat(String),

    #[error("image: {0}")]
    Image(String),

    #[error("inputs and targets must have equal length: {inputs} vs {targets}")]
    LengthMismatch { inputs: usize, targets: usize },

    #[error("batch_size must be at least 1")]
    ZeroBatchSize,
}
