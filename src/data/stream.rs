use rand::seq::SliceRandom;

use crate::data::DataError;

/// One batch drawn from a data stream: parallel rows of inputs and targets.
#[derive(Debug, Clone)]
pub struct Batch {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<Vec<f64>>,
}

impl Batch {
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}

/// A finite, restartable, ordered sequence of batches.
///
/// The driver calls `reset` at the start of every pass (each training epoch,
/// each validation pass, each `predict`/`evaluate`/`metrics` call), then
/// drains `next_batch` until it returns `None`.
pub trait DataStream {
    fn reset(&mut self);
    fn next_batch(&mut self) -> Option<Batch>;
}

/// In-memory stream over sample vectors, chunked into fixed-size batches
/// (the final batch may be smaller).
///
/// With `shuffled`, the sample order is re-drawn on every `reset`, i.e. once
/// per epoch; the plain constructor preserves insertion order, which is what
/// `predict` callers want.
#[derive(Debug)]
pub struct MemoryStream {
    inputs: Vec<Vec<f64>>,
    targets: Vec<Vec<f64>>,
    batch_size: usize,
    shuffle: bool,
    indices: Vec<usize>,
    position: usize,
}

impl MemoryStream {
    pub fn new(
        inputs: Vec<Vec<f64>>,
        targets: Vec<Vec<f64>>,
        batch_size: usize,
    ) -> Result<MemoryStream, DataError> {
        Self::build(inputs, targets, batch_size, false)
    }

    /// Same as `new`, but re-shuffles the sample order on every `reset`.
    pub fn shuffled(
        inputs: Vec<Vec<f64>>,
        targets: Vec<Vec<f64>>,
        batch_size: usize,
    ) -> Result<MemoryStream, DataError> {
        Self::build(inputs, targets, batch_size, true)
    }

    fn build(
        inputs: Vec<Vec<f64>>,
        targets: Vec<Vec<f64>>,
        batch_size: usize,
        shuffle: bool,
    ) -> Result<MemoryStream, DataError> {
        if inputs.len() != targets.len() {
            return Err(DataError::LengthMismatch {
                inputs: inputs.len(),
                targets: targets.len(),
            });
        }
        if batch_size == 0 {
            return Err(DataError::ZeroBatchSize);
        }
        let indices: Vec<usize> = (0..inputs.len()).collect();
        Ok(MemoryStream {
            inputs,
            targets,
            batch_size,
            shuffle,
            indices,
            position: 0,
        })
    }

    pub fn n_samples(&self) -> usize {
        self.inputs.len()
    }
}

impl DataStream for MemoryStream {
    fn reset(&mut self) {
        self.position = 0;
        if self.shuffle {
            self.indices.shuffle(&mut rand::thread_rng());
        }
    }

    fn next_batch(&mut self) -> Option<Batch> {
        if self.position >= self.indices.len() {
            return None;
        }
        let end = (self.position + self.batch_size).min(self.indices.len());
        let picked = &self.indices[self.position..end];
        self.position = end;

        Some(Batch {
            inputs: picked.iter().map(|&i| self.inputs[i].clone()).collect(),
            targets: picked.iter().map(|&i| self.targets[i].clone()).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(n: usize) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
        let inputs: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64]).collect();
        let targets: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64 * 10.0]).collect();
        (inputs, targets)
    }

    #[test]
    fn chunks_with_smaller_final_batch() {
        let (inputs, targets) = samples(5);
        let mut stream = MemoryStream::new(inputs, targets, 2).unwrap();
        stream.reset();
        assert_eq!(stream.next_batch().unwrap().len(), 2);
        assert_eq!(stream.next_batch().unwrap().len(), 2);
        assert_eq!(stream.next_batch().unwrap().len(), 1);
        assert!(stream.next_batch().is_none());
    }

    #[test]
    fn reset_restarts_from_the_beginning() {
        let (inputs, targets) = samples(3);
        let mut stream = MemoryStream::new(inputs, targets, 3).unwrap();
        stream.reset();
        assert!(stream.next_batch().is_some());
        assert!(stream.next_batch().is_none());
        stream.reset();
        let again = stream.next_batch().unwrap();
        assert_eq!(again.inputs[0], vec![0.0]);
    }

    #[test]
    fn unshuffled_stream_preserves_order() {
        let (inputs, targets) = samples(4);
        let mut stream = MemoryStream::new(inputs, targets, 1).unwrap();
        stream.reset();
        let mut seen = Vec::new();
        while let Some(batch) = stream.next_batch() {
            seen.push(batch.inputs[0][0]);
        }
        assert_eq!(seen, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = MemoryStream::new(vec![vec![1.0]], vec![], 1).unwrap_err();
        assert!(matches!(err, DataError::LengthMismatch { inputs: 1, targets: 0 }));
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let (inputs, targets) = samples(2);
        let err = MemoryStream::new(inputs, targets, 0).unwrap_err();
        assert!(matches!(err, DataError::ZeroBatchSize));
    }
}
