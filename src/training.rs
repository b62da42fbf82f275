//! Entry point handed to the NAS pipeline for training one sampled architecture.
//!
//! Training itself lives with the caller; this module only fixes the seam the
//! pipeline calls through.

use crate::dataset::Dataset;

/// Something that can train a single model on a dataset and report back.
pub trait SingleModelTrainer<D: Dataset> {
    type Report;
    type Error;

    fn train_single_model(&mut self, dataset: &D) -> Result<Self::Report, Self::Error>;
}

/// Train one model on `dataset` with `trainer`.
pub fn train_single_model<D, M>(trainer: &mut M, dataset: &D) -> Result<M::Report, M::Error>
where
    D: Dataset,
    M: SingleModelTrainer<D>,
{
    tracing::info!("Training single model on {} samples", dataset.len());
    trainer.train_single_model(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DatasetError;

    struct Labels(Vec<usize>);

    impl Dataset for Labels {
        type Item = ();
        type Target = usize;

        fn len(&self) -> usize {
            self.0.len()
        }

        fn get(&self, index: usize) -> Result<((), usize), DatasetError> {
            self.0
                .get(index)
                .map(|&label| ((), label))
                .ok_or(DatasetError::IndexOutOfRange {
                    index,
                    len: self.0.len(),
                })
        }
    }

    /// Counts how often each label shows up.
    struct Histogram {
        runs: usize,
    }

    impl SingleModelTrainer<Labels> for Histogram {
        type Report = Vec<usize>;
        type Error = DatasetError;

        fn train_single_model(&mut self, dataset: &Labels) -> Result<Vec<usize>, DatasetError> {
            self.runs += 1;
            let mut counts = Vec::new();
            for index in 0..dataset.len() {
                let ((), label) = dataset.get(index)?;
                if counts.len() <= label {
                    counts.resize(label + 1, 0);
                }
                counts[label] += 1;
            }
            Ok(counts)
        }
    }

    #[test]
    fn delegates_to_trainer() {
        let mut trainer = Histogram { runs: 0 };
        let report = train_single_model(&mut trainer, &Labels(vec![0, 2, 2])).unwrap();
        assert_eq!(report, vec![1, 0, 2]);
        assert_eq!(trainer.runs, 1);
    }
}
