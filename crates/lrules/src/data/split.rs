use super::LabeledDataset;
use crate::error::{LrulesError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub train: LabeledDataset,
    pub test: LabeledDataset,
}

/// Stratified K-fold split without shuffling.
///
/// Inside each class the examples are cut into `n_folds` contiguous chunks,
/// the first `len % n_folds` chunks being one example longer. Chunk `fold`
/// of every class forms the test set, everything else the training set.
pub fn stratified_split(dataset: &LabeledDataset, n_folds: usize, fold: usize) -> Result<Split> {
    if n_folds < 2 {
        return Err(LrulesError::Config(format!(
            "need at least 2 folds, got {}",
            n_folds
        )));
    }
    if fold >= n_folds {
        return Err(LrulesError::Config(format!(
            "fold {} out of range for {} folds",
            fold, n_folds
        )));
    }

    let mut train = LabeledDataset::new(dataset.n_features, dataset.hole);
    let mut test = LabeledDataset::new(dataset.n_features, dataset.hole);

    for (&label, rows) in &dataset.classes {
        let (start, end) = fold_range(rows.len(), n_folds, fold);
        test.classes.insert(label, rows[start..end].to_vec());
        train.classes.insert(
            label,
            rows[..start].iter().chain(&rows[end..]).cloned().collect(),
        );
    }

    Ok(Split { train, test })
}

fn fold_range(len: usize, n_folds: usize, fold: usize) -> (usize, usize) {
    let base = len / n_folds;
    let extra = len % n_folds;
    let size = |i: usize| base + usize::from(i < extra);
    let start: usize = (0..fold).map(size).sum();
    (start, start + size(fold))
}

/// Centres every feature to zero mean and scales it to unit population
/// variance. Constant features are only centred.
pub fn standardize(dataset: &LabeledDataset) -> LabeledDataset {
    let n = dataset.n_examples();
    if n == 0 {
        return dataset.clone();
    }

    let mut mean = vec![0.0; dataset.n_features];
    for (_, x) in dataset.examples() {
        for (m, v) in mean.iter_mut().zip(x) {
            *m += v;
        }
    }
    mean.iter_mut().for_each(|m| *m /= n as f64);

    let mut var = vec![0.0; dataset.n_features];
    for (_, x) in dataset.examples() {
        for ((s, v), m) in var.iter_mut().zip(x).zip(&mean) {
            *s += (v - m).powi(2);
        }
    }
    let scale: Vec<f64> = var
        .iter()
        .map(|s| {
            let std = (s / n as f64).sqrt();
            if std == 0.0 {
                1.0
            } else {
                std
            }
        })
        .collect();

    let mut scaled = dataset.clone();
    for rows in scaled.classes.values_mut() {
        for x in rows.iter_mut() {
            for ((v, m), s) in x.iter_mut().zip(&mean).zip(&scale) {
                *v = (*v - m) / s;
            }
        }
    }
    scaled
}
