pub mod split;
pub mod tab;

pub use split::{standardize, stratified_split, Split};
pub use tab::{parse_tab, read_tab, to_tab_string, write_tab};

use crate::error::{LrulesError, Result};
use crate::rule::ClassLabel;
use std::collections::BTreeMap;

/// Feature vectors grouped by class label, plus the value that marks a
/// missing measurement.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledDataset {
    pub n_features: usize,
    pub classes: BTreeMap<ClassLabel, Vec<Vec<f64>>>,
    pub hole: f64,
}

impl LabeledDataset {
    pub fn new(n_features: usize, hole: f64) -> Self {
        Self {
            n_features,
            classes: BTreeMap::new(),
            hole,
        }
    }

    /// Groups `rows` by `labels`. Labels must be 1-based; every label between
    /// 1 and the largest one gets a (possibly empty) class.
    pub fn from_labeled_rows(rows: &[Vec<f64>], labels: &[ClassLabel], hole: f64) -> Result<Self> {
        if rows.len() != labels.len() {
            return Err(LrulesError::Dataset(format!(
                "{} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        if labels.iter().any(|&label| label == 0) {
            return Err(LrulesError::Dataset("class labels are 1-based".to_string()));
        }

        let n_features = rows.first().map(Vec::len).unwrap_or(0);
        let mut dataset = Self::new(n_features, hole);
        let n_classes = labels.iter().copied().max().unwrap_or(0);
        for label in 1..=n_classes {
            dataset.classes.insert(label, Vec::new());
        }

        for (row, &label) in rows.iter().zip(labels) {
            if row.len() != n_features {
                return Err(LrulesError::Dataset(format!(
                    "row of {} features, expected {}",
                    row.len(),
                    n_features
                )));
            }
            dataset.classes.entry(label).or_default().push(row.clone());
        }

        Ok(dataset)
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn n_examples(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }

    /// Every example with its label, classes in ascending label order and
    /// examples in file order within a class. Acceptance matrix columns
    /// follow this order.
    pub fn examples(&self) -> impl Iterator<Item = (ClassLabel, &[f64])> + '_ {
        self.classes
            .iter()
            .flat_map(|(&label, rows)| rows.iter().map(move |row| (label, row.as_slice())))
    }

    /// Rows and labels as two parallel vectors, in [`examples`](Self::examples) order.
    pub fn to_rows(&self) -> (Vec<Vec<f64>>, Vec<ClassLabel>) {
        self.examples()
            .map(|(label, row)| (row.to_vec(), label))
            .unzip()
    }

    pub fn has_hole(&self, x: &[f64]) -> bool {
        x.contains(&self.hole)
    }

    /// Cumulative example counts, starting at 0, one entry per class plus one.
    pub fn cumulative_counts(&self) -> Vec<usize> {
        let mut counts = Vec::with_capacity(self.classes.len() + 1);
        let mut total = 0;
        counts.push(total);
        for rows in self.classes.values() {
            total += rows.len();
            counts.push(total);
        }
        counts
    }
}
