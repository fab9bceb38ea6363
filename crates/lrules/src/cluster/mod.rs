//! Generalisation of many rules into a few by clustering their acceptance
//! rows and rebuilding one interval rule per cluster.

pub mod kmeans;
pub mod restore;

pub use kmeans::KMeans;
pub use restore::{best_threshold, thresholds, RuleRestorer, ThresholdChoice};

use crate::error::Result;

/// Anything that can split `rows` into `k` groups and report their centres.
///
/// Every centre has the width of the input rows.
pub trait Clusterer {
    fn cluster(&self, rows: &[Vec<f64>], k: usize) -> Result<Vec<Vec<f64>>>;
}
