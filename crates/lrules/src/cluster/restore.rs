use super::Clusterer;
use crate::diagnostics::Diagnostics;
use crate::error::{LrulesError, Result};
use crate::normalize::AcceptanceMatrix;
use crate::rule::{ClassLabel, IntervalRule};
use crate::score::{ContingencyTable, Criterion};

const THRESHOLD_COUNT: usize = 36;
const THRESHOLD_LOW: f64 = 0.1;
const THRESHOLD_HIGH: f64 = 0.9;

/// Evenly spaced cut-offs from 0.1 to 0.9, both included.
pub fn thresholds() -> Vec<f64> {
    let step = (THRESHOLD_HIGH - THRESHOLD_LOW) / (THRESHOLD_COUNT - 1) as f64;
    (0..THRESHOLD_COUNT)
        .map(|i| THRESHOLD_LOW + step * i as f64)
        .collect()
}

/// Outcome of scanning the threshold grid for one cluster centre.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdChoice {
    pub threshold: f64,
    pub score: f64,
    pub mask: Vec<bool>,
}

impl ThresholdChoice {
    pub fn selected(&self) -> usize {
        self.mask.iter().filter(|&&inside| inside).count()
    }
}

/// Picks the threshold whose mask `center > threshold` scores best against
/// `labels`. An empty mask scores 0. Ties go to the lowest threshold.
pub fn best_threshold(center: &[f64], labels: &[ClassLabel], criterion: Criterion) -> ThresholdChoice {
    let mut best: Option<ThresholdChoice> = None;

    for threshold in thresholds() {
        let mask: Vec<bool> = center.iter().map(|&v| v > threshold).collect();
        let score = if mask.iter().any(|&inside| inside) {
            criterion.score(&ContingencyTable::from_mask(&mask, labels))
        } else {
            0.0
        };

        let better = best.as_ref().map_or(true, |b| score > b.score);
        if better {
            best = Some(ThresholdChoice {
                threshold,
                score,
                mask,
            });
        }
    }

    best.unwrap_or(ThresholdChoice {
        threshold: THRESHOLD_LOW,
        score: 0.0,
        mask: vec![false; center.len()],
    })
}

/// Clusters one class's acceptance rows and turns every cluster back into an
/// interval rule.
pub struct RuleRestorer<'a> {
    class: ClassLabel,
    n_clusters: usize,
    criterion: Criterion,
    clusterer: &'a dyn Clusterer,
    diagnostics: &'a dyn Diagnostics,
    centers: Option<Vec<Vec<f64>>>,
}

impl<'a> RuleRestorer<'a> {
    pub fn new(
        class: ClassLabel,
        n_clusters: usize,
        criterion: Criterion,
        clusterer: &'a dyn Clusterer,
        diagnostics: &'a dyn Diagnostics,
    ) -> Self {
        Self {
            class,
            n_clusters,
            criterion,
            clusterer,
            diagnostics,
            centers: None,
        }
    }

    pub fn fit(&mut self, acceptance: &AcceptanceMatrix) -> Result<()> {
        let centers = self
            .clusterer
            .cluster(&acceptance.to_f64_rows(), self.n_clusters)?;
        self.diagnostics.debug(&format!(
            "class {}: {} rules grouped into {} clusters",
            self.class,
            acceptance.n_rules(),
            centers.len()
        ));
        self.centers = Some(centers);
        Ok(())
    }

    pub fn centers(&self) -> Option<&[Vec<f64>]> {
        self.centers.as_deref()
    }

    /// One rule per cluster: the tightest box around the examples of `data`
    /// that the best-scoring threshold selects. `data` and `labels` must be
    /// the examples the acceptance matrix was built on, in the same order.
    /// Clusters whose best threshold selects nothing are dropped.
    pub fn restore(&self, data: &[Vec<f64>], labels: &[ClassLabel]) -> Result<Vec<IntervalRule>> {
        let centers = self.centers.as_ref().ok_or_else(|| {
            LrulesError::Clustering(format!("class {}: restore called before fit", self.class))
        })?;
        if data.len() != labels.len() {
            return Err(LrulesError::SchemaMismatch(format!(
                "{} examples but {} labels",
                data.len(),
                labels.len()
            )));
        }

        let mut rules = Vec::with_capacity(centers.len());
        for (i, center) in centers.iter().enumerate() {
            if center.len() != data.len() {
                return Err(LrulesError::SchemaMismatch(format!(
                    "cluster centre covers {} examples, data has {}",
                    center.len(),
                    data.len()
                )));
            }

            let choice = best_threshold(center, labels, self.criterion);
            self.diagnostics.debug(&format!(
                "class {}, cluster {}: threshold {:.3} selects {} examples ({} = {:.4})",
                self.class,
                i,
                choice.threshold,
                choice.selected(),
                self.criterion.as_str(),
                choice.score
            ));

            match bounding_box(data, &choice.mask) {
                Some(rule) => rules.push(rule),
                None => self.diagnostics.warn(&format!(
                    "class {}, cluster {}: cluster center is inadequate, no examples selected",
                    self.class, i
                )),
            }
        }

        Ok(rules)
    }
}

fn bounding_box(data: &[Vec<f64>], mask: &[bool]) -> Option<IntervalRule> {
    let mut selected = data.iter().zip(mask).filter(|&(_, &inside)| inside).map(|(x, _)| x);
    let first = selected.next()?;
    let mut bounds: Vec<(f64, f64)> = first.iter().map(|&v| (v, v)).collect();

    for x in selected {
        for ((lo, hi), &v) in bounds.iter_mut().zip(x) {
            *lo = lo.min(v);
            *hi = hi.max(v);
        }
    }

    Some(IntervalRule::new(bounds))
}
