//! Interval rules: conjunctions of inclusive per-feature `[lo, hi]` bounds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 1-based class label.
pub type ClassLabel = usize;

/// Rules grouped by the class they vote for. Iteration is in ascending label
/// order, which the voting tie-break relies on.
pub type RuleCollection = BTreeMap<ClassLabel, Vec<IntervalRule>>;

/// One `(lo, hi)` pair per feature, in feature-index order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalRule {
    bounds: Vec<(f64, f64)>,
}

impl IntervalRule {
    pub fn new(bounds: Vec<(f64, f64)>) -> Self {
        Self { bounds }
    }

    /// A rule that constrains nothing: every feature is `(-inf, +inf)`.
    pub fn unbounded(n_features: usize) -> Self {
        Self {
            bounds: vec![(f64::NEG_INFINITY, f64::INFINITY); n_features],
        }
    }

    /// Builds a rule from the flattened `[lo0, hi0, lo1, hi1, ...]` encoding.
    ///
    /// Returns `None` when the slice has odd length.
    pub fn from_flat(flat: &[f64]) -> Option<Self> {
        if flat.len() % 2 != 0 {
            return None;
        }
        let bounds = flat.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect();
        Some(Self { bounds })
    }

    pub fn to_flat(&self) -> Vec<f64> {
        self.bounds.iter().flat_map(|&(lo, hi)| [lo, hi]).collect()
    }

    pub fn len(&self) -> usize {
        self.bounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bounds.is_empty()
    }

    pub fn lo(&self, feature: usize) -> f64 {
        self.bounds[feature].0
    }

    pub fn hi(&self, feature: usize) -> f64 {
        self.bounds[feature].1
    }

    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    pub(crate) fn bounds_mut(&mut self) -> &mut [(f64, f64)] {
        &mut self.bounds
    }

    /// True if some bound is still an open sentinel.
    pub fn has_open_bounds(&self) -> bool {
        self.bounds
            .iter()
            .any(|&(lo, hi)| lo.is_infinite() || hi.is_infinite())
    }

    /// Whether every feature of `x` lies within its `[lo, hi]`, both ends
    /// inclusive.
    ///
    /// # Panics
    ///
    /// Panics if the rule does not have exactly one bound pair per feature of
    /// `x`. That is a caller bug, not a data error.
    pub fn accepts(&self, x: &[f64]) -> bool {
        assert_eq!(
            self.bounds.len(),
            x.len(),
            "rule has {} bound pairs but example has {} features",
            self.bounds.len(),
            x.len()
        );

        self.bounds
            .iter()
            .zip(x)
            .all(|(&(lo, hi), &value)| lo <= value && value <= hi)
    }
}

impl fmt::Display for IntervalRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (lo, hi)) in self.bounds.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "[{}, {}]", lo, hi)?;
        }
        Ok(())
    }
}

/// Appends `rule` unless an equal rule is already present.
pub fn push_unique(rules: &mut Vec<IntervalRule>, rule: IntervalRule) -> bool {
    if rules.contains(&rule) {
        false
    } else {
        rules.push(rule);
        true
    }
}

/// Number of rules per class, in label order.
pub fn rule_counts(rules: &RuleCollection) -> Vec<(ClassLabel, usize)> {
    rules.iter().map(|(label, list)| (*label, list.len())).collect()
}
