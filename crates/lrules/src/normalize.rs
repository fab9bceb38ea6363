//! Closes open rule bounds against the data's observed range and encodes
//! every class's rules as a binary acceptance matrix over the dataset.

use crate::data::LabeledDataset;
use crate::diagnostics::Diagnostics;
use crate::error::{LrulesError, Result};
use crate::rule::{ClassLabel, IntervalRule, RuleCollection};
use std::collections::{BTreeMap, BTreeSet};

/// Binary rule × example membership matrix for one class's rules.
///
/// Columns follow [`LabeledDataset::examples`] order over the whole dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptanceMatrix {
    n_rules: usize,
    n_examples: usize,
    cells: Vec<u8>,
}

impl AcceptanceMatrix {
    pub fn build(rules: &[IntervalRule], data: &LabeledDataset) -> Self {
        let n_examples = data.n_examples();
        let mut cells = Vec::with_capacity(rules.len() * n_examples);
        for rule in rules {
            cells.extend(data.examples().map(|(_, x)| u8::from(rule.accepts(x))));
        }

        Self {
            n_rules: rules.len(),
            n_examples,
            cells,
        }
    }

    pub fn n_rules(&self) -> usize {
        self.n_rules
    }

    pub fn n_examples(&self) -> usize {
        self.n_examples
    }

    pub fn get(&self, rule: usize, example: usize) -> u8 {
        self.cells[rule * self.n_examples + example]
    }

    pub fn row(&self, rule: usize) -> &[u8] {
        let start = rule * self.n_examples;
        &self.cells[start..start + self.n_examples]
    }

    /// Rows as real vectors, the form clustering works on.
    pub fn to_f64_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n_rules)
            .map(|r| self.row(r).iter().map(|&c| f64::from(c)).collect())
            .collect()
    }
}

/// Rules with every bound finite, plus what was derived along the way.
#[derive(Debug, Clone)]
pub struct NormalizedRules {
    pub rules: RuleCollection,
    pub global_min: Vec<f64>,
    pub global_max: Vec<f64>,
    pub acceptance: BTreeMap<ClassLabel, AcceptanceMatrix>,
}

pub struct Normalizer<'a> {
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Normalizer<'a> {
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Replaces open bounds with the data's per-feature range and builds
    /// acceptance matrices. The input collection is left untouched.
    pub fn normalize(&self, rules: &RuleCollection, data: &LabeledDataset) -> Result<NormalizedRules> {
        check_schema(rules, data)?;
        self.diagnostics.debug("data and rules look fine");

        let (global_min, global_max) = self.feature_range(data);
        self.diagnostics.debug(&format!(
            "feature range: min {:?}, max {:?}",
            global_min, global_max
        ));

        let normalized: RuleCollection = rules
            .iter()
            .map(|(&label, class_rules)| {
                let closed = class_rules
                    .iter()
                    .map(|rule| close_bounds(rule, &global_min, &global_max))
                    .collect();
                (label, closed)
            })
            .collect();

        let acceptance = normalized
            .iter()
            .map(|(&label, class_rules)| (label, AcceptanceMatrix::build(class_rules, data)))
            .collect();

        Ok(NormalizedRules {
            rules: normalized,
            global_min,
            global_max,
            acceptance,
        })
    }

    /// Element-wise min and max over every example. Examples holding the hole
    /// value are reported but still counted.
    fn feature_range(&self, data: &LabeledDataset) -> (Vec<f64>, Vec<f64>) {
        let mut min = vec![f64::INFINITY; data.n_features];
        let mut max = vec![f64::NEG_INFINITY; data.n_features];

        for (label, rows) in &data.classes {
            for (i, x) in rows.iter().enumerate() {
                if data.has_hole(x) {
                    self.diagnostics
                        .warn(&format!("holes in data: class {}, example {}", label, i));
                }
                for ((lo, hi), &v) in min.iter_mut().zip(max.iter_mut()).zip(x) {
                    *lo = lo.min(v);
                    *hi = hi.max(v);
                }
            }
        }

        (min, max)
    }
}

fn close_bounds(rule: &IntervalRule, global_min: &[f64], global_max: &[f64]) -> IntervalRule {
    let mut closed = rule.clone();
    for (i, (lo, hi)) in closed.bounds_mut().iter_mut().enumerate() {
        if *lo == f64::NEG_INFINITY {
            *lo = global_min[i];
        }
        if *hi == f64::INFINITY {
            *hi = global_max[i];
        }
    }
    closed
}

/// Rules and data must cover the same classes, every class needs rules and
/// examples, and every rule and example must have the dataset's width.
pub fn check_schema(rules: &RuleCollection, data: &LabeledDataset) -> Result<()> {
    let rule_keys: BTreeSet<_> = rules.keys().copied().collect();
    let data_keys: BTreeSet<_> = data.classes.keys().copied().collect();
    if rule_keys != data_keys {
        return Err(LrulesError::SchemaMismatch(format!(
            "rule classes {:?} differ from data classes {:?}",
            rule_keys, data_keys
        )));
    }

    for (label, class_rules) in rules {
        if class_rules.is_empty() {
            return Err(LrulesError::SchemaMismatch(format!("class {} has no rules", label)));
        }
        if data.classes[label].is_empty() {
            return Err(LrulesError::SchemaMismatch(format!(
                "class {} has no examples",
                label
            )));
        }
        if let Some(rule) = class_rules.iter().find(|r| r.len() != data.n_features) {
            return Err(LrulesError::SchemaMismatch(format!(
                "class {} has a rule of {} bound pairs, data has {} features",
                label,
                rule.len(),
                data.n_features
            )));
        }
    }

    if let Some((label, x)) = data.examples().find(|(_, x)| x.len() != data.n_features) {
        return Err(LrulesError::SchemaMismatch(format!(
            "class {} has an example of {} features, expected {}",
            label,
            x.len(),
            data.n_features
        )));
    }

    Ok(())
}
