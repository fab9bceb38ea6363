//! Quality scores for binary splits of a labelled population.

use crate::data::LabeledDataset;
use crate::rule::{ClassLabel, IntervalRule, RuleCollection};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Per-class `(accepted, rejected)` counts, in ascending label order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContingencyTable {
    pub counts: Vec<(usize, usize)>,
}

impl ContingencyTable {
    pub fn new(counts: Vec<(usize, usize)>) -> Self {
        Self { counts }
    }

    /// Counts how a rule splits every class of `data`.
    pub fn for_rule(rule: &IntervalRule, data: &LabeledDataset) -> Self {
        let counts = data
            .classes
            .values()
            .map(|rows| {
                let accepted = rows.iter().filter(|x| rule.accepts(x)).count();
                (accepted, rows.len() - accepted)
            })
            .collect();
        Self { counts }
    }

    /// Counts a membership mask against parallel example labels. Classes
    /// are the distinct labels, ascending.
    pub fn from_mask(mask: &[bool], labels: &[ClassLabel]) -> Self {
        let classes: BTreeSet<ClassLabel> = labels.iter().copied().collect();
        let counts = classes
            .iter()
            .map(|&class| {
                mask.iter()
                    .zip(labels)
                    .filter(|&(_, &label)| label == class)
                    .fold((0, 0), |(acc, rej), (&inside, _)| {
                        if inside {
                            (acc + 1, rej)
                        } else {
                            (acc, rej + 1)
                        }
                    })
            })
            .collect();
        Self { counts }
    }

    pub fn accepted(&self) -> usize {
        self.counts.iter().map(|&(a, _)| a).sum()
    }

    pub fn rejected(&self) -> usize {
        self.counts.iter().map(|&(_, r)| r).sum()
    }

    pub fn total(&self) -> usize {
        self.accepted() + self.rejected()
    }
}

/// Which score picks the best split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Criterion {
    InfoGain,
    Statistical,
}

impl Criterion {
    pub fn score(&self, table: &ContingencyTable) -> f64 {
        match self {
            Criterion::InfoGain => info_gain(table),
            Criterion::Statistical => stat_criterion(table),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::InfoGain => "info-gain",
            Criterion::Statistical => "statistical",
        }
    }
}

/// Base-2 entropy of a count distribution; an empty one has entropy 0.
fn entropy<I: IntoIterator<Item = usize>>(counts: I) -> f64 {
    let counts: Vec<usize> = counts.into_iter().collect();
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total as f64;
            -p * p.log2()
        })
        .sum()
}

/// Class entropy before the split minus the size-weighted entropies of the
/// accepted and rejected parts.
pub fn info_gain(table: &ContingencyTable) -> f64 {
    let total = table.total();
    if total == 0 {
        return 0.0;
    }
    let n = total as f64;

    let before = entropy(table.counts.iter().map(|&(a, r)| a + r));
    let accepted = entropy(table.counts.iter().map(|&(a, _)| a));
    let rejected = entropy(table.counts.iter().map(|&(_, r)| r));

    let after = table.accepted() as f64 / n * accepted + table.rejected() as f64 / n * rejected;
    (before - after).max(0.0)
}

/// `prod_k C(n_k, a_k) / C(N, A)`: the chance of drawing exactly this
/// per-class mix when `A` of `N` examples are picked at random. Computed in
/// log space.
pub fn stat_criterion(table: &ContingencyTable) -> f64 {
    let numerator: f64 = table
        .counts
        .iter()
        .map(|&(a, r)| ln_binomial(a + r, a))
        .sum();
    let denominator = ln_binomial(table.total(), table.accepted());
    (numerator - denominator).exp()
}

fn ln_binomial(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    (1..=k)
        .map(|i| ((n - k + i) as f64 / i as f64).ln())
        .sum()
}

/// Contingency table and both scores of one rule.
#[derive(Debug, Clone, Serialize)]
pub struct RuleScore {
    pub class: ClassLabel,
    pub index: usize,
    pub table: ContingencyTable,
    pub info_gain: f64,
    pub statistical: f64,
}

/// Scores every rule of every class against `data`.
pub fn rule_stats(rules: &RuleCollection, data: &LabeledDataset) -> Vec<RuleScore> {
    rules
        .iter()
        .flat_map(|(&class, class_rules)| {
            class_rules.iter().enumerate().map(move |(index, rule)| {
                let table = ContingencyTable::for_rule(rule, data);
                RuleScore {
                    class,
                    index,
                    info_gain: info_gain(&table),
                    statistical: stat_criterion(&table),
                    table,
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_tab;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn perfect_split_gains_full_entropy() {
        let table = ContingencyTable::new(vec![(4, 0), (0, 4)]);
        assert!(close(info_gain(&table), 1.0));
    }

    #[test]
    fn proportional_split_gains_nothing() {
        let table = ContingencyTable::new(vec![(2, 2), (3, 3)]);
        assert!(close(info_gain(&table), 0.0));
    }

    #[test]
    fn empty_partitions_do_not_produce_nan() {
        let all_accepted = ContingencyTable::new(vec![(3, 0), (5, 0)]);
        assert_eq!(info_gain(&all_accepted), 0.0);
        assert_eq!(info_gain(&ContingencyTable::new(vec![(0, 0)])), 0.0);
        assert_eq!(info_gain(&ContingencyTable::new(Vec::new())), 0.0);
    }

    #[test]
    fn stat_criterion_matches_hypergeometric_probability() {
        // C(3,2) * C(2,0) / C(5,2) = 3 / 10
        let table = ContingencyTable::new(vec![(2, 1), (0, 2)]);
        assert!(close(stat_criterion(&table), 0.3));
    }

    #[test]
    fn stat_criterion_of_trivial_splits_is_one() {
        assert!(close(stat_criterion(&ContingencyTable::new(vec![(0, 3), (0, 4)])), 1.0));
        assert!(close(stat_criterion(&ContingencyTable::new(vec![(3, 0), (4, 0)])), 1.0));
    }

    #[test]
    fn table_from_mask_groups_by_label() {
        let mask = [true, false, true, true];
        let labels = [1, 1, 2, 3];
        let table = ContingencyTable::from_mask(&mask, &labels);

        assert_eq!(table.counts, vec![(1, 1), (1, 0), (1, 0)]);
        assert_eq!(table.accepted(), 3);
        assert_eq!(table.total(), 4);
    }

    #[test]
    fn rule_stats_cover_every_rule() {
        let data = parse_tab("1 2 0 2 4 -1\n0\n1\n\n5\n6\n\n").unwrap();
        let mut rules = RuleCollection::new();
        rules.insert(1, vec![IntervalRule::new(vec![(0.0, 1.0)])]);
        rules.insert(
            2,
            vec![
                IntervalRule::new(vec![(5.0, 6.0)]),
                IntervalRule::new(vec![(0.0, 6.0)]),
            ],
        );

        let stats = rule_stats(&rules, &data);
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].table.counts, vec![(2, 0), (0, 2)]);
        assert!(close(stats[0].info_gain, 1.0));
        assert_eq!(stats[2].index, 1);
        assert!(close(stats[2].info_gain, 0.0));
    }
}
