//! End-to-end comparison of the full rule set against rule sets shrunk by
//! clustering.

use crate::cluster::{Clusterer, KMeans, RuleRestorer};
use crate::config::{Config, ExperimentSettings};
use crate::data::{read_tab, LabeledDataset};
use crate::diagnostics::Diagnostics;
use crate::error::{LrulesError, Result};
use crate::normalize::{NormalizedRules, Normalizer};
use crate::report::{ReportLayout, ReportParser};
use crate::rule::{ClassLabel, IntervalRule, RuleCollection};
use crate::score::Criterion;
use crate::vote::{accuracy, VotingClassifier};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Rules and train/test data for one dataset.
#[derive(Debug, Clone)]
pub struct ExperimentInputs {
    pub rules: RuleCollection,
    pub train: LabeledDataset,
    pub test: LabeledDataset,
}

impl ExperimentInputs {
    /// Reads `<prefix>-lrules.html`, `<dataset>-train.tab` and
    /// `<dataset>-test.tab` from the data home.
    pub fn load(
        config: &Config,
        dataset: &str,
        prefix: &str,
        settings: &ExperimentSettings,
        diagnostics: &dyn Diagnostics,
    ) -> Result<Self> {
        let report = config.data_file(&format!("{}-lrules.html", prefix));
        diagnostics.info(&format!("reading rules from {}", report.display()));
        let parser = ReportParser::with_delimiter(ReportLayout::RulesTable, settings.delimiter, diagnostics)?;
        let rules = parser.parse_file(&report)?.rules;

        let train = read_tab(config.data_file(&format!("{}-train.tab", dataset)))?;
        let test = read_tab(config.data_file(&format!("{}-test.tab", dataset)))?;

        Ok(Self { rules, train, test })
    }
}

/// Test accuracies for one cluster count. `None` means the method left
/// some class without rules.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterRun {
    pub k: usize,
    pub bounds: Option<f64>,
    pub info_gain: Option<f64>,
    pub statistical: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExperimentReport {
    pub dataset: String,
    pub target: String,
    pub n_features: usize,
    pub n_train: usize,
    pub n_test: usize,
    pub rule_counts: BTreeMap<ClassLabel, usize>,
    pub baseline: f64,
    pub runs: Vec<ClusterRun>,
}

impl ExperimentReport {
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Run with the best accuracy for `criterion`, earliest on ties.
    pub fn best_run(&self, criterion: Criterion) -> Option<&ClusterRun> {
        let value = |run: &ClusterRun| match criterion {
            Criterion::InfoGain => run.info_gain,
            Criterion::Statistical => run.statistical,
        };

        let mut best: Option<(&ClusterRun, f64)> = None;
        for run in &self.runs {
            if let Some(acc) = value(run) {
                if best.map_or(true, |(_, top)| acc > top) {
                    best = Some((run, acc));
                }
            }
        }
        best.map(|(run, _)| run)
    }
}

pub fn results_path(config: &Config, prefix: &str) -> PathBuf {
    config.data_file(&format!("{}-results.json", prefix))
}

pub struct Experiment<'a> {
    settings: &'a ExperimentSettings,
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Experiment<'a> {
    pub fn new(settings: &'a ExperimentSettings, diagnostics: &'a dyn Diagnostics) -> Self {
        Self {
            settings,
            diagnostics,
        }
    }

    fn clusterer(&self) -> KMeans {
        KMeans {
            max_iterations: self.settings.max_iterations,
            tolerance: self.settings.tolerance,
            seed: self.settings.seed,
        }
    }

    /// Cluster counts to try: from `min_clusters` up to the smallest
    /// per-class rule count, optionally capped. Empty if no class has
    /// enough rules.
    pub fn cluster_counts(&self, rules: &RuleCollection) -> Vec<usize> {
        let smallest = rules.values().map(Vec::len).min().unwrap_or(0);
        let upper = match self.settings.max_clusters {
            Some(cap) => smallest.min(cap),
            None => smallest,
        };
        (self.settings.min_clusters..=upper).collect()
    }

    /// Runs every method. `on_run` is called after each cluster count.
    pub fn run(
        &self,
        dataset: &str,
        target: &str,
        inputs: &ExperimentInputs,
        mut on_run: impl FnMut(&ClusterRun),
    ) -> Result<ExperimentReport> {
        check_test_width(&inputs.train, &inputs.test)?;
        let normalized = Normalizer::new(self.diagnostics).normalize(&inputs.rules, &inputs.train)?;
        let (test_rows, test_labels) = inputs.test.to_rows();

        let baseline = self
            .evaluate("baseline", &normalized.rules, &test_rows, &test_labels)
            .unwrap_or(0.0);
        self.diagnostics.info(&format!("baseline accuracy: {:.4}", baseline));

        let counts = self.cluster_counts(&normalized.rules);
        if counts.is_empty() {
            self.diagnostics.warn(&format!(
                "no cluster count to try: a class has fewer than {} rules",
                self.settings.min_clusters
            ));
        }

        let mut runs = Vec::with_capacity(counts.len());
        for k in counts {
            let run = self.run_k(k, &normalized, &inputs.train, &test_rows, &test_labels)?;
            on_run(&run);
            runs.push(run);
        }

        Ok(ExperimentReport {
            dataset: dataset.to_string(),
            target: target.to_string(),
            n_features: inputs.train.n_features,
            n_train: inputs.train.n_examples(),
            n_test: inputs.test.n_examples(),
            rule_counts: inputs.rules.iter().map(|(&l, r)| (l, r.len())).collect(),
            baseline,
            runs,
        })
    }

    fn run_k(
        &self,
        k: usize,
        normalized: &NormalizedRules,
        train: &LabeledDataset,
        test_rows: &[Vec<f64>],
        test_labels: &[ClassLabel],
    ) -> Result<ClusterRun> {
        let bounds = self.bound_centers(k, &normalized.rules)?;
        let info_gain = self.restored(k, Criterion::InfoGain, normalized, train)?;
        let statistical = self.restored(k, Criterion::Statistical, normalized, train)?;

        let run = ClusterRun {
            k,
            bounds: self.evaluate("bounds", &bounds, test_rows, test_labels),
            info_gain: self.evaluate(Criterion::InfoGain.as_str(), &info_gain, test_rows, test_labels),
            statistical: self.evaluate(Criterion::Statistical.as_str(), &statistical, test_rows, test_labels),
        };
        self.diagnostics.info(&format!(
            "k = {}: bounds {:?}, info-gain {:?}, statistical {:?}",
            k, run.bounds, run.info_gain, run.statistical
        ));
        Ok(run)
    }

    /// Clusters each class's rules as flat `[lo, hi, lo, hi, ...]` vectors and
    /// uses the centres as rules.
    fn bound_centers(&self, k: usize, rules: &RuleCollection) -> Result<RuleCollection> {
        let kmeans = self.clusterer();
        let mut out = RuleCollection::new();
        for (&label, class_rules) in rules {
            let flat: Vec<Vec<f64>> = class_rules.iter().map(IntervalRule::to_flat).collect();
            let centers = kmeans.cluster(&flat, k)?;
            let restored = centers
                .iter()
                .filter_map(|c| IntervalRule::from_flat(c))
                .collect();
            out.insert(label, restored);
        }
        Ok(out)
    }

    fn restored(
        &self,
        k: usize,
        criterion: Criterion,
        normalized: &NormalizedRules,
        train: &LabeledDataset,
    ) -> Result<RuleCollection> {
        let kmeans = self.clusterer();
        let (rows, labels) = train.to_rows();
        let mut out = RuleCollection::new();

        for (&label, acceptance) in &normalized.acceptance {
            let mut restorer = RuleRestorer::new(label, k, criterion, &kmeans, self.diagnostics);
            restorer.fit(acceptance)?;
            out.insert(label, restorer.restore(&rows, &labels)?);
        }
        Ok(out)
    }

    fn evaluate(
        &self,
        method: &str,
        rules: &RuleCollection,
        rows: &[Vec<f64>],
        labels: &[ClassLabel],
    ) -> Option<f64> {
        match VotingClassifier::new(rules.clone()) {
            Ok(classifier) => Some(accuracy(&classifier.predict(rows), labels)),
            Err(e) => {
                self.diagnostics
                    .warn(&format!("{}: no accuracy, {}", method, e));
                None
            }
        }
    }
}

/// Test examples must have the training width, or voting would compare
/// rules against vectors of the wrong length.
fn check_test_width(train: &LabeledDataset, test: &LabeledDataset) -> Result<()> {
    if test.n_features != train.n_features {
        return Err(LrulesError::SchemaMismatch(format!(
            "test data has {} features, training data has {}",
            test.n_features, train.n_features
        )));
    }
    if let Some((label, x)) = test.examples().find(|(_, x)| x.len() != train.n_features) {
        return Err(LrulesError::SchemaMismatch(format!(
            "test example of class {} has {} features, expected {}",
            label,
            x.len(),
            train.n_features
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_tab;
    use crate::diagnostics::MemoryDiagnostics;

    fn inputs() -> ExperimentInputs {
        let train = parse_tab(
            "1 2 0 4 8 -1\n0\n1\n2\n3\n\n10\n11\n12\n13\n\n",
        )
        .unwrap();
        let test = parse_tab("1 2 0 2 4 -1\n1.5\n2.5\n\n10.5\n12.5\n\n").unwrap();

        let mut rules = RuleCollection::new();
        rules.insert(
            1,
            vec![
                IntervalRule::new(vec![(f64::NEG_INFINITY, 2.0)]),
                IntervalRule::new(vec![(1.0, 3.0)]),
                IntervalRule::new(vec![(0.0, 1.0)]),
            ],
        );
        rules.insert(
            2,
            vec![
                IntervalRule::new(vec![(10.0, f64::INFINITY)]),
                IntervalRule::new(vec![(11.0, 12.0)]),
            ],
        );
        ExperimentInputs { rules, train, test }
    }

    #[test]
    fn cluster_counts_follow_the_smallest_class() {
        let sink = MemoryDiagnostics::new();
        let mut settings = ExperimentSettings::default();
        let rules = inputs().rules;

        assert_eq!(Experiment::new(&settings, &sink).cluster_counts(&rules), vec![2]);

        settings.min_clusters = 1;
        assert_eq!(Experiment::new(&settings, &sink).cluster_counts(&rules), vec![1, 2]);

        settings.max_clusters = Some(1);
        assert_eq!(Experiment::new(&settings, &sink).cluster_counts(&rules), vec![1]);
    }

    #[test]
    fn separable_data_is_classified_perfectly() {
        let sink = MemoryDiagnostics::new();
        let settings = ExperimentSettings {
            min_clusters: 1,
            ..Default::default()
        };
        let experiment = Experiment::new(&settings, &sink);

        let mut seen = Vec::new();
        let report = experiment
            .run("toy", "class", &inputs(), |run| seen.push(run.k))
            .unwrap();

        assert_eq!(seen, vec![1, 2]);
        assert_eq!(report.baseline, 1.0);
        assert_eq!(report.n_train, 8);
        assert_eq!(report.n_test, 4);
        assert_eq!(report.rule_counts[&1], 3);
        assert_eq!(report.runs[0].bounds, Some(1.0));
        assert!(report.runs.iter().all(|run| run.info_gain.is_some()));
    }

    #[test]
    fn report_is_written_as_json() {
        let sink = MemoryDiagnostics::new();
        let settings = ExperimentSettings::default();
        let report = Experiment::new(&settings, &sink)
            .run("toy", "class", &inputs(), |_| {})
            .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("toy-results.json");
        report.write_json(&path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["dataset"], "toy");
        assert_eq!(value["runs"][0]["k"], 2);
    }

    #[test]
    fn test_width_must_match_training_width() {
        let sink = MemoryDiagnostics::new();
        let settings = ExperimentSettings::default();
        let mut inputs = inputs();
        inputs.test = parse_tab("2 2 0 1 2 -1\n1.5 0\n\n10.5 0\n\n").unwrap();

        let result = Experiment::new(&settings, &sink).run("toy", "class", &inputs, |_| {});
        assert!(matches!(result, Err(LrulesError::SchemaMismatch(_))));
    }

    #[test]
    fn ragged_test_rows_are_rejected() {
        let sink = MemoryDiagnostics::new();
        let settings = ExperimentSettings::default();
        let mut inputs = inputs();
        inputs.test.classes.insert(2, vec![vec![10.5, 3.0]]);

        let result = Experiment::new(&settings, &sink).run("toy", "class", &inputs, |_| {});
        assert!(matches!(result, Err(LrulesError::SchemaMismatch(_))));
    }

    #[test]
    fn best_run_skips_missing_accuracies() {
        let report = ExperimentReport {
            dataset: "toy".into(),
            target: "class".into(),
            n_features: 1,
            n_train: 0,
            n_test: 0,
            rule_counts: BTreeMap::new(),
            baseline: 0.5,
            runs: vec![
                ClusterRun { k: 2, bounds: None, info_gain: None, statistical: Some(0.7) },
                ClusterRun { k: 3, bounds: None, info_gain: Some(0.6), statistical: Some(0.7) },
            ],
        };

        assert_eq!(report.best_run(Criterion::InfoGain).map(|r| r.k), Some(3));
        assert_eq!(report.best_run(Criterion::Statistical).map(|r| r.k), Some(2));
    }
}
