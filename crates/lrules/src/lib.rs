pub mod cluster;
pub mod config;
pub mod data;
pub mod diagnostics;
pub mod error;
pub mod experiment;
pub mod normalize;
pub mod report;
pub mod rule;
pub mod score;
pub mod util;
pub mod vote;

pub use cluster::{Clusterer, KMeans, RuleRestorer};
pub use config::{Config, ExperimentSettings};
pub use data::{LabeledDataset, Split};
pub use diagnostics::{Diagnostics, LogDiagnostics, MemoryDiagnostics};
pub use error::{LrulesError, Result};
pub use experiment::{ClusterRun, Experiment, ExperimentInputs, ExperimentReport};
pub use normalize::{check_schema, AcceptanceMatrix, NormalizedRules, Normalizer};
pub use report::{BoundDelimiter, ParsedReport, ReportHeader, ReportLayout, ReportParser};
pub use rule::{ClassLabel, IntervalRule, RuleCollection};
pub use score::{info_gain, rule_stats, stat_criterion, ContingencyTable, Criterion, RuleScore};
pub use vote::{accuracy, VotingClassifier};
