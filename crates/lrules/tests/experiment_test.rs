mod common;

use common::*;
use lrules_lib::data::{parse_tab, read_tab, standardize, stratified_split, write_tab};
use lrules_lib::experiment::results_path;
use lrules_lib::{Config, Experiment, ExperimentInputs, ExperimentSettings, MemoryDiagnostics};

#[test]
fn test_experiment_from_data_home() {
    let fixture = TestFixture::with_experiment_files().unwrap();
    let config = Config::new(Some(fixture.data_home().to_path_buf())).unwrap();
    let settings = ExperimentSettings::default();
    let sink = MemoryDiagnostics::new();

    let inputs = ExperimentInputs::load(&config, DATASET, DATASET, &settings, &sink).unwrap();
    assert_eq!(inputs.rules.len(), 2);
    assert_eq!(inputs.test.n_examples(), 4);

    let mut seen = 0;
    let report = Experiment::new(&settings, &sink)
        .run(DATASET, "class", &inputs, |_| seen += 1)
        .unwrap();

    assert_eq!(report.baseline, 1.0);
    assert_eq!(seen, 1);
    assert_eq!(report.runs.len(), 1);
    assert_eq!(report.runs[0].k, 2);
    assert!(report.runs[0].bounds.is_some());
    assert!(report.runs[0].info_gain.is_some());
    assert!(report.runs[0].statistical.is_some());

    let output = results_path(&config, DATASET);
    report.write_json(&output).unwrap();
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(json["rule_counts"]["1"], 3);
    assert_eq!(json["baseline"], 1.0);
}

#[test]
fn test_missing_inputs_are_io_errors() {
    let fixture = TestFixture::new().unwrap();
    let config = Config::new(Some(fixture.data_home().to_path_buf())).unwrap();
    let sink = MemoryDiagnostics::new();

    let result = ExperimentInputs::load(&config, DATASET, DATASET, &ExperimentSettings::default(), &sink);
    assert!(matches!(result, Err(lrules_lib::LrulesError::Io(_))));
}

#[test]
fn test_too_few_rules_leaves_no_runs() {
    let fixture = TestFixture::with_experiment_files().unwrap();
    let config = Config::new(Some(fixture.data_home().to_path_buf())).unwrap();
    let settings = ExperimentSettings {
        min_clusters: 3,
        ..Default::default()
    };
    let sink = MemoryDiagnostics::new();

    let inputs = ExperimentInputs::load(&config, DATASET, DATASET, &settings, &sink).unwrap();
    let report = Experiment::new(&settings, &sink)
        .run(DATASET, "class", &inputs, |_| {})
        .unwrap();

    assert!(report.runs.is_empty());
    assert_eq!(sink.warnings().len(), 1);
}

#[test]
fn test_split_files_round_trip() {
    let fixture = TestFixture::new().unwrap();
    let data = standardize(&parse_tab(TRAIN_TAB).unwrap());
    let split = stratified_split(&data, 2, 1).unwrap();

    let train_path = fixture.path("toy-train.tab");
    let test_path = fixture.path("toy-test.tab");
    write_tab(&train_path, &split.train).unwrap();
    write_tab(&test_path, &split.test).unwrap();

    let train = read_tab(&train_path).unwrap();
    let test = read_tab(&test_path).unwrap();
    assert_eq!(train, split.train);
    assert_eq!(test.classes[&1].len(), 2);
    assert_eq!(test.classes[&2], data.classes[&2][2..].to_vec());
}
