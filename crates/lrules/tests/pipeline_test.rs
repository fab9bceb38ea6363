mod common;

use common::*;
use lrules_lib::cluster::{Clusterer, KMeans, RuleRestorer};
use lrules_lib::data::{parse_tab, read_tab};
use lrules_lib::report::BoundParser;
use lrules_lib::{
    BoundDelimiter, Criterion, IntervalRule, LrulesError, MemoryDiagnostics, Normalizer,
    ReportLayout, ReportParser, RuleCollection, VotingClassifier,
};

const INF: f64 = f64::INFINITY;

#[test]
fn test_tab_header_scenario() {
    let data = parse_tab("3 2 0 2 3 -1\n1.0 2.0 3.0\n4.0 5.0 6.0\n\n0.0 0.0 0.0\n\n").unwrap();

    assert_eq!(data.classes[&1].len(), 2);
    assert_eq!(data.classes[&2].len(), 1);
    assert_eq!(data.classes[&1][1], vec![4.0, 5.0, 6.0]);
}

#[test]
fn test_rule_text_to_normalized_rule() {
    let parser = BoundParser::new("X", BoundDelimiter::Le).unwrap();
    let rule = parser.parse_rule("1.0<=X2<=5.0", 3).unwrap();
    assert_eq!(rule.bounds(), &[(-INF, INF), (1.0, 5.0), (-INF, INF)]);

    let data = parse_tab("3 1 0 2 -1\n0 0 0\n10 10 10\n\n").unwrap();
    let mut rules = RuleCollection::new();
    rules.insert(1, vec![rule]);

    let sink = MemoryDiagnostics::new();
    let normalized = Normalizer::new(&sink).normalize(&rules, &data).unwrap();
    let closed = &normalized.rules[&1][0];

    assert_eq!(closed.bounds(), &[(0.0, 10.0), (1.0, 5.0), (0.0, 10.0)]);
    assert!(closed.accepts(&[2.0, 3.0, 4.0]));
    assert!(!closed.accepts(&[2.0, 11.0, 4.0]));
}

#[test]
fn test_report_file_to_votes() {
    let fixture = TestFixture::new().unwrap();
    let report = fixture.write("toy-lrules.html", toy_report().as_bytes()).unwrap();
    let train_path = fixture.write("toy-train.tab", TRAIN_TAB.as_bytes()).unwrap();

    let sink = MemoryDiagnostics::new();
    let parsed = ReportParser::new(ReportLayout::RulesTable, &sink)
        .unwrap()
        .parse_file(&report)
        .unwrap();
    assert_eq!(parsed.header.n_features, 2);
    assert_eq!(parsed.rules[&1].len(), 3);
    assert_eq!(parsed.rules[&2].len(), 2);

    let train = read_tab(&train_path).unwrap();
    let normalized = Normalizer::new(&sink).normalize(&parsed.rules, &train).unwrap();
    assert_eq!(normalized.global_min, vec![0.0, 1.0]);
    assert_eq!(normalized.global_max, vec![13.0, 7.0]);
    assert_eq!(normalized.rules[&2][1].bounds(), &[(0.0, 13.0), (1.0, 3.0)]);

    let test = parse_tab(TEST_TAB).unwrap();
    let (rows, labels) = test.to_rows();
    let mut classifier = VotingClassifier::new(normalized.rules).unwrap();
    assert_eq!(classifier.fit(&rows), labels.as_slice());
}

#[test]
fn test_windows_1251_report_is_decoded() {
    let markup = report_header(2, 1)
        + "<table><tr><td>Класс 1</td></tr>\
           <tr><td>1</td><td>0.9</td><td>0 &lt; x1 &lt; 4 x2 &lt; 8</td><td>4</td></tr>\
           </table>";
    let (bytes, _, had_errors) = encoding_rs::WINDOWS_1251.encode(&markup);
    assert!(!had_errors);

    let fixture = TestFixture::new().unwrap();
    let path = fixture.write("classes.html", &bytes).unwrap();

    let sink = MemoryDiagnostics::new();
    let parsed = ReportParser::new(ReportLayout::PerClass, &sink)
        .unwrap()
        .parse_file(&path)
        .unwrap();

    assert_eq!(parsed.rules[&1], vec![IntervalRule::new(vec![(0.0, 4.0), (-INF, 8.0)])]);
}

#[test]
fn test_report_errors_are_typed() {
    let sink = MemoryDiagnostics::new();
    let parser = ReportParser::new(ReportLayout::RulesTable, &sink).unwrap();

    assert!(matches!(
        parser.parse("<p>no header here</p>"),
        Err(LrulesError::MalformedHeader(_))
    ));

    let bad_index = rules_report(2, 1, &[(1, "X3 &lt;= 1")]);
    assert!(matches!(parser.parse(&bad_index), Err(LrulesError::Parse(_))));
}

#[test]
fn test_restored_rules_stay_inside_the_data_range() {
    let sink = MemoryDiagnostics::new();
    let parsed = ReportParser::new(ReportLayout::RulesTable, &sink)
        .unwrap()
        .parse(&toy_report())
        .unwrap();
    let train = parse_tab(TRAIN_TAB).unwrap();
    let normalized = Normalizer::new(&sink).normalize(&parsed.rules, &train).unwrap();
    let (rows, labels) = train.to_rows();

    let kmeans = KMeans::new(7);
    let mut restorer = RuleRestorer::new(1, 2, Criterion::InfoGain, &kmeans, &sink);
    restorer.fit(&normalized.acceptance[&1]).unwrap();
    assert_eq!(restorer.centers().map(<[Vec<f64>]>::len), Some(2));

    let restored = restorer.restore(&rows, &labels).unwrap();
    assert!(!restored.is_empty());
    for rule in &restored {
        assert_eq!(rule.len(), 2);
        for (f, &(lo, hi)) in rule.bounds().iter().enumerate() {
            assert!(lo <= hi);
            assert!(lo >= normalized.global_min[f] && hi <= normalized.global_max[f]);
        }
    }
}

#[test]
fn test_kmeans_rejects_too_many_clusters() {
    let rows = vec![vec![0.0, 1.0], vec![1.0, 0.0]];
    assert!(matches!(
        KMeans::default().cluster(&rows, 3),
        Err(LrulesError::Clustering(_))
    ));
}
