use crate::error::{LrulesError, Result};
use crate::rule::{ClassLabel, RuleCollection};
use std::collections::BTreeMap;

/// Predicts the class whose rules accept an example most often, relative to
/// how many rules the class has.
#[derive(Debug, Clone)]
pub struct VotingClassifier {
    rules: RuleCollection,
    labels: Vec<ClassLabel>,
}

impl VotingClassifier {
    /// Fails if the collection is empty or some class has no rules.
    pub fn new(rules: RuleCollection) -> Result<Self> {
        if rules.is_empty() {
            return Err(LrulesError::SchemaMismatch("no classes to vote for".to_string()));
        }
        if let Some((label, _)) = rules.iter().find(|(_, list)| list.is_empty()) {
            return Err(LrulesError::SchemaMismatch(format!("class {} has no rules", label)));
        }

        Ok(Self {
            rules,
            labels: Vec::new(),
        })
    }

    pub fn rules(&self) -> &RuleCollection {
        &self.rules
    }

    /// Fraction of each class's rules that accept `x`.
    pub fn vote_shares(&self, x: &[f64]) -> BTreeMap<ClassLabel, f64> {
        self.rules
            .iter()
            .map(|(&label, rules)| {
                let votes = rules.iter().filter(|rule| rule.accepts(x)).count();
                (label, votes as f64 / rules.len() as f64)
            })
            .collect()
    }

    /// Label with the highest vote share; on ties the lowest label wins.
    pub fn predict_one(&self, x: &[f64]) -> ClassLabel {
        let mut best: Option<(ClassLabel, f64)> = None;
        for (label, share) in self.vote_shares(x) {
            if best.map_or(true, |(_, top)| share > top) {
                best = Some((label, share));
            }
        }
        // new() guarantees at least one class
        best.map(|(label, _)| label).unwrap_or_default()
    }

    pub fn predict(&self, examples: &[Vec<f64>]) -> Vec<ClassLabel> {
        examples.iter().map(|x| self.predict_one(x)).collect()
    }

    /// Labels a batch of examples and keeps the labels as the latest
    /// prediction. Nothing is learned; the rules stay as given.
    pub fn fit(&mut self, examples: &[Vec<f64>]) -> &[ClassLabel] {
        self.labels = self.predict(examples);
        &self.labels
    }

    /// Labels from the most recent [`fit`](Self::fit).
    pub fn labels(&self) -> &[ClassLabel] {
        &self.labels
    }
}

/// Share of predictions equal to the truth; 0 for an empty batch.
pub fn accuracy(predicted: &[ClassLabel], truth: &[ClassLabel]) -> f64 {
    if truth.is_empty() {
        return 0.0;
    }
    let correct = predicted.iter().zip(truth).filter(|(p, t)| p == t).count();
    correct as f64 / truth.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::IntervalRule;

    fn rules() -> RuleCollection {
        let mut rules = RuleCollection::new();
        rules.insert(
            1,
            vec![
                IntervalRule::new(vec![(0.0, 5.0)]),
                IntervalRule::new(vec![(0.0, 2.0)]),
            ],
        );
        rules.insert(2, vec![IntervalRule::new(vec![(4.0, 10.0)])]);
        rules
    }

    #[test]
    fn shares_are_per_class_fractions() {
        let classifier = VotingClassifier::new(rules()).unwrap();
        let shares = classifier.vote_shares(&[4.5]);

        assert_eq!(shares[&1], 0.5);
        assert_eq!(shares[&2], 1.0);
    }

    #[test]
    fn predicts_highest_share() {
        let mut classifier = VotingClassifier::new(rules()).unwrap();
        let labels = classifier.fit(&[vec![1.0], vec![4.5], vec![8.0]]).to_vec();

        assert_eq!(labels, vec![1, 2, 2]);
        assert_eq!(classifier.labels(), &[1, 2, 2]);
    }

    #[test]
    fn ties_go_to_the_first_class() {
        let classifier = VotingClassifier::new(rules()).unwrap();
        assert_eq!(classifier.predict_one(&[20.0]), 1);

        let mut even = rules();
        even.insert(2, vec![IntervalRule::new(vec![(0.0, 1.0)]), IntervalRule::new(vec![(5.0, 6.0)])]);
        let classifier = VotingClassifier::new(even).unwrap();
        assert_eq!(classifier.predict_one(&[1.0]), 1);
    }

    #[test]
    fn empty_classes_are_rejected() {
        let mut rules = rules();
        rules.insert(3, Vec::new());
        assert!(VotingClassifier::new(rules).is_err());
        assert!(VotingClassifier::new(RuleCollection::new()).is_err());
    }

    #[test]
    fn accuracy_counts_matches() {
        assert_eq!(accuracy(&[1, 2, 2, 1], &[1, 2, 1, 1]), 0.75);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }
}
