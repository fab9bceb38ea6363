use crate::error::{LrulesError, Result};
use crate::rule::IntervalRule;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Comparison operator used between bounds and the feature in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundDelimiter {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
}

impl BoundDelimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundDelimiter::Lt => "<",
            BoundDelimiter::Le => "<=",
            BoundDelimiter::Gt => ">",
            BoundDelimiter::Ge => ">=",
        }
    }

    /// `>`-style expressions read `hi > X > lo`.
    fn is_descending(&self) -> bool {
        matches!(self, BoundDelimiter::Gt | BoundDelimiter::Ge)
    }
}

impl fmt::Display for BoundDelimiter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundDelimiter {
    type Err = LrulesError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "<" => Ok(BoundDelimiter::Lt),
            "<=" => Ok(BoundDelimiter::Le),
            ">" => Ok(BoundDelimiter::Gt),
            ">=" => Ok(BoundDelimiter::Ge),
            other => Err(LrulesError::Config(format!(
                "Invalid bound delimiter '{}' (valid: <, <=, >, >=)",
                other
            ))),
        }
    }
}

/// Recovers interval rules from textual conjunctions such as
/// `1.0 <= X2 <= 5.0 X4 <= -3`.
#[derive(Debug, Clone)]
pub struct BoundParser {
    pattern: Regex,
    delimiter: BoundDelimiter,
}

impl BoundParser {
    pub fn new(feature_letter: &str, delimiter: BoundDelimiter) -> Result<Self> {
        let number = r"[+-]?\d+(?:\.\d+)?";
        let delim = format!(r"\s*{}\s*", regex::escape(delimiter.as_str()));
        let source = format!(
            r"(?:(?P<left>{number}){delim})?{letter}(?P<index>\d*)(?:{delim}(?P<right>{number}))?",
            number = number,
            delim = delim,
            letter = regex::escape(feature_letter),
        );
        let pattern = Regex::new(&source)
            .map_err(|e| LrulesError::Config(format!("Invalid bound pattern: {}", e)))?;

        Ok(Self { pattern, delimiter })
    }

    pub fn delimiter(&self) -> BoundDelimiter {
        self.delimiter
    }

    /// Builds a rule of exactly `n_features` bound pairs from `text`.
    ///
    /// Features must appear in increasing index order; features that do not
    /// appear at all, and the missing side of a one-sided bound, are open.
    pub fn parse_rule(&self, text: &str, n_features: usize) -> Result<IntervalRule> {
        let mut rule = IntervalRule::unbounded(n_features);
        let mut last_index = 0usize;

        for caps in self.pattern.captures_iter(text) {
            let expression = caps.get(0).map_or("", |m| m.as_str());
            let index_text = caps.name("index").map_or("", |m| m.as_str());
            let index: usize = index_text.parse().map_err(|_| {
                LrulesError::Parse(format!("no feature index in '{}'", expression))
            })?;

            if index == 0 || index > n_features {
                return Err(LrulesError::Parse(format!(
                    "feature index {} out of range 1..={} in '{}'",
                    index, n_features, expression
                )));
            }
            if index <= last_index {
                return Err(LrulesError::Parse(format!(
                    "feature index {} follows {} in '{}'",
                    index, last_index, expression
                )));
            }

            let left = parse_number(caps.name("left").map(|m| m.as_str()))?;
            let right = parse_number(caps.name("right").map(|m| m.as_str()))?;
            let (lower, upper) = if self.delimiter.is_descending() {
                (right, left)
            } else {
                (left, right)
            };

            let bound = match (lower, upper) {
                (Some(lo), Some(hi)) => (lo, hi),
                (None, Some(hi)) => (f64::NEG_INFINITY, hi),
                (Some(lo), None) => (lo, f64::INFINITY),
                (None, None) => {
                    return Err(LrulesError::Parse(format!(
                        "'{}' is neither a lower nor an upper bound",
                        expression
                    )))
                }
            };

            rule.bounds_mut()[index - 1] = bound;
            last_index = index;
        }

        Ok(rule)
    }
}

fn parse_number(text: Option<&str>) -> Result<Option<f64>> {
    text.map(|t| {
        t.parse::<f64>()
            .map_err(|_| LrulesError::Parse(format!("invalid bound value '{}'", t)))
    })
    .transpose()
}
