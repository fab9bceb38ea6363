//! Reader and writer for the whitespace-separated `.tab` data format.
//!
//! The first line holds the feature count, the class count, the cumulative
//! per-class example counts (class count plus one values, starting at 0) and
//! the hole value. Feature vectors follow, grouped by class in ascending label
//! order, each class block terminated by a blank line.

use super::LabeledDataset;
use crate::error::{LrulesError, Result};
use std::path::Path;

/// Parses a dataset from a file.
pub fn read_tab<P: AsRef<Path>>(path: P) -> Result<LabeledDataset> {
    let content = std::fs::read_to_string(path)?;
    parse_tab(&content)
}

/// Parses a dataset from `.tab` text.
pub fn parse_tab(content: &str) -> Result<LabeledDataset> {
    let mut lines = content.lines();
    let header_line = lines
        .next()
        .ok_or_else(|| LrulesError::Dataset("empty file".to_string()))?;
    let header: Vec<&str> = header_line.split_whitespace().collect();
    if header.len() < 4 {
        return Err(LrulesError::Dataset(format!(
            "header too short: '{}'",
            header_line.trim()
        )));
    }

    let n_features = parse_count(header[0], "feature count")?;
    let n_classes = parse_count(header[1], "class count")?;
    let expected_fields = n_classes
        .checked_add(4)
        .ok_or_else(|| LrulesError::Dataset(format!("class count {} is too large", n_classes)))?;
    if header.len() != expected_fields {
        return Err(LrulesError::Dataset(format!(
            "header has {} fields, expected {} for {} classes",
            header.len(),
            expected_fields,
            n_classes
        )));
    }

    let cumulative = header[2..header.len() - 1]
        .iter()
        .map(|field| parse_count(field, "cumulative count"))
        .collect::<Result<Vec<_>>>()?;
    if cumulative[0] != 0 || cumulative.windows(2).any(|w| w[1] < w[0]) {
        return Err(LrulesError::Dataset(format!(
            "cumulative counts must start at 0 and never decrease: {:?}",
            cumulative
        )));
    }

    let hole_field = header[header.len() - 1];
    let hole: f64 = hole_field
        .parse()
        .map_err(|_| LrulesError::Dataset(format!("invalid hole value '{}'", hole_field)))?;

    let data_rows: Vec<&str> = lines.filter(|line| !line.trim().is_empty()).collect();
    let total = cumulative.last().copied().unwrap_or(0);
    if total > data_rows.len() {
        return Err(LrulesError::Dataset(format!(
            "header promises {} rows, file has {}",
            total,
            data_rows.len()
        )));
    }

    let mut dataset = LabeledDataset::new(n_features, hole);
    let mut rows = data_rows.into_iter();

    for class in 0..n_classes {
        let label = class + 1;
        let count = cumulative[class + 1] - cumulative[class];
        let mut examples = Vec::new();

        for _ in 0..count {
            let line = rows.next().ok_or_else(|| {
                LrulesError::Dataset(format!("class {} ends early, expected {} rows", label, count))
            })?;
            let x = parse_row(line)?;
            if x.len() != n_features {
                return Err(LrulesError::Dataset(format!(
                    "class {}: row has {} features, expected {}",
                    label,
                    x.len(),
                    n_features
                )));
            }
            examples.push(x);
        }

        dataset.classes.insert(label, examples);
    }

    if let Some(extra) = rows.next() {
        return Err(LrulesError::Dataset(format!(
            "unexpected row after last class: '{}'",
            extra.trim()
        )));
    }

    Ok(dataset)
}

/// Renders a dataset in `.tab` format.
pub fn to_tab_string(dataset: &LabeledDataset) -> String {
    let counts: Vec<String> = dataset
        .cumulative_counts()
        .iter()
        .map(|c| c.to_string())
        .collect();

    let mut out = String::new();
    out.push_str(&format!(
        "{} {} {} {}\n",
        dataset.n_features,
        dataset.n_classes(),
        counts.join(" "),
        dataset.hole
    ));

    for rows in dataset.classes.values() {
        for x in rows {
            let fields: Vec<String> = x.iter().map(|v| v.to_string()).collect();
            out.push_str(&fields.join(" "));
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

/// Writes a dataset to a file in `.tab` format.
pub fn write_tab<P: AsRef<Path>>(path: P, dataset: &LabeledDataset) -> Result<()> {
    std::fs::write(path, to_tab_string(dataset))?;
    Ok(())
}

fn parse_count(field: &str, what: &str) -> Result<usize> {
    field
        .parse()
        .map_err(|_| LrulesError::Dataset(format!("invalid {} '{}'", what, field)))
}

fn parse_row(line: &str) -> Result<Vec<f64>> {
    line.split_whitespace()
        .map(|field| {
            field
                .parse::<f64>()
                .map_err(|_| LrulesError::Dataset(format!("invalid feature value '{}'", field)))
        })
        .collect()
}
