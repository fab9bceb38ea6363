use crate::rule::ClassLabel;

/// Accuracy as a percentage, `n/a` when the method produced none.
pub fn format_accuracy(accuracy: Option<f64>) -> String {
    match accuracy {
        Some(value) => format!("{:.2}%", value * 100.0),
        None => "n/a".to_string(),
    }
}

/// Scores span many orders of magnitude (the statistical criterion is a
/// probability), so tiny values switch to exponent notation.
pub fn format_score(score: f64) -> String {
    if score != 0.0 && score.abs() < 1e-3 {
        format!("{:.3e}", score)
    } else {
        format!("{:.4}", score)
    }
}

pub fn format_rule_counts(counts: &[(ClassLabel, usize)]) -> String {
    counts
        .iter()
        .map(|(label, count)| format!("class {}: {}", label, count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_accuracy() {
        assert_eq!(format_accuracy(Some(1.0)), "100.00%");
        assert_eq!(format_accuracy(Some(0.5)), "50.00%");
        assert_eq!(format_accuracy(None), "n/a");
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(0.0), "0.0000");
        assert_eq!(format_score(0.3), "0.3000");
        assert_eq!(format_score(0.00012), "1.200e-4");
    }

    #[test]
    fn test_format_rule_counts() {
        assert_eq!(format_rule_counts(&[(1, 3), (2, 5)]), "class 1: 3, class 2: 5");
        assert_eq!(format_rule_counts(&[]), "");
    }
}
