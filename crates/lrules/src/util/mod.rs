pub mod format;
pub mod progress;

pub use format::{format_accuracy, format_rule_counts, format_score};
pub use progress::create_progress_bar;
