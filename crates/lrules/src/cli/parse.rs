use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use lrules_lib::rule::rule_counts;
use lrules_lib::util::format_rule_counts;
use lrules_lib::{BoundDelimiter, LogDiagnostics, ParsedReport, ReportLayout, ReportParser, Result};
use std::path::Path;

pub fn load_report(
    report: &Path,
    layout: ReportLayout,
    delimiter: Option<BoundDelimiter>,
    diagnostics: &LogDiagnostics,
) -> Result<ParsedReport> {
    let delimiter = delimiter.unwrap_or_else(|| layout.default_delimiter());
    ReportParser::with_delimiter(layout, delimiter, diagnostics)?.parse_file(report)
}

pub fn handle_parse_command(
    report: &Path,
    layout: ReportLayout,
    delimiter: Option<BoundDelimiter>,
) -> Result<()> {
    let diagnostics = LogDiagnostics::new("lrules::report");
    let parsed = load_report(report, layout, delimiter, &diagnostics)?;

    println!(
        "{} {} features, {} classes",
        style(">>>").cyan(),
        style(parsed.header.n_features).bold(),
        style(parsed.header.n_classes).bold()
    );
    println!("  Rules: {}\n", format_rule_counts(&rule_counts(&parsed.rules)));

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Class").fg(Color::Cyan),
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Bounds").fg(Color::Cyan),
    ]);

    for (label, rules) in &parsed.rules {
        for (i, rule) in rules.iter().enumerate() {
            table.add_row(vec![Cell::new(label), Cell::new(i + 1), Cell::new(rule)]);
        }
    }

    println!("{}", table);
    Ok(())
}
