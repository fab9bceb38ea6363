use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use lrules_lib::data::read_tab;
use lrules_lib::util::format_score;
use lrules_lib::{rule_stats, BoundDelimiter, LogDiagnostics, Normalizer, ReportLayout, Result};
use std::path::Path;

pub fn handle_stats_command(
    tabfile: &Path,
    report: &Path,
    layout: ReportLayout,
    delimiter: Option<BoundDelimiter>,
) -> Result<()> {
    let diagnostics = LogDiagnostics::new("lrules::stats");
    let data = read_tab(tabfile)?;
    let parsed = super::parse::load_report(report, layout, delimiter, &diagnostics)?;
    let normalized = Normalizer::new(&diagnostics).normalize(&parsed.rules, &data)?;

    println!(
        "{} Scoring {} rules against {} examples",
        style(">>>").cyan(),
        style(normalized.rules.values().map(Vec::len).sum::<usize>()).bold(),
        style(data.n_examples()).bold()
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("Class").fg(Color::Cyan),
        Cell::new("#").fg(Color::Cyan),
        Cell::new("Accepted / rejected").fg(Color::Cyan),
        Cell::new("Info gain").fg(Color::Cyan),
        Cell::new("Statistical").fg(Color::Cyan),
    ]);

    for score in rule_stats(&normalized.rules, &data) {
        let split = score
            .table
            .counts
            .iter()
            .map(|(a, r)| format!("{}/{}", a, r))
            .collect::<Vec<_>>()
            .join(" ");

        table.add_row(vec![
            Cell::new(score.class),
            Cell::new(score.index + 1),
            Cell::new(split),
            Cell::new(format_score(score.info_gain)),
            Cell::new(format_score(score.statistical)),
        ]);
    }

    println!("{}", table);
    Ok(())
}
