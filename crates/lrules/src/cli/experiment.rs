use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use console::style;
use lrules_lib::config::target_name;
use lrules_lib::experiment::results_path;
use lrules_lib::util::{create_progress_bar, format_accuracy};
use lrules_lib::{Config, Criterion, Experiment, ExperimentInputs, ExperimentReport, LogDiagnostics, Result};
use std::path::PathBuf;

pub fn handle_experiment_command(
    dataset: &str,
    data_home: Option<PathBuf>,
    prefix: Option<String>,
    target: Option<String>,
    settings_path: Option<PathBuf>,
    verbose: u8,
    quiet: bool,
) -> Result<()> {
    let config = Config::new(data_home)?;
    let settings = config.load_settings(settings_path.as_deref())?;
    let diagnostics = LogDiagnostics::new("lrules::experiment");
    let prefix = prefix.unwrap_or_else(|| dataset.to_string());
    let target = target_name(dataset, target.as_deref(), &diagnostics);

    if !quiet {
        println!(
            "{} Running experiment on {} (target {})",
            style(">>>").cyan(),
            style(dataset).bold(),
            target
        );
    }

    let inputs = ExperimentInputs::load(&config, dataset, &prefix, &settings, &diagnostics)?;
    let experiment = Experiment::new(&settings, &diagnostics);

    let pb = if verbose > 0 || quiet {
        None
    } else {
        let total = experiment.cluster_counts(&inputs.rules).len() as u64;
        Some(create_progress_bar(total, "Clustering rules"))
    };

    let report = experiment.run(dataset, &target, &inputs, |run| {
        if let Some(pb) = &pb {
            pb.set_message(format!("Clustering rules (k = {})", run.k));
            pb.inc(1);
        }
    })?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let output = results_path(&config, &prefix);
    report.write_json(&output)?;

    if !quiet {
        print_report(&report);
        println!("\n{} Results written to {}", style("✓").green(), output.display());
    }
    Ok(())
}

fn print_report(report: &ExperimentReport) {
    println!(
        "\n  Train: {}  Test: {}  Baseline accuracy: {}\n",
        style(report.n_train).bold(),
        style(report.n_test).bold(),
        style(format_accuracy(Some(report.baseline))).green()
    );

    if report.runs.is_empty() {
        println!("{}", style("No cluster counts were tried").yellow());
        return;
    }

    let best_ig = report.best_run(Criterion::InfoGain).map(|run| run.k);
    let best_stat = report.best_run(Criterion::Statistical).map(|run| run.k);
    let highlight = |text: String, best: bool| {
        if best {
            Cell::new(text).fg(Color::Green)
        } else {
            Cell::new(text)
        }
    };

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec![
        Cell::new("k").fg(Color::Cyan),
        Cell::new("Bounds").fg(Color::Cyan),
        Cell::new("Info gain").fg(Color::Cyan),
        Cell::new("Statistical").fg(Color::Cyan),
    ]);

    for run in &report.runs {
        table.add_row(vec![
            Cell::new(run.k),
            Cell::new(format_accuracy(run.bounds)),
            highlight(format_accuracy(run.info_gain), best_ig == Some(run.k)),
            highlight(format_accuracy(run.statistical), best_stat == Some(run.k)),
        ]);
    }

    println!("{}", table);
}
