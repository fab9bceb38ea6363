mod cli;

use clap::Parser;
use lrules_lib::Result;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbose, cli.quiet);

    match cli.command {
        cli::Commands::Parse { report, layout, delimiter } => {
            cli::parse::handle_parse_command(&report, layout, delimiter)
        }

        cli::Commands::Stats { tabfile, report, layout, delimiter } => {
            cli::stats::handle_stats_command(&tabfile, &report, layout, delimiter)
        }

        cli::Commands::Split { tabfile, dataset, data_home, prefix, scale, folds } => {
            cli::split::handle_split_command(&tabfile, &dataset, data_home, prefix, scale, folds, cli.quiet)
        }

        cli::Commands::Experiment { dataset, data_home, prefix, target_name } => {
            cli::experiment::handle_experiment_command(
                &dataset,
                data_home,
                prefix,
                target_name,
                cli.config,
                cli.verbose,
                cli.quiet,
            )
        }
    }
}
