pub mod experiment;
pub mod parse;
pub mod split;
pub mod stats;

use clap::{Parser, Subcommand};
use env_logger::Env;
use lrules_lib::{BoundDelimiter, ReportLayout};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lrules")]
#[command(about = "Parse, score and compress interval classification rules", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Path to experiment settings (TOML)")]
    pub config: Option<PathBuf>,

    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count, help = "Increase log verbosity")]
    pub verbose: u8,

    #[arg(long, short = 'q', global = true, help = "Suppress non-error output")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Parse a rules report and print its rules")]
    Parse {
        #[arg(help = "Report file")]
        report: PathBuf,

        #[arg(long, value_enum, default_value = "rules", help = "Report layout")]
        layout: ReportLayout,

        #[arg(long, help = "Bound delimiter (<, <=, >, >=); defaults to the layout's")]
        delimiter: Option<BoundDelimiter>,
    },

    #[command(about = "Score every rule of a report against a dataset")]
    Stats {
        #[arg(help = "Dataset in tab format")]
        tabfile: PathBuf,

        #[arg(help = "Report file")]
        report: PathBuf,

        #[arg(long, value_enum, default_value = "rules", help = "Report layout")]
        layout: ReportLayout,

        #[arg(long, help = "Bound delimiter (<, <=, >, >=); defaults to the layout's")]
        delimiter: Option<BoundDelimiter>,
    },

    #[command(about = "Split a dataset into stratified train and test files")]
    Split {
        #[arg(help = "Dataset in tab format")]
        tabfile: PathBuf,

        #[arg(help = "Dataset name")]
        dataset: String,

        #[arg(long, help = "Directory the split files are written to")]
        data_home: Option<PathBuf>,

        #[arg(long, help = "Output file prefix (defaults to the dataset name)")]
        prefix: Option<String>,

        #[arg(long, help = "Standardise features before splitting")]
        scale: bool,

        #[arg(long, default_value_t = 2, help = "Number of folds; the last one is the test set")]
        folds: usize,
    },

    #[command(about = "Compare voting with all rules against clustered rule sets")]
    Experiment {
        #[arg(help = "Dataset name")]
        dataset: String,

        #[arg(long, help = "Directory holding reports and datasets")]
        data_home: Option<PathBuf>,

        #[arg(long, help = "Report and results file prefix (defaults to the dataset name)")]
        prefix: Option<String>,

        #[arg(long, help = "Target column name")]
        target_name: Option<String>,
    },
}

pub fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();
}
