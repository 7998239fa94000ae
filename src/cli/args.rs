use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Replay ledger commands from a CSV file and report the resulting state
#[derive(Parser, Debug)]
#[command(name = "ledger-engine")]
#[command(about = "Replay ledger commands and report balances or history", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing ledger commands
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Report written to stdout once the replay finishes
    #[arg(
        long = "report",
        value_name = "REPORT",
        default_value = "balances",
        help = "Report to print: 'balances' for final balances or 'history' for every transaction record"
    )]
    pub report: ReportKind,

    /// Format of the log lines written to stderr
    #[arg(
        long = "log-format",
        value_name = "FORMAT",
        default_value = "text",
        help = "Log format: 'text' for human-readable or 'json' for structured logs (level via RUST_LOG)"
    )]
    pub log_format: LogFormat,
}

/// Available reports
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportKind {
    Balances,
    History,
}

/// Available log formats
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}
