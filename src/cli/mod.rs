// CLI module
// Command-line interface, argument parsing and log setup

mod args;

pub use args::{CliArgs, LogFormat, ReportKind};

use clap::Parser;
use tracing_subscriber::EnvFilter;

/// Parse command-line arguments using clap
///
/// If parsing fails (invalid arguments, missing input file, or `--help`),
/// clap displays an error message or help text and exits the process.
pub fn parse_args() -> CliArgs {
    CliArgs::parse()
}

/// Install the global tracing subscriber
///
/// Logs go to stderr so stdout carries only the report. The level filter is
/// read from `RUST_LOG` and defaults to `info`.
///
/// Returns `false` if a global subscriber was already installed; that one
/// stays in place and keeps receiving events.
pub fn init_tracing(format: LogFormat) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    match installed {
        Ok(()) => true,
        Err(error) => {
            tracing::debug!(%error, ?format, "tracing subscriber already installed, keeping it");
            false
        }
    }
}
