//! Ledger Engine CLI
//!
//! Command-line interface for replaying ledger commands from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- commands.csv > balances.csv
//! cargo run -- --report history commands.csv > history.csv
//! RUST_LOG=debug cargo run -- --log-format json commands.csv
//! ```
//!
//! The program reads commands from the input CSV file, applies them to an
//! in-memory ledger and writes the selected report to stdout. Rejected rows
//! are logged to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, file not readable, malformed CSV, etc.)

use rust_ledger_engine::cli;
use rust_ledger_engine::replay;
use std::process;

fn main() {
    let args = cli::parse_args();
    cli::init_tracing(args.log_format);

    let mut output = std::io::stdout();
    if let Err(e) = replay::replay(&args.input_file, &mut output, args.report) {
        tracing::error!(error = %e, "replay aborted");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
