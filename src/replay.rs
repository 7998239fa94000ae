//! CSV replay pipeline
//!
//! Replays a file of ledger commands and writes a report of the resulting
//! state.
//!
//! # Design
//!
//! [`replay`] only orchestrates, delegating:
//! - CSV parsing and validation to [`CommandReader`] (iterator interface)
//! - Command processing to [`LedgerEngine`]
//! - Report output to [`write_balances_csv`] / [`write_history_csv`]
//!
//! Rows are streamed one at a time, so memory use is O(accounts + history)
//! rather than O(file size).
//!
//! # Error Handling
//!
//! Fatal errors (file not found, I/O errors, unreadable CSV) abort the run.
//! A row rejected by the validator or the ledger is logged with its line
//! number and error code and processing continues.

use crate::cli::ReportKind;
use crate::core::LedgerEngine;
use crate::io::{write_balances_csv, write_history_csv, CommandReader};
use crate::types::{AccountSnapshot, ReplayError};
use std::io::Write;
use std::path::Path;

/// Counts of what happened during a replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Rows applied to the ledger
    pub applied: usize,
    /// Rows rejected by validation or by the ledger
    pub rejected: usize,
}

/// Replay a command file and write a report
///
/// # Arguments
///
/// * `input_path` - Path to the input CSV file
/// * `output` - Writer receiving the report
/// * `report` - Which report to produce
///
/// # Returns
///
/// * `Ok(ReplaySummary)` if the whole file was processed
/// * `Err(ReplayError)` if a fatal error occurred
pub fn replay(
    input_path: &Path,
    output: &mut dyn Write,
    report: ReportKind,
) -> Result<ReplaySummary, ReplayError> {
    let mut engine = LedgerEngine::new();
    let mut summary = ReplaySummary::default();

    let reader = CommandReader::from_path(input_path)?;

    for row in reader {
        let row = row?;
        let outcome = row
            .command
            .and_then(|command| engine.process(command));

        match outcome {
            Ok(()) => summary.applied += 1,
            Err(error) => {
                summary.rejected += 1;
                tracing::warn!(
                    line = row.line,
                    code = error.error_code(),
                    kind = %error.kind(),
                    "row rejected: {}",
                    error.message()
                );
            }
        }
    }

    tracing::info!(
        applied = summary.applied,
        rejected = summary.rejected,
        accounts = engine.get_accounts().len(),
        "replay finished"
    );

    let accounts = engine.get_accounts();
    match report {
        ReportKind::Balances => {
            let snapshots: Vec<AccountSnapshot> =
                accounts.iter().map(|account| account.snapshot()).collect();
            write_balances_csv(&snapshots, output)?;
        }
        ReportKind::History => write_history_csv(&accounts, output)?,
    }

    Ok(summary)
}
