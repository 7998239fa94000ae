//! CSV format handling for command rows and reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - CommandRow structure for deserialization
//! - Conversion from CSV rows to validated [`LedgerCommand`]s
//! - Balances and history report serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::core::validator::{
    validate_account_id, validate_amount, validate_opening_balance, validate_owner_name,
};
use crate::core::Account;
use crate::types::{AccountSnapshot, LedgerCommand, LedgerError, ReplayError};
use csv::Writer;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;

/// CSV row structure for deserialization
///
/// Matches the input CSV format with columns: op, account, target, amount, owner.
/// Which of the optional columns are required depends on `op`:
/// - `open`: `account`, `owner`, optional `amount` (opening balance, default 0)
/// - `deposit` / `withdraw`: `account`, `amount`
/// - `transfer`: `account` (source), `target`, `amount`
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct CommandRow {
    pub op: String,
    pub account: Option<String>,
    pub target: Option<String>,
    pub amount: Option<String>,
    pub owner: Option<String>,
}

/// Treat empty or whitespace-only columns as absent
fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn required<'a>(
    field: &'a Option<String>,
    name: &str,
    operation: &str,
) -> Result<&'a str, LedgerError> {
    present(field).ok_or_else(|| LedgerError::missing_field(name, operation))
}

/// Convert a CommandRow to a LedgerCommand
///
/// This function:
/// - Parses the `op` column (case insensitive)
/// - Checks the columns that operation requires are present
/// - Runs every field through the validator
///
/// # Arguments
///
/// * `row` - The deserialized CSV row
///
/// # Returns
///
/// * `Ok(LedgerCommand)` - Fully validated command
/// * `Err(LedgerError)` - The first validation failure
///
/// # Errors
///
/// - `UnknownOperation` (E002) for an unrecognised `op`
/// - `MissingField` (E004) when a required column is empty
/// - Any validator error for the fields themselves
pub fn convert_command_row(row: &CommandRow) -> Result<LedgerCommand, LedgerError> {
    let op = row.op.trim().to_lowercase();

    match op.as_str() {
        "open" => {
            let account = validate_account_id(required(&row.account, "account", "open")?)?;
            let owner = validate_owner_name(row.owner.as_deref().unwrap_or_default())?;
            let opening_balance = match present(&row.amount) {
                Some(raw) => validate_opening_balance(raw)?,
                None => Decimal::ZERO,
            };
            Ok(LedgerCommand::Open {
                account,
                owner,
                opening_balance,
            })
        }
        "deposit" | "withdraw" => {
            let account = validate_account_id(required(&row.account, "account", &op)?)?;
            let amount = validate_amount(required(&row.amount, "amount", &op)?)?;
            if op == "deposit" {
                Ok(LedgerCommand::Deposit { account, amount })
            } else {
                Ok(LedgerCommand::Withdraw { account, amount })
            }
        }
        "transfer" => {
            let from = validate_account_id(required(&row.account, "account", "transfer")?)?;
            let to = validate_account_id(required(&row.target, "target", "transfer")?)?;
            let amount = validate_amount(required(&row.amount, "amount", "transfer")?)?;
            Ok(LedgerCommand::Transfer { from, to, amount })
        }
        _ => Err(LedgerError::unknown_operation(row.op.trim())),
    }
}

/// Write account balances to CSV format
///
/// Writes accounts with columns: account, owner, balance.
/// Accounts are sorted by id for deterministic output and balances are
/// printed with four decimal places.
///
/// # Arguments
///
/// * `accounts` - Snapshots of the accounts to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Errors
///
/// Returns `ReplayError` if writing or flushing fails.
pub fn write_balances_csv(
    accounts: &[AccountSnapshot],
    output: &mut dyn Write,
) -> Result<(), ReplayError> {
    let mut writer = Writer::from_writer(output);

    writer.write_record(["account", "owner", "balance"])?;

    let mut sorted: Vec<&AccountSnapshot> = accounts.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    for account in sorted {
        writer.write_record(&[
            account.id.to_string(),
            account.owner.clone(),
            format!("{:.4}", account.balance),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write every account's transaction history to CSV format
///
/// One row per record with columns: account, sequence, operation, amount,
/// status, compensated, error_code. Accounts are written in the order given,
/// records in history order. `error_code` is empty for completed records.
///
/// # Errors
///
/// Returns `ReplayError` if writing or flushing fails.
pub fn write_history_csv(accounts: &[&Account], output: &mut dyn Write) -> Result<(), ReplayError> {
    let mut writer = Writer::from_writer(output);

    writer.write_record([
        "account",
        "sequence",
        "operation",
        "amount",
        "status",
        "compensated",
        "error_code",
    ])?;

    for account in accounts {
        for record in account.history() {
            writer.write_record(&[
                account.id().to_string(),
                record.sequence().to_string(),
                record.kind().to_string(),
                format!("{:.4}", record.amount()),
                record.status().as_str().to_string(),
                record.is_compensated().to_string(),
                record
                    .error()
                    .map(|error| error.error_code().to_string())
                    .unwrap_or_default(),
            ])?;
        }
    }

    writer.flush()?;
    Ok(())
}
