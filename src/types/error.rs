//! Error types for the ledger engine
//!
//! This module defines the closed error taxonomy shared by the validator, the
//! account state machine and the transfer coordinator. Every error carries a
//! stable code, a human readable message and structured context.
//!
//! # Error Categories
//!
//! - **Invalid input** (`E002`-`E009`): malformed amounts, ids, names, unknown
//!   accounts or operations. Detected before any domain logic runs.
//! - **Invalid amount** (`E001`): well-formed but zero or negative amounts.
//! - **Insufficient funds** (`T001`): business rule failure during a debit.
//! - **Invariant violations** (`L001`-`L007`): logical errors that should be
//!   impossible if every operation is correct.
//!
//! File-level failures of the replay pipeline are not part of this taxonomy;
//! they live in [`ReplayError`].

use super::account::AccountId;
use super::transaction::OperationKind;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Coarse classification of a [`LedgerError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed input (syntax error)
    InvalidInput,
    /// Zero or negative amount
    InvalidAmount,
    /// Debit exceeds the current balance (runtime error)
    InsufficientFunds,
    /// A pre/post-condition or conservation check failed (logical error)
    InvariantViolation,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::InvalidAmount => "invalid_amount",
            ErrorKind::InsufficientFunds => "insufficient_funds",
            ErrorKind::InvariantViolation => "invariant_violation",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured key/value context attached to an error, in a stable order
pub type ErrorContext = Vec<(&'static str, String)>;

/// Main error type for the ledger core
///
/// Each variant renders as `[CODE] message`. Use [`LedgerError::error_code`]
/// for programmatic handling and [`LedgerError::context`] for the fields a
/// caller may want to display or log.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// Amount parsed but is zero or negative
    #[error("[E001] Invalid amount: {amount}. Amount must be positive.")]
    InvalidAmount {
        /// The rejected amount as supplied
        amount: String,
    },

    /// Replay operation name is not recognised
    #[error("[E002] Unknown operation '{operation}'. Expected open, deposit, withdraw or transfer.")]
    UnknownOperation {
        /// The operation string as supplied
        operation: String,
    },

    /// Amount could not be parsed as a decimal number
    #[error("[E003] Invalid amount format: '{raw}'. Must be a valid number.")]
    MalformedAmount {
        /// The raw input
        raw: String,
    },

    /// A field required by the operation was empty or absent
    #[error("[E004] Missing required field '{field}' for {operation}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Operation that requires it
        operation: String,
    },

    /// Account id does not match `^[A-Za-z0-9]{8,12}$`
    #[error("[E005] Invalid account ID format: '{raw}'. Must be 8-12 alphanumeric characters.")]
    MalformedAccountId {
        /// The raw input
        raw: String,
    },

    /// Owner name is empty or whitespace only
    #[error("[E006] Owner name cannot be empty")]
    EmptyOwnerName,

    /// No account is registered under this id
    #[error("[E007] Account {account} does not exist")]
    UnknownAccount {
        /// The id that was looked up
        account: AccountId,
    },

    /// An account is already registered under this id
    #[error("[E008] Account {account} already exists")]
    DuplicateAccount {
        /// The conflicting id
        account: AccountId,
    },

    /// Source and destination of a transfer are the same account
    #[error("[E009] Cannot transfer from account {account} to itself")]
    SelfTransfer {
        /// The account named on both sides
        account: AccountId,
    },

    /// Debit exceeds the current balance
    #[error(
        "[T001] Insufficient funds in account {account}. Attempted to withdraw {requested}, but balance is {balance} (short by {}).",
        shortfall(.requested, .balance)
    )]
    InsufficientFunds {
        /// Account that was debited
        account: AccountId,
        /// Requested debit
        requested: Decimal,
        /// Balance at the time of the request
        balance: Decimal,
    },

    /// Balance did not move by exactly the operation amount
    #[error(
        "[{}] Logical error in {operation} of {amount} on account {account}: balance went from {previous} to {actual}",
        drift_code(.operation)
    )]
    BalanceDrift {
        /// Account whose post-condition failed
        account: AccountId,
        /// Operation that was being applied
        operation: OperationKind,
        /// Balance before the operation
        previous: Decimal,
        /// Amount the balance had to move by
        amount: Decimal,
        /// Balance actually observed
        actual: Decimal,
    },

    /// Sum of balances changed across a transfer
    #[error("[L003] Logical error: money not conserved during transfer from {from} to {to} (before {before}, after {after})")]
    MoneyNotConserved {
        /// Source account
        from: AccountId,
        /// Destination account
        to: AccountId,
        /// Combined balance before the transfer
        before: Decimal,
        /// Combined balance after the transfer
        after: Decimal,
    },

    /// Decimal arithmetic would overflow
    #[error("[L004] Arithmetic overflow in {operation} for account {account}")]
    ArithmeticOverflow {
        /// Operation that would overflow
        operation: OperationKind,
        /// Account involved
        account: AccountId,
    },

    /// The inverse of a completed step could not be applied
    #[error("[L005] Compensation of {operation} of {amount} failed on account {account} with balance {balance}")]
    CompensationFailed {
        /// Account being compensated
        account: AccountId,
        /// Operation whose effect was being reversed
        operation: OperationKind,
        /// Amount to reverse
        amount: Decimal,
        /// Balance at the time of the attempt
        balance: Decimal,
    },

    /// A thread panicked while holding the account lock
    #[error("[L006] Lock for account {account} is poisoned")]
    LockPoisoned {
        /// Account whose lock is poisoned
        account: AccountId,
    },

    /// Balance does not reconcile with the transaction history
    #[error("[L007] Balance of account {account} is {balance} but its history accounts for {recorded}")]
    HistoryMismatch {
        /// Account that failed reconciliation
        account: AccountId,
        /// Balance derived from opening balance and history
        recorded: Decimal,
        /// Balance actually held
        balance: Decimal,
    },
}

fn shortfall(requested: &Decimal, balance: &Decimal) -> Decimal {
    *requested - *balance
}

fn drift_code(operation: &OperationKind) -> &'static str {
    if operation.is_credit() {
        "L001"
    } else {
        "L002"
    }
}

impl LedgerError {
    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::InvalidAmount { .. } => "E001",
            LedgerError::UnknownOperation { .. } => "E002",
            LedgerError::MalformedAmount { .. } => "E003",
            LedgerError::MissingField { .. } => "E004",
            LedgerError::MalformedAccountId { .. } => "E005",
            LedgerError::EmptyOwnerName => "E006",
            LedgerError::UnknownAccount { .. } => "E007",
            LedgerError::DuplicateAccount { .. } => "E008",
            LedgerError::SelfTransfer { .. } => "E009",
            LedgerError::InsufficientFunds { .. } => "T001",
            LedgerError::BalanceDrift { operation, .. } => drift_code(operation),
            LedgerError::MoneyNotConserved { .. } => "L003",
            LedgerError::ArithmeticOverflow { .. } => "L004",
            LedgerError::CompensationFailed { .. } => "L005",
            LedgerError::LockPoisoned { .. } => "L006",
            LedgerError::HistoryMismatch { .. } => "L007",
        }
    }

    /// Taxonomy bucket of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::InvalidAmount { .. } => ErrorKind::InvalidAmount,
            LedgerError::UnknownOperation { .. }
            | LedgerError::MalformedAmount { .. }
            | LedgerError::MissingField { .. }
            | LedgerError::MalformedAccountId { .. }
            | LedgerError::EmptyOwnerName
            | LedgerError::UnknownAccount { .. }
            | LedgerError::DuplicateAccount { .. }
            | LedgerError::SelfTransfer { .. } => ErrorKind::InvalidInput,
            LedgerError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            LedgerError::BalanceDrift { .. }
            | LedgerError::MoneyNotConserved { .. }
            | LedgerError::ArithmeticOverflow { .. }
            | LedgerError::CompensationFailed { .. }
            | LedgerError::LockPoisoned { .. }
            | LedgerError::HistoryMismatch { .. } => ErrorKind::InvariantViolation,
        }
    }

    /// Human-readable message without the `[CODE]` prefix
    pub fn message(&self) -> String {
        let rendered = self.to_string();
        let prefix = format!("[{}] ", self.error_code());
        match rendered.strip_prefix(&prefix) {
            Some(message) => message.to_string(),
            None => rendered,
        }
    }

    /// Kind-specific context fields
    pub fn context(&self) -> ErrorContext {
        match self {
            LedgerError::InvalidAmount { amount } => vec![("amount", amount.clone())],
            LedgerError::UnknownOperation { operation } => vec![("operation", operation.clone())],
            LedgerError::MalformedAmount { raw } | LedgerError::MalformedAccountId { raw } => {
                vec![("input", raw.clone())]
            }
            LedgerError::MissingField { field, operation } => vec![
                ("field", field.clone()),
                ("operation", operation.clone()),
            ],
            LedgerError::EmptyOwnerName => vec![("field", "owner".to_string())],
            LedgerError::UnknownAccount { account }
            | LedgerError::DuplicateAccount { account }
            | LedgerError::SelfTransfer { account }
            | LedgerError::LockPoisoned { account } => vec![("account", account.to_string())],
            LedgerError::InsufficientFunds {
                account,
                requested,
                balance,
            } => vec![
                ("account", account.to_string()),
                ("requested", requested.to_string()),
                ("balance", balance.to_string()),
                ("shortfall", shortfall(requested, balance).to_string()),
            ],
            LedgerError::BalanceDrift {
                account,
                operation,
                previous,
                amount,
                actual,
            } => vec![
                ("account", account.to_string()),
                ("operation", operation.to_string()),
                ("previous", previous.to_string()),
                ("amount", amount.to_string()),
                ("actual", actual.to_string()),
            ],
            LedgerError::MoneyNotConserved {
                from,
                to,
                before,
                after,
            } => vec![
                ("from", from.to_string()),
                ("to", to.to_string()),
                ("before", before.to_string()),
                ("after", after.to_string()),
            ],
            LedgerError::ArithmeticOverflow { operation, account } => vec![
                ("account", account.to_string()),
                ("operation", operation.to_string()),
            ],
            LedgerError::CompensationFailed {
                account,
                operation,
                amount,
                balance,
            } => vec![
                ("account", account.to_string()),
                ("operation", operation.to_string()),
                ("amount", amount.to_string()),
                ("balance", balance.to_string()),
            ],
            LedgerError::HistoryMismatch {
                account,
                recorded,
                balance,
            } => vec![
                ("account", account.to_string()),
                ("recorded", recorded.to_string()),
                ("balance", balance.to_string()),
            ],
        }
    }
}

// Helper functions for creating common errors

impl LedgerError {
    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: impl fmt::Display) -> Self {
        LedgerError::InvalidAmount {
            amount: amount.to_string(),
        }
    }

    /// Create a MalformedAmount error
    pub fn malformed_amount(raw: &str) -> Self {
        LedgerError::MalformedAmount {
            raw: raw.to_string(),
        }
    }

    /// Create a MalformedAccountId error
    pub fn malformed_account_id(raw: &str) -> Self {
        LedgerError::MalformedAccountId {
            raw: raw.to_string(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: &str, operation: &str) -> Self {
        LedgerError::MissingField {
            field: field.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Create an UnknownOperation error
    pub fn unknown_operation(operation: &str) -> Self {
        LedgerError::UnknownOperation {
            operation: operation.to_string(),
        }
    }

    /// Create an InsufficientFunds error
    pub fn insufficient_funds(account: &AccountId, requested: Decimal, balance: Decimal) -> Self {
        LedgerError::InsufficientFunds {
            account: account.clone(),
            requested,
            balance,
        }
    }

    /// Create a BalanceDrift error
    pub fn balance_drift(
        account: &AccountId,
        operation: OperationKind,
        previous: Decimal,
        amount: Decimal,
        actual: Decimal,
    ) -> Self {
        LedgerError::BalanceDrift {
            account: account.clone(),
            operation,
            previous,
            amount,
            actual,
        }
    }

    /// Create an ArithmeticOverflow error
    pub fn arithmetic_overflow(operation: OperationKind, account: &AccountId) -> Self {
        LedgerError::ArithmeticOverflow {
            operation,
            account: account.clone(),
        }
    }
}

/// Fatal errors of the CSV replay pipeline
///
/// These abort a replay run. Rejected rows are not fatal: they are logged
/// with their [`LedgerError`] and processing continues.
#[derive(Debug, Error)]
pub enum ReplayError {
    /// Input file does not exist
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// Reading input or writing output failed
    #[error("I/O error: {message}")]
    Io {
        /// Description of the I/O error
        message: String,
    },

    /// CSV structure could not be read or written
    #[error("CSV error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Csv {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the CSV error
        message: String,
    },
}

impl From<std::io::Error> for ReplayError {
    fn from(error: std::io::Error) -> Self {
        ReplayError::Io {
            message: error.to_string(),
        }
    }
}

impl From<csv::Error> for ReplayError {
    fn from(error: csv::Error) -> Self {
        let line = error.position().map(|pos| pos.line());

        ReplayError::Csv {
            line,
            message: error.to_string(),
        }
    }
}
