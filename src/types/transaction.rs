//! Transaction-related types for the ledger engine
//!
//! This module defines the operation kinds an account records and the
//! append-only [`TransactionRecord`] that makes up an account's audit trail.

use super::error::LedgerError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;

/// Operations an account can record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Credit requested directly on the account
    Deposit,

    /// Debit requested directly on the account
    Withdraw,

    /// Debit leg of a transfer
    TransferOut,

    /// Credit leg of a transfer
    TransferIn,
}

impl OperationKind {
    /// Whether the operation adds funds to the account
    pub fn is_credit(self) -> bool {
        matches!(self, OperationKind::Deposit | OperationKind::TransferIn)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OperationKind::Deposit => "deposit",
            OperationKind::Withdraw => "withdraw",
            OperationKind::TransferOut => "transfer-out",
            OperationKind::TransferIn => "transfer-in",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of an attempted operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionStatus {
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }
}

/// One entry in an account's audit trail
///
/// Records are created by the account when an operation is attempted and are
/// never mutated afterwards, so fields are only exposed through getters. The
/// error is present iff the status is [`TransactionStatus::Failed`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    sequence: u64,
    kind: OperationKind,
    amount: Decimal,
    status: TransactionStatus,
    error: Option<LedgerError>,
    compensated: bool,
    timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    pub(crate) fn completed(sequence: u64, kind: OperationKind, amount: Decimal) -> Self {
        TransactionRecord {
            sequence,
            kind,
            amount,
            status: TransactionStatus::Completed,
            error: None,
            compensated: false,
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn failed(
        sequence: u64,
        kind: OperationKind,
        amount: Decimal,
        error: LedgerError,
    ) -> Self {
        TransactionRecord {
            sequence,
            kind,
            amount,
            status: TransactionStatus::Failed,
            error: Some(error),
            compensated: false,
            timestamp: Utc::now(),
        }
    }

    /// A failed record noting that an earlier completed `kind` step of the
    /// same amount has been reversed because of `cause`.
    pub(crate) fn compensated(
        sequence: u64,
        kind: OperationKind,
        amount: Decimal,
        cause: LedgerError,
    ) -> Self {
        TransactionRecord {
            compensated: true,
            ..TransactionRecord::failed(sequence, kind, amount, cause)
        }
    }

    /// Per-account sequence number, starting at 1
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn status(&self) -> TransactionStatus {
        self.status
    }

    /// Error that failed (or was compensated for) this operation
    pub fn error(&self) -> Option<&LedgerError> {
        self.error.as_ref()
    }

    /// Whether this record notes a rollback of an earlier completed step
    pub fn is_compensated(&self) -> bool {
        self.compensated
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }
}
