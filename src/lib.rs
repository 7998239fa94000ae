//! Rust Ledger Engine Library
//! # Overview
//!
//! An in-memory account ledger with validated inputs, per-account audit
//! trails and transfers that either complete or leave both accounts exactly
//! as they were.
//!
//! # Architecture
//!
//! - [`types`] - Core data types (AccountId, Amount, TransactionRecord, errors)
//! - [`cli`] - CLI arguments parsing and log setup
//! - [`core`] - Business logic components:
//!   - [`core::validator`] - Raw input checks
//!   - [`core::account`] - Balance and audit trail of a single account
//!   - [`core::transfer`] - Transfers with compensating rollback
//!   - [`core::ledger`] / [`core::shared`] - Single-threaded and concurrent registries
//!   - [`core::engine`] - Command processing orchestration
//! - [`io`] - CSV command reading and report writing
//! - [`replay`] - File replay pipeline tying the above together
//!
//! # Operations
//!
//! - **Deposit**: Credit funds to an account
//! - **Withdraw**: Debit funds (requires sufficient balance)
//! - **Transfer**: Debit one account and credit another; if the credit
//!   fails, the debit is compensated and the original error returned
//!
//! # Errors
//!
//! Every failure is a [`LedgerError`] with a stable code (`E001`..`E009`
//! for input errors, `T001` for insufficient funds, `L001`..`L007` for
//! invariant violations). Every attempted balance change, successful or
//! not, is appended to the account's history.

pub mod cli;
pub mod core;
pub mod io;
pub mod replay;
pub mod types;

pub use core::{Account, Ledger, LedgerAccount, LedgerEngine, SharedLedger, TransferCoordinator};
pub use io::{write_balances_csv, write_history_csv};
pub use types::{
    AccountId, AccountSnapshot, Amount, ErrorKind, LedgerCommand, LedgerError, OperationKind,
    ReplayError, TransactionRecord, TransactionStatus,
};
