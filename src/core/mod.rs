//! Core business logic module
//!
//! This module contains the ledger components:
//! - `validator` - Raw input checks producing validated types
//! - `traits` - The account abstraction the transfer coordinator works against
//! - `account` - Balance, history and per-operation invariant checks
//! - `transfer` - Two-party transfers with compensating rollback
//! - `ledger` - Account registry and batch transfers
//! - `shared` - Thread-safe registry
//! - `engine` - Command processing orchestration

pub mod account;
pub mod engine;
pub mod ledger;
pub mod shared;
pub mod traits;
pub mod transfer;
pub mod validator;

pub use account::Account;
pub use engine::LedgerEngine;
pub use ledger::Ledger;
pub use shared::SharedLedger;
pub use traits::LedgerAccount;
pub use transfer::{TransferCoordinator, TransferLeg, TransferReceipt, UndoLog};
pub use validator::{
    validate_account_id, validate_amount, validate_decimal, validate_opening_balance,
    validate_owner_name,
};
