//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `account`: Account identifier and snapshot types
//! - `amount`: Validated monetary amount
//! - `command`: Validated commands fed to the engine
//! - `transaction`: Operation kinds and audit-trail records
//! - `error`: Error taxonomy for the ledger core and the replay pipeline

pub mod account;
pub mod amount;
pub mod command;
pub mod error;
pub mod transaction;

pub use account::{AccountId, AccountSnapshot};
pub use amount::Amount;
pub use command::LedgerCommand;
pub use error::{ErrorContext, ErrorKind, LedgerError, ReplayError};
pub use transaction::{OperationKind, TransactionRecord, TransactionStatus};
