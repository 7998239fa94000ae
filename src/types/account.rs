//! Account-related types for the ledger engine
//!
//! This module defines the validated account identifier and the read-only
//! snapshot used for reporting. The account state machine itself lives in
//! [`crate::core::account`].

use super::error::LedgerError;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Validated account identifier
///
/// Always 8-12 ASCII alphanumeric characters. Only constructible through
/// [`crate::core::validator::validate_account_id`] (or `FromStr`, which
/// delegates to it), so holding an `AccountId` proves the format check ran.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(String);

impl AccountId {
    pub(crate) fn new_unchecked(id: String) -> Self {
        AccountId(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountId {
    type Err = LedgerError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        crate::core::validator::validate_account_id(raw)
    }
}

/// Point-in-time copy of an account's state
///
/// Produced by [`crate::core::Account::snapshot`] for reporting and for
/// external persistence collaborators. Mutating a snapshot never affects the
/// account it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSnapshot {
    /// The account identifier
    pub id: AccountId,

    /// Name of the account owner
    pub owner: String,

    /// Balance the account was opened with
    pub opening_balance: Decimal,

    /// Current balance
    pub balance: Decimal,

    /// Number of records in the transaction history
    pub transactions: usize,
}
