//! Validated ledger commands
//!
//! A [`LedgerCommand`] is what a replay row becomes once every field has
//! been through the validator. Holding one means the ids, amounts and owner
//! name are already well formed; whether the command succeeds still depends
//! on ledger state.

use crate::types::{AccountId, Amount};
use rust_decimal::Decimal;

#[derive(Debug, Clone, PartialEq)]
pub enum LedgerCommand {
    Open {
        account: AccountId,
        owner: String,
        opening_balance: Decimal,
    },
    Deposit {
        account: AccountId,
        amount: Amount,
    },
    Withdraw {
        account: AccountId,
        amount: Amount,
    },
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Amount,
    },
}

impl LedgerCommand {
    /// Name of the operation as it appears in the `op` column
    pub fn operation(&self) -> &'static str {
        match self {
            LedgerCommand::Open { .. } => "open",
            LedgerCommand::Deposit { .. } => "deposit",
            LedgerCommand::Withdraw { .. } => "withdraw",
            LedgerCommand::Transfer { .. } => "transfer",
        }
    }

    /// Account the command is issued against
    pub fn account(&self) -> &AccountId {
        match self {
            LedgerCommand::Open { account, .. }
            | LedgerCommand::Deposit { account, .. }
            | LedgerCommand::Withdraw { account, .. } => account,
            LedgerCommand::Transfer { from, .. } => from,
        }
    }
}
