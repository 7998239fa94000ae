//! Command processing engine
//!
//! This module provides the LedgerEngine, which applies validated
//! [`LedgerCommand`]s to a [`Ledger`].
//!
//! The engine is the single entry point used by the replay pipeline:
//! - Opening accounts
//! - Routing deposits and withdrawals to the right account
//! - Running transfers through the transfer coordinator
//!
//! Business-rule failures are returned to the caller; the accounts involved
//! have already recorded them in their history.

use crate::core::account::Account;
use crate::core::ledger::Ledger;
use crate::types::{LedgerCommand, LedgerError};
use rust_decimal::Decimal;

/// Command processing engine
///
/// Owns the ledger for the duration of a replay.
#[derive(Debug, Default)]
pub struct LedgerEngine {
    ledger: Ledger,
}

impl LedgerEngine {
    /// Create a new LedgerEngine with an empty ledger
    pub fn new() -> Self {
        LedgerEngine {
            ledger: Ledger::new(),
        }
    }

    /// Process a single command
    ///
    /// # Arguments
    ///
    /// * `command` - The validated command to apply
    ///
    /// # Returns
    ///
    /// * `Ok(())` if the command was applied
    /// * `Err(LedgerError)` if the ledger rejected it
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - An account is opened twice or an id is unknown
    /// - A withdrawal or transfer exceeds the available balance
    /// - A transfer names the same account on both sides
    /// - An invariant check fails inside the account or the coordinator
    pub fn process(&mut self, command: LedgerCommand) -> Result<(), LedgerError> {
        match command {
            LedgerCommand::Open {
                account,
                owner,
                opening_balance,
            } => {
                self.ledger.open_account(account, &owner, opening_balance)?;
            }
            LedgerCommand::Deposit { account, amount } => {
                self.ledger.deposit(&account, amount)?;
            }
            LedgerCommand::Withdraw { account, amount } => {
                self.ledger.withdraw(&account, amount)?;
            }
            LedgerCommand::Transfer { from, to, amount } => {
                self.ledger.transfer(&from, &to, amount)?;
            }
        }
        Ok(())
    }

    /// All accounts sorted by id
    pub fn get_accounts(&self) -> Vec<&Account> {
        self.ledger.accounts()
    }

    /// Sum of every balance in the ledger
    pub fn total_funds(&self) -> Decimal {
        self.ledger.total_funds()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validator::{validate_account_id, validate_amount};
    use crate::types::{AccountId, Amount, OperationKind, TransactionStatus};
    use rstest::rstest;

    fn id(raw: &str) -> AccountId {
        validate_account_id(raw).unwrap()
    }

    fn amount(raw: &str) -> Amount {
        validate_amount(raw).unwrap()
    }

    fn open(raw: &str, balance: i64) -> LedgerCommand {
        LedgerCommand::Open {
            account: id(raw),
            owner: "Owner Name".to_string(),
            opening_balance: Decimal::new(balance, 0),
        }
    }

    fn engine_with(accounts: &[(&str, i64)]) -> LedgerEngine {
        let mut engine = LedgerEngine::new();
        for (raw, balance) in accounts {
            engine.process(open(raw, *balance)).unwrap();
        }
        engine
    }

    #[test]
    fn test_new_engine_is_empty() {
        let engine = LedgerEngine::new();
        assert!(engine.get_accounts().is_empty());
        assert_eq!(engine.total_funds(), Decimal::ZERO);
    }

    #[test]
    fn test_process_open_deposit_withdraw() {
        let mut engine = engine_with(&[("ACCOUNTA1", 100)]);

        engine
            .process(LedgerCommand::Deposit {
                account: id("ACCOUNTA1"),
                amount: amount("25.5"),
            })
            .unwrap();
        engine
            .process(LedgerCommand::Withdraw {
                account: id("ACCOUNTA1"),
                amount: amount("0.5"),
            })
            .unwrap();

        let accounts = engine.get_accounts();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].balance(), Decimal::new(125, 0));
        assert_eq!(accounts[0].history().len(), 2);
    }

    #[test]
    fn test_process_transfer() {
        let mut engine = engine_with(&[("ACCOUNTA1", 100), ("ACCOUNTB1", 0)]);

        engine
            .process(LedgerCommand::Transfer {
                from: id("ACCOUNTA1"),
                to: id("ACCOUNTB1"),
                amount: amount("40"),
            })
            .unwrap();

        let accounts = engine.get_accounts();
        assert_eq!(accounts[0].balance(), Decimal::new(60, 0));
        assert_eq!(accounts[1].balance(), Decimal::new(40, 0));
        assert_eq!(accounts[0].history()[0].kind(), OperationKind::TransferOut);
        assert_eq!(accounts[1].history()[0].kind(), OperationKind::TransferIn);
        assert_eq!(engine.total_funds(), Decimal::new(100, 0));
    }

    #[rstest]
    #[case::duplicate_open(open("ACCOUNTA1", 5), "E008")]
    #[case::unknown_account(
        LedgerCommand::Deposit { account: id("MISSING01"), amount: amount("1") },
        "E007"
    )]
    #[case::self_transfer(
        LedgerCommand::Transfer { from: id("ACCOUNTA1"), to: id("ACCOUNTA1"), amount: amount("1") },
        "E009"
    )]
    #[case::overdraw(
        LedgerCommand::Withdraw { account: id("ACCOUNTA1"), amount: amount("100.01") },
        "T001"
    )]
    #[case::transfer_overdraw(
        LedgerCommand::Transfer { from: id("ACCOUNTA1"), to: id("ACCOUNTB1"), amount: amount("500") },
        "T001"
    )]
    fn test_process_rejections(#[case] command: LedgerCommand, #[case] expected_code: &str) {
        let mut engine = engine_with(&[("ACCOUNTA1", 100), ("ACCOUNTB1", 0)]);

        let error = engine.process(command).unwrap_err();

        assert_eq!(error.error_code(), expected_code);
        assert_eq!(engine.total_funds(), Decimal::new(100, 0));
    }

    #[test]
    fn test_rejected_withdrawal_is_recorded() {
        let mut engine = engine_with(&[("ACCOUNTA1", 10)]);

        let _ = engine.process(LedgerCommand::Withdraw {
            account: id("ACCOUNTA1"),
            amount: amount("11"),
        });

        let history = engine.get_accounts()[0].history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status(), TransactionStatus::Failed);
        assert_eq!(history[0].error().map(LedgerError::error_code), Some("T001"));
    }
}
