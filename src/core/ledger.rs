//! Account registry
//!
//! This module provides the [`Ledger`], which owns every account, enforces
//! id uniqueness and routes operations by [`AccountId`].
//!
//! The Ledger is responsible for:
//! - Opening accounts (rejecting duplicate ids)
//! - Resolving ids to accounts for deposits, withdrawals and transfers
//! - Running multi-leg transfer batches with an ordered undo list
//! - Providing sorted account listings for output

use crate::core::account::Account;
use crate::core::transfer::{TransferCoordinator, TransferLeg, TransferReceipt, UndoLog};
use crate::types::{AccountId, Amount, LedgerError};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// In-memory registry of accounts
#[derive(Debug, Default)]
pub struct Ledger {
    accounts: HashMap<AccountId, Account>,
}

impl Ledger {
    /// Create a new Ledger with no accounts
    pub fn new() -> Self {
        Ledger {
            accounts: HashMap::new(),
        }
    }

    /// Open a new account
    ///
    /// # Errors
    ///
    /// - `DuplicateAccount` if `id` is already registered
    /// - Any error from [`Account::open`]
    pub fn open_account(
        &mut self,
        id: AccountId,
        owner: &str,
        opening_balance: Decimal,
    ) -> Result<&Account, LedgerError> {
        if self.accounts.contains_key(&id) {
            return Err(LedgerError::DuplicateAccount { account: id });
        }

        let account = Account::open(id.clone(), owner, opening_balance)?;
        tracing::info!(account = %id, opening_balance = %opening_balance, "account opened");

        Ok(self.accounts.entry(id).or_insert(account))
    }

    /// Look up an account
    pub fn get(&self, id: &AccountId) -> Option<&Account> {
        self.accounts.get(id)
    }

    /// Look up an account, failing with `UnknownAccount`
    pub fn account(&self, id: &AccountId) -> Result<&Account, LedgerError> {
        self.get(id).ok_or_else(|| LedgerError::UnknownAccount {
            account: id.clone(),
        })
    }

    fn account_mut(&mut self, id: &AccountId) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(id)
            .ok_or_else(|| LedgerError::UnknownAccount {
                account: id.clone(),
            })
    }

    /// Borrow two distinct accounts mutably
    fn pair_mut(
        &mut self,
        from: &AccountId,
        to: &AccountId,
    ) -> Result<(&mut Account, &mut Account), LedgerError> {
        if from == to {
            return Err(LedgerError::SelfTransfer {
                account: from.clone(),
            });
        }

        match self.accounts.get_disjoint_mut([from, to]) {
            [Some(source), Some(destination)] => Ok((source, destination)),
            [None, _] => Err(LedgerError::UnknownAccount {
                account: from.clone(),
            }),
            [_, None] => Err(LedgerError::UnknownAccount {
                account: to.clone(),
            }),
        }
    }

    /// Deposit into the account registered under `id`
    pub fn deposit(&mut self, id: &AccountId, amount: Amount) -> Result<Decimal, LedgerError> {
        self.account_mut(id)?.deposit(amount)
    }

    /// Withdraw from the account registered under `id`
    pub fn withdraw(&mut self, id: &AccountId, amount: Amount) -> Result<Decimal, LedgerError> {
        self.account_mut(id)?.withdraw(amount)
    }

    /// Transfer between two registered accounts
    ///
    /// # Errors
    ///
    /// - `SelfTransfer` if `from == to`
    /// - `UnknownAccount` if either id is not registered
    /// - Any error from [`TransferCoordinator::transfer`]
    pub fn transfer(
        &mut self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<TransferReceipt, LedgerError> {
        let (source, destination) = self.pair_mut(from, to)?;
        TransferCoordinator::transfer(source, destination, amount)
    }

    /// Apply a sequence of transfers as a unit
    ///
    /// Legs run in order. Each completed leg is pushed onto an [`UndoLog`];
    /// if a later leg fails, the completed legs are reversed last-in
    /// first-out and the failing leg's error is returned. Every account
    /// touched ends with the balance it started with.
    ///
    /// # Errors
    ///
    /// The first error raised by a leg, or `CompensationFailed` if unwinding
    /// could not complete.
    pub fn transfer_batch(
        &mut self,
        legs: &[TransferLeg],
    ) -> Result<Vec<TransferReceipt>, LedgerError> {
        let mut undo = UndoLog::new();
        let mut receipts = Vec::with_capacity(legs.len());

        for (index, leg) in legs.iter().enumerate() {
            match self.transfer(&leg.from, &leg.to, leg.amount) {
                Ok(receipt) => {
                    receipts.push(receipt);
                    undo.push(leg.clone());
                }
                Err(error) => {
                    tracing::warn!(
                        leg = index,
                        completed = undo.len(),
                        code = error.error_code(),
                        "batch leg failed, unwinding"
                    );
                    self.unwind(undo, &error)?;
                    return Err(error);
                }
            }
        }

        Ok(receipts)
    }

    fn unwind(&mut self, undo: UndoLog, cause: &LedgerError) -> Result<(), LedgerError> {
        for leg in undo.unwind() {
            let (source, destination) = self.pair_mut(&leg.from, &leg.to)?;
            TransferCoordinator::reverse(source, destination, leg.amount, cause)?;
        }
        Ok(())
    }

    /// All accounts sorted by id
    pub fn accounts(&self) -> Vec<&Account> {
        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by(|a, b| a.id().cmp(b.id()));
        accounts
    }

    /// Sum of every account balance
    pub fn total_funds(&self) -> Decimal {
        self.accounts.values().map(Account::balance).sum()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
