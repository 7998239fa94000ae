//! Thread-safe account registry
//!
//! This module provides [`SharedLedger`], the registry to use when several
//! threads operate on the same accounts.
//!
//! # Design
//!
//! Accounts live in a `DashMap` keyed by id, each behind its own `Mutex`.
//! The map only guards membership; the per-account mutex is held for the
//! whole pre-condition → mutation → history-append sequence of an
//! operation, so two operations on one account never interleave.
//!
//! Transfers lock both accounts. Locks are always taken in ascending
//! [`AccountId`] order, so transfers running in opposite directions between
//! the same pair cannot deadlock.

use crate::core::account::Account;
use crate::core::transfer::{TransferCoordinator, TransferReceipt};
use crate::types::{AccountId, AccountSnapshot, Amount, LedgerError};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex, MutexGuard};

type SharedAccount = Arc<Mutex<Account>>;

/// Concurrent account registry
///
/// All methods take `&self` and are safe to call from multiple threads.
#[derive(Debug, Default)]
pub struct SharedLedger {
    accounts: DashMap<AccountId, SharedAccount>,
}

impl SharedLedger {
    /// Create a new empty SharedLedger
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
        }
    }

    /// Open a new account
    ///
    /// # Errors
    ///
    /// - `DuplicateAccount` if `id` is already registered
    /// - Any error from [`Account::open`]
    pub fn open_account(
        &self,
        id: AccountId,
        owner: &str,
        opening_balance: Decimal,
    ) -> Result<(), LedgerError> {
        match self.accounts.entry(id) {
            Entry::Occupied(entry) => Err(LedgerError::DuplicateAccount {
                account: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                let account = Account::open(entry.key().clone(), owner, opening_balance)?;
                entry.insert(Arc::new(Mutex::new(account)));
                Ok(())
            }
        }
    }

    /// Clone the handle out of the map so no shard lock is held while the
    /// account lock is.
    fn handle(&self, id: &AccountId) -> Result<SharedAccount, LedgerError> {
        self.accounts
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| LedgerError::UnknownAccount {
                account: id.clone(),
            })
    }

    pub fn deposit(&self, id: &AccountId, amount: Amount) -> Result<Decimal, LedgerError> {
        let handle = self.handle(id)?;
        let mut account = lock(&handle, id)?;
        account.deposit(amount)
    }

    pub fn withdraw(&self, id: &AccountId, amount: Amount) -> Result<Decimal, LedgerError> {
        let handle = self.handle(id)?;
        let mut account = lock(&handle, id)?;
        account.withdraw(amount)
    }

    /// Transfer between two accounts holding both locks
    ///
    /// # Errors
    ///
    /// - `SelfTransfer` if `from == to`
    /// - `UnknownAccount` if either id is not registered
    /// - `LockPoisoned` if either lock is poisoned
    /// - Any error from [`TransferCoordinator::transfer`]
    pub fn transfer(
        &self,
        from: &AccountId,
        to: &AccountId,
        amount: Amount,
    ) -> Result<TransferReceipt, LedgerError> {
        if from == to {
            return Err(LedgerError::SelfTransfer {
                account: from.clone(),
            });
        }

        let source = self.handle(from)?;
        let destination = self.handle(to)?;

        let (mut source, mut destination) = if from < to {
            let source = lock(&source, from)?;
            let destination = lock(&destination, to)?;
            (source, destination)
        } else {
            let destination = lock(&destination, to)?;
            let source = lock(&source, from)?;
            (source, destination)
        };

        TransferCoordinator::transfer(&mut *source, &mut *destination, amount)
    }

    /// Current balance of an account
    pub fn balance(&self, id: &AccountId) -> Result<Decimal, LedgerError> {
        let handle = self.handle(id)?;
        let account = lock(&handle, id)?;
        Ok(account.balance())
    }

    /// Snapshots of all accounts sorted by id
    ///
    /// Every account lock is held, taken in ascending id order, while the
    /// snapshots are read, so the result is a consistent cut: no transfer is
    /// half-visible in it. Accounts opened after the map was listed are not
    /// included.
    pub fn snapshots(&self) -> Result<Vec<AccountSnapshot>, LedgerError> {
        let mut handles: Vec<(AccountId, SharedAccount)> = self
            .accounts
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();
        handles.sort_by(|a, b| a.0.cmp(&b.0));

        let guards = handles
            .iter()
            .map(|(id, handle)| lock(handle, id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(guards.iter().map(|account| account.snapshot()).collect())
    }

    /// Run [`Account::verify_integrity`] on every account
    pub fn verify_integrity(&self) -> Result<(), LedgerError> {
        let handles: Vec<(AccountId, SharedAccount)> = self
            .accounts
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        for (id, handle) in &handles {
            lock(handle, id)?.verify_integrity()?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn lock<'a>(
    handle: &'a SharedAccount,
    id: &AccountId,
) -> Result<MutexGuard<'a, Account>, LedgerError> {
    handle.lock().map_err(|_| {
        tracing::error!(account = %id, "account lock poisoned");
        LedgerError::LockPoisoned { account: id.clone() }
    })
}
