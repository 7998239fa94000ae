//! Two-account transfer protocol with compensating rollback
//!
//! Accounts only expose independent debit and credit operations, so a
//! transfer is a two-step sequence. If the credit fails after the debit has
//! gone through, the coordinator applies the inverse of the debit to the
//! source and re-raises the original error. Callers never observe a state in
//! which the funds have left one account without arriving in the other.
//!
//! Batches of transfers (see [`Ledger::transfer_batch`](crate::core::Ledger::transfer_batch))
//! keep an [`UndoLog`] of completed legs and unwind it in reverse order.

use crate::core::traits::LedgerAccount;
use crate::core::validator;
use crate::types::{AccountId, Amount, LedgerError, OperationKind};
use rust_decimal::Decimal;

/// Result of a completed transfer
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    /// Source account
    pub from: AccountId,
    /// Destination account
    pub to: AccountId,
    /// Amount moved
    pub amount: Decimal,
    /// Source balance after the transfer
    pub from_balance: Decimal,
    /// Destination balance after the transfer
    pub to_balance: Decimal,
}

/// One leg of a multi-transfer batch
#[derive(Debug, Clone, PartialEq)]
pub struct TransferLeg {
    pub from: AccountId,
    pub to: AccountId,
    pub amount: Amount,
}

/// Coordinates transfers between two [`LedgerAccount`]s
///
/// Stateless: everything it needs lives in the two accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransferCoordinator;

impl TransferCoordinator {
    /// Move `amount` from `from` to `to`
    ///
    /// On success `from` has recorded a completed `transfer-out` and `to` a
    /// completed `transfer-in`.
    ///
    /// # Errors
    ///
    /// - `SelfTransfer` if both sides carry the same id
    /// - `InvalidAmount` / `InsufficientFunds` from the debit; nothing has
    ///   changed on either side
    /// - Any error from the credit; the debit has been compensated and `from`
    ///   holds a failed, compensated `transfer-out` record
    /// - `MoneyNotConserved` if the combined balance moved; both sides have
    ///   been compensated back to their starting balances
    /// - `CompensationFailed` if a rollback step itself failed
    ///
    /// In every case except `CompensationFailed`, `from.balance() +
    /// to.balance()` is the same before and after the call.
    pub fn transfer<F, T>(
        from: &mut F,
        to: &mut T,
        amount: Amount,
    ) -> Result<TransferReceipt, LedgerError>
    where
        F: LedgerAccount + ?Sized,
        T: LedgerAccount + ?Sized,
    {
        let amount = validator::validate_decimal(amount.value())?;
        if from.id() == to.id() {
            return Err(LedgerError::SelfTransfer {
                account: from.id().clone(),
            });
        }

        let (from_before, to_before) = (from.balance(), to.balance());
        let before = combined_balance(from, to)?;

        // Debit failure leaves both accounts untouched.
        from.transfer_out(amount)?;

        if let Err(error) = to.transfer_in(amount) {
            tracing::warn!(
                from = %from.id(),
                to = %to.id(),
                amount = %amount,
                code = error.error_code(),
                "transfer credit failed, rolling back debit"
            );
            from.compensate(OperationKind::TransferOut, amount, &error)?;
            return Err(error);
        }

        let after = combined_balance(from, to)?;
        if after != before {
            let error = LedgerError::MoneyNotConserved {
                from: from.id().clone(),
                to: to.id().clone(),
                before,
                after,
            };
            tracing::error!(
                from = %from.id(),
                to = %to.id(),
                before = %before,
                after = %after,
                "transfer did not conserve funds, rolling back"
            );
            restore(to, to_before, &error)?;
            restore(from, from_before, &error)?;
            return Err(error);
        }

        tracing::debug!(from = %from.id(), to = %to.id(), amount = %amount, "transfer completed");

        Ok(TransferReceipt {
            from: from.id().clone(),
            to: to.id().clone(),
            amount: amount.value(),
            from_balance: from.balance(),
            to_balance: to.balance(),
        })
    }

    /// Undo a completed transfer of `amount` from `from` to `to`
    ///
    /// The destination gives the funds back first so a failure there leaves
    /// the source untouched.
    pub fn reverse<F, T>(
        from: &mut F,
        to: &mut T,
        amount: Amount,
        cause: &LedgerError,
    ) -> Result<(), LedgerError>
    where
        F: LedgerAccount + ?Sized,
        T: LedgerAccount + ?Sized,
    {
        to.compensate(OperationKind::TransferIn, amount, cause)?;
        from.compensate(OperationKind::TransferOut, amount, cause)?;
        Ok(())
    }
}

fn combined_balance<F, T>(from: &F, to: &T) -> Result<Decimal, LedgerError>
where
    F: LedgerAccount + ?Sized,
    T: LedgerAccount + ?Sized,
{
    from.balance()
        .checked_add(to.balance())
        .ok_or_else(|| LedgerError::arithmetic_overflow(OperationKind::TransferIn, to.id()))
}

/// Compensate `account` back to `target`, whichever direction it drifted
fn restore<A>(account: &mut A, target: Decimal, cause: &LedgerError) -> Result<(), LedgerError>
where
    A: LedgerAccount + ?Sized,
{
    let current = account.balance();
    if current > target {
        let excess = validator::validate_decimal(current - target)?;
        account.compensate(OperationKind::TransferIn, excess, cause)?;
    } else if current < target {
        let shortfall = validator::validate_decimal(target - current)?;
        account.compensate(OperationKind::TransferOut, shortfall, cause)?;
    }
    Ok(())
}

/// Completed transfer legs, unwound last-in first-out
#[derive(Debug, Default)]
pub struct UndoLog {
    legs: Vec<TransferLeg>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a leg that has fully completed
    pub fn push(&mut self, leg: TransferLeg) {
        self.legs.push(leg);
    }

    pub fn len(&self) -> usize {
        self.legs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Drain the log in the order the legs must be reversed
    pub fn unwind(self) -> impl Iterator<Item = TransferLeg> {
        self.legs.into_iter().rev()
    }
}
