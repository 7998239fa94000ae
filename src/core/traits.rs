//! Core traits for accounts taking part in a transfer
//!
//! The transfer coordinator is written against this trait rather than the
//! concrete [`Account`](crate::core::Account), so anything that keeps a
//! balance and an audit trail (a wrapped account, a faulting account in a
//! test) can be a transfer party.

use crate::types::{AccountId, Amount, LedgerError, OperationKind};
use rust_decimal::Decimal;

/// An account the [`TransferCoordinator`](crate::core::TransferCoordinator)
/// can move funds between
///
/// Every method that changes the balance must append exactly one record to
/// the implementor's history, whether it succeeds or fails.
pub trait LedgerAccount {
    /// Identifier of the account
    fn id(&self) -> &AccountId;

    /// Current balance
    fn balance(&self) -> Decimal;

    /// Debit leg of a transfer, recorded as `transfer-out`
    ///
    /// Returns the new balance.
    fn transfer_out(&mut self, amount: Amount) -> Result<Decimal, LedgerError>;

    /// Credit leg of a transfer, recorded as `transfer-in`
    ///
    /// Returns the new balance.
    fn transfer_in(&mut self, amount: Amount) -> Result<Decimal, LedgerError>;

    /// Reverse the effect of an earlier completed `operation` of `amount`
    ///
    /// Appends a failed record flagged as compensated that carries `cause`.
    /// Returns the restored balance.
    fn compensate(
        &mut self,
        operation: OperationKind,
        amount: Amount,
        cause: &LedgerError,
    ) -> Result<Decimal, LedgerError>;
}
