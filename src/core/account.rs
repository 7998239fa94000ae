//! Account state machine
//!
//! An [`Account`] owns a balance and an append-only transaction history.
//! Every attempted operation lands in the history, successful or not, so the
//! history is a complete audit trail of what callers asked for.
//!
//! Each balance change follows the same sequence:
//! 1. Pre-conditions (amount positive, sufficient funds) as guard clauses
//! 2. Checked decimal arithmetic
//! 3. Post-condition: the balance moved by exactly the amount
//! 4. Append a completed record, or a failed one carrying the error

use crate::core::traits::LedgerAccount;
use crate::core::validator;
use crate::types::{
    AccountId, AccountSnapshot, Amount, ErrorKind, LedgerError, OperationKind, TransactionRecord,
    TransactionStatus,
};
use rust_decimal::Decimal;

/// A single ledger account
#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    owner: String,
    opening_balance: Decimal,
    balance: Decimal,
    history: Vec<TransactionRecord>,
}

impl Account {
    /// Open an account
    ///
    /// The opening balance is not an operation and leaves the history empty.
    ///
    /// # Errors
    ///
    /// - `EmptyOwnerName` if `owner` is blank
    /// - `InvalidAmount` if `opening_balance` is negative
    pub fn open(id: AccountId, owner: &str, opening_balance: Decimal) -> Result<Self, LedgerError> {
        let owner = validator::validate_owner_name(owner)?;
        if opening_balance < Decimal::ZERO {
            return Err(LedgerError::invalid_amount(opening_balance));
        }

        Ok(Account {
            id,
            owner,
            opening_balance,
            balance: opening_balance,
            history: Vec::new(),
        })
    }

    pub fn id(&self) -> &AccountId {
        &self.id
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn opening_balance(&self) -> Decimal {
        self.opening_balance
    }

    /// Current balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Transaction history in insertion order
    pub fn history(&self) -> &[TransactionRecord] {
        &self.history
    }

    /// Deposit funds
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the amount is not positive
    /// - `ArithmeticOverflow` / `BalanceDrift` if the balance cannot move by
    ///   exactly `amount`
    ///
    /// A failed record is appended and the balance is unchanged on error.
    pub fn deposit(&mut self, amount: Amount) -> Result<Decimal, LedgerError> {
        self.credit(amount, OperationKind::Deposit)
    }

    /// Withdraw funds
    ///
    /// Returns the new balance.
    ///
    /// # Errors
    ///
    /// - `InvalidAmount` if the amount is not positive
    /// - `InsufficientFunds` if the amount exceeds the balance
    /// - `ArithmeticOverflow` / `BalanceDrift` if the balance cannot move by
    ///   exactly `amount`
    ///
    /// A failed record is appended and the balance is unchanged on error.
    pub fn withdraw(&mut self, amount: Amount) -> Result<Decimal, LedgerError> {
        self.debit(amount, OperationKind::Withdraw)
    }

    /// Recompute the balance from the opening balance and the history
    ///
    /// Completed credits add, completed debits subtract, and compensated
    /// records reverse the step they name. Failed records without
    /// compensation had no effect.
    ///
    /// # Errors
    ///
    /// `HistoryMismatch` if the recomputed value differs from the balance or
    /// the balance is negative.
    pub fn verify_integrity(&self) -> Result<(), LedgerError> {
        let mut recorded = self.opening_balance;
        for record in &self.history {
            let adds = match (record.status(), record.is_compensated()) {
                (TransactionStatus::Completed, _) => record.kind().is_credit(),
                (TransactionStatus::Failed, true) => !record.kind().is_credit(),
                (TransactionStatus::Failed, false) => continue,
            };
            let next = if adds {
                recorded.checked_add(record.amount())
            } else {
                recorded.checked_sub(record.amount())
            };
            recorded =
                next.ok_or_else(|| LedgerError::arithmetic_overflow(record.kind(), &self.id))?;
        }

        if recorded != self.balance || self.balance < Decimal::ZERO {
            return Err(LedgerError::HistoryMismatch {
                account: self.id.clone(),
                recorded,
                balance: self.balance,
            });
        }
        Ok(())
    }

    /// Point-in-time copy for reporting
    pub fn snapshot(&self) -> AccountSnapshot {
        AccountSnapshot {
            id: self.id.clone(),
            owner: self.owner.clone(),
            opening_balance: self.opening_balance,
            balance: self.balance,
            transactions: self.history.len(),
        }
    }

    fn next_sequence(&self) -> u64 {
        self.history.len() as u64 + 1
    }

    fn credit(&mut self, amount: Amount, operation: OperationKind) -> Result<Decimal, LedgerError> {
        let amount = amount.value();

        // `Amount` is positive by construction; the guard stays for the record.
        if amount <= Decimal::ZERO {
            return self.reject(operation, amount, LedgerError::invalid_amount(amount));
        }

        let previous = self.balance;
        match previous.checked_add(amount) {
            Some(updated) => self.settle(operation, amount, previous, updated),
            None => {
                let error = LedgerError::arithmetic_overflow(operation, &self.id);
                self.reject(operation, amount, error)
            }
        }
    }

    fn debit(&mut self, amount: Amount, operation: OperationKind) -> Result<Decimal, LedgerError> {
        let amount = amount.value();

        if amount <= Decimal::ZERO {
            return self.reject(operation, amount, LedgerError::invalid_amount(amount));
        }

        if amount > self.balance {
            let error = LedgerError::insufficient_funds(&self.id, amount, self.balance);
            return self.reject(operation, amount, error);
        }

        let previous = self.balance;
        match previous.checked_sub(amount) {
            Some(updated) => self.settle(operation, amount, previous, updated),
            None => {
                let error = LedgerError::arithmetic_overflow(operation, &self.id);
                self.reject(operation, amount, error)
            }
        }
    }

    /// Apply `updated` and verify the post-condition before recording success
    fn settle(
        &mut self,
        operation: OperationKind,
        amount: Decimal,
        previous: Decimal,
        updated: Decimal,
    ) -> Result<Decimal, LedgerError> {
        self.balance = updated;

        if let Err(error) = verify_movement(&self.id, operation, previous, self.balance, amount) {
            self.balance = previous;
            return self.reject(operation, amount, error);
        }

        self.history.push(TransactionRecord::completed(
            self.next_sequence(),
            operation,
            amount,
        ));
        tracing::debug!(
            account = %self.id,
            operation = %operation,
            amount = %amount,
            balance = %self.balance,
            "operation completed"
        );

        Ok(self.balance)
    }

    /// Record a failed attempt and hand the error back
    fn reject(
        &mut self,
        operation: OperationKind,
        amount: Decimal,
        error: LedgerError,
    ) -> Result<Decimal, LedgerError> {
        self.history.push(TransactionRecord::failed(
            self.next_sequence(),
            operation,
            amount,
            error.clone(),
        ));

        if error.kind() == ErrorKind::InvariantViolation {
            tracing::error!(
                account = %self.id,
                operation = %operation,
                code = error.error_code(),
                "{}",
                error.message()
            );
        } else {
            tracing::warn!(
                account = %self.id,
                operation = %operation,
                code = error.error_code(),
                "{}",
                error.message()
            );
        }

        Err(error)
    }
}

/// Post-condition: the balance moved from `previous` to `actual` by exactly
/// `amount` in the direction of `operation`, and is not negative.
fn verify_movement(
    account: &AccountId,
    operation: OperationKind,
    previous: Decimal,
    actual: Decimal,
    amount: Decimal,
) -> Result<(), LedgerError> {
    let moved = if operation.is_credit() {
        actual.checked_sub(previous)
    } else {
        previous.checked_sub(actual)
    };

    if moved != Some(amount) || actual < Decimal::ZERO {
        return Err(LedgerError::balance_drift(account, operation, previous, amount, actual));
    }
    Ok(())
}

impl LedgerAccount for Account {
    fn id(&self) -> &AccountId {
        &self.id
    }

    fn balance(&self) -> Decimal {
        self.balance
    }

    fn transfer_out(&mut self, amount: Amount) -> Result<Decimal, LedgerError> {
        self.debit(amount, OperationKind::TransferOut)
    }

    fn transfer_in(&mut self, amount: Amount) -> Result<Decimal, LedgerError> {
        self.credit(amount, OperationKind::TransferIn)
    }

    fn compensate(
        &mut self,
        operation: OperationKind,
        amount: Amount,
        cause: &LedgerError,
    ) -> Result<Decimal, LedgerError> {
        let amount = amount.value();

        // Undoing a credit takes funds back out, undoing a debit puts them back.
        let restored = if operation.is_credit() {
            self.balance
                .checked_sub(amount)
                .filter(|restored| *restored >= Decimal::ZERO)
        } else {
            self.balance.checked_add(amount)
        };

        let Some(restored) = restored else {
            let error = LedgerError::CompensationFailed {
                account: self.id.clone(),
                operation,
                amount,
                balance: self.balance,
            };
            return self.reject(operation, amount, error);
        };

        self.balance = restored;
        self.history.push(TransactionRecord::compensated(
            self.next_sequence(),
            operation,
            amount,
            cause.clone(),
        ));
        tracing::info!(
            account = %self.id,
            operation = %operation,
            amount = %amount,
            balance = %self.balance,
            cause = cause.error_code(),
            "operation compensated"
        );

        Ok(self.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validator::{validate_account_id, validate_amount};
    use rstest::rstest;

    fn account_with(balance: &str) -> Account {
        let id = validate_account_id("ACCT123456").unwrap();
        let opening = validator::validate_opening_balance(balance).unwrap();
        Account::open(id, "John Doe", opening).unwrap()
    }

    fn amount(raw: &str) -> Amount {
        validate_amount(raw).unwrap()
    }

    #[test]
    fn test_open_starts_with_empty_history() {
        let account = account_with("1000");

        assert_eq!(account.id().as_str(), "ACCT123456");
        assert_eq!(account.owner(), "John Doe");
        assert_eq!(account.balance(), Decimal::new(1000, 0));
        assert!(account.history().is_empty());
    }

    #[test]
    fn test_open_rejects_blank_owner() {
        let id = validate_account_id("ACCT123456").unwrap();
        let result = Account::open(id, "  ", Decimal::ZERO);
        assert_eq!(result.unwrap_err(), LedgerError::EmptyOwnerName);
    }

    #[test]
    fn test_open_rejects_negative_opening_balance() {
        let id = validate_account_id("ACCT123456").unwrap();
        let result = Account::open(id, "John Doe", Decimal::new(-100, 0));
        assert_eq!(result.unwrap_err().error_code(), "E001");
    }

    #[test]
    fn test_deposit_increases_balance_and_records() {
        let mut account = account_with("1000");

        let balance = account.deposit(amount("500")).unwrap();

        assert_eq!(balance, Decimal::new(1500, 0));
        assert_eq!(account.balance(), Decimal::new(1500, 0));
        assert_eq!(account.history().len(), 1);

        let record = &account.history()[0];
        assert_eq!(record.sequence(), 1);
        assert_eq!(record.kind(), OperationKind::Deposit);
        assert_eq!(record.status(), TransactionStatus::Completed);
        assert!(record.error().is_none());
    }

    #[test]
    fn test_withdraw_scenario() {
        // 100.00 - 30.00 = 70.00 with one completed record
        let mut account = account_with("100.00");

        let balance = account.withdraw(amount("30.00")).unwrap();

        assert_eq!(balance, Decimal::new(7000, 2));
        assert_eq!(account.history().len(), 1);
        assert!(account.history()[0].is_completed());
    }

    #[test]
    fn test_withdraw_insufficient_funds_records_failure() {
        let mut account = account_with("70.00");

        let error = account.withdraw(amount("1000.00")).unwrap_err();

        assert_eq!(
            error,
            LedgerError::InsufficientFunds {
                account: account.id().clone(),
                requested: Decimal::new(100000, 2),
                balance: Decimal::new(7000, 2),
            }
        );
        assert_eq!(account.balance(), Decimal::new(7000, 2));

        let record = &account.history()[0];
        assert_eq!(record.status(), TransactionStatus::Failed);
        assert_eq!(record.kind(), OperationKind::Withdraw);
        assert_eq!(record.error(), Some(&error));
    }

    #[test]
    fn test_withdraw_entire_balance() {
        let mut account = account_with("25.50");
        assert_eq!(account.withdraw(amount("25.50")).unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_deposit_overflow_leaves_balance() {
        let id = validate_account_id("ACCT123456").unwrap();
        let mut account = Account::open(id, "John Doe", Decimal::MAX).unwrap();

        let error = account.deposit(amount("1")).unwrap_err();

        assert!(matches!(error, LedgerError::ArithmeticOverflow { .. }));
        assert_eq!(account.balance(), Decimal::MAX);
        assert_eq!(account.history()[0].status(), TransactionStatus::Failed);
    }

    #[test]
    fn test_history_counts_every_attempt() {
        let mut account = account_with("10");

        let _ = account.deposit(amount("5"));
        let _ = account.withdraw(amount("100"));
        let _ = account.withdraw(amount("3"));
        let _ = account.withdraw(amount("13"));

        let sequences: Vec<u64> = account.history().iter().map(|r| r.sequence()).collect();
        assert_eq!(sequences, vec![1, 2, 3, 4]);
        assert_eq!(account.balance(), Decimal::new(12, 0));
    }

    #[rstest]
    #[case::deposit_flat(OperationKind::Deposit, "100", "100", "10", "L001")]
    #[case::deposit_short(OperationKind::Deposit, "100", "109", "10", "L001")]
    #[case::withdraw_flat(OperationKind::Withdraw, "100", "100", "10", "L002")]
    #[case::transfer_out_overshoot(OperationKind::TransferOut, "100", "80", "10", "L002")]
    fn test_verify_movement_detects_drift(
        #[case] operation: OperationKind,
        #[case] previous: &str,
        #[case] actual: &str,
        #[case] amount: &str,
        #[case] code: &str,
    ) {
        let id = validate_account_id("ACCT123456").unwrap();
        let parse = |raw: &str| validator::validate_opening_balance(raw).unwrap();

        let error = verify_movement(&id, operation, parse(previous), parse(actual), parse(amount))
            .unwrap_err();
        assert_eq!(error.error_code(), code);
    }

    #[test]
    fn test_deposit_rounded_at_precision_limit_is_drift() {
        // No room left in the mantissa for a decimal place, so adding 0.1
        // rounds back to the same value.
        let opening = Decimal::from_i128_with_scale(7 * 10i128.pow(28), 0);
        let id = validate_account_id("ACCT123456").unwrap();
        let mut account = Account::open(id, "John Doe", opening).unwrap();

        let error = account.deposit(amount("0.1")).unwrap_err();

        assert_eq!(error.error_code(), "L001");
        assert!(error.message().contains("deposit of 0.1"));
        assert_eq!(account.balance(), opening);
        assert_eq!(account.history()[0].status(), TransactionStatus::Failed);
        assert!(account.verify_integrity().is_ok());
    }

    #[test]
    fn test_verify_movement_accepts_exact_change() {
        let id = validate_account_id("ACCT123456").unwrap();
        let result = verify_movement(
            &id,
            OperationKind::Deposit,
            Decimal::new(10000, 2),
            Decimal::new(10001, 2),
            Decimal::new(1, 2),
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_compensate_debit_restores_funds() {
        let mut account = account_with("50.00");
        account.transfer_out(amount("20.00")).unwrap();

        let cause = LedgerError::invalid_amount("0");
        let balance = account
            .compensate(OperationKind::TransferOut, amount("20.00"), &cause)
            .unwrap();

        assert_eq!(balance, Decimal::new(5000, 2));
        let last = account.history().last().unwrap();
        assert!(last.is_compensated());
        assert_eq!(last.status(), TransactionStatus::Failed);
        assert_eq!(last.error(), Some(&cause));
        assert!(account.verify_integrity().is_ok());
    }

    #[test]
    fn test_compensate_credit_cannot_go_negative() {
        let mut account = account_with("5");
        let cause = LedgerError::invalid_amount("0");

        let error = account
            .compensate(OperationKind::TransferIn, amount("10"), &cause)
            .unwrap_err();

        assert_eq!(error.error_code(), "L005");
        assert_eq!(account.balance(), Decimal::new(5, 0));
    }

    #[test]
    fn test_verify_integrity_after_mixed_operations() {
        let mut account = account_with("100");
        account.deposit(amount("50")).unwrap();
        let _ = account.withdraw(amount("500"));
        account.withdraw(amount("30")).unwrap();
        account.transfer_in(amount("5")).unwrap();

        assert!(account.verify_integrity().is_ok());
        assert_eq!(account.balance(), Decimal::new(125, 0));
    }

    #[test]
    fn test_verify_integrity_detects_tampered_balance() {
        let mut account = account_with("100");
        account.deposit(amount("50")).unwrap();
        account.balance = Decimal::new(151, 0);

        let error = account.verify_integrity().unwrap_err();
        assert_eq!(error.error_code(), "L007");
    }

    #[test]
    fn test_snapshot_copies_state() {
        let mut account = account_with("10");
        account.deposit(amount("1")).unwrap();

        let snapshot = account.snapshot();
        assert_eq!(snapshot.balance, Decimal::new(11, 0));
        assert_eq!(snapshot.opening_balance, Decimal::new(10, 0));
        assert_eq!(snapshot.transactions, 1);
        assert_eq!(snapshot.owner, "John Doe");
    }
}
