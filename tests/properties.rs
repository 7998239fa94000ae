//! Property tests for the ledger core
//!
//! Amounts are generated as integer minor units (four decimal places) so the
//! expected balances can be computed exactly.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_ledger_engine::core::validator::{validate_account_id, validate_amount, validate_decimal};
use rust_ledger_engine::{Account, AccountId, Amount, Ledger, TransactionStatus};

fn id(raw: &str) -> AccountId {
    validate_account_id(raw).unwrap()
}

fn minor(units: i64) -> Decimal {
    Decimal::new(units, 4)
}

fn amount(units: i64) -> Amount {
    validate_decimal(minor(units)).unwrap()
}

#[derive(Debug, Clone)]
enum Op {
    Deposit(i64),
    Withdraw(i64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..10_000_000).prop_map(Op::Deposit),
        (1i64..10_000_000).prop_map(Op::Withdraw),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Property: zero and negative amounts are always rejected with E001.
    #[test]
    fn non_positive_amounts_are_rejected(units in i64::MIN / 2..=0i64) {
        let raw = minor(units).to_string();
        let error = validate_amount(&raw).unwrap_err();
        prop_assert_eq!(error.error_code(), "E001");
    }

    /// Property: ids outside 8..=12 alphanumeric characters are rejected.
    #[test]
    fn ids_outside_length_bounds_are_rejected(raw in "[A-Za-z0-9]{0,7}|[A-Za-z0-9]{13,20}") {
        let error = validate_account_id(&raw).unwrap_err();
        prop_assert_eq!(error.error_code(), "E005");
    }

    /// Property: the balance equals the opening balance plus every completed
    /// credit minus every completed debit, one history record is appended
    /// per attempt, and the balance never goes negative.
    #[test]
    fn balance_matches_completed_history(
        opening in 0i64..10_000_000,
        ops in prop::collection::vec(op_strategy(), 0..40)
    ) {
        let mut account = Account::open(id("PROPTEST01"), "Owner", minor(opening)).unwrap();
        let mut expected = minor(opening);

        for op in &ops {
            match *op {
                Op::Deposit(units) => {
                    account.deposit(amount(units)).unwrap();
                    expected += minor(units);
                }
                Op::Withdraw(units) => {
                    let result = account.withdraw(amount(units));
                    if minor(units) <= expected {
                        prop_assert!(result.is_ok());
                        expected -= minor(units);
                    } else {
                        prop_assert_eq!(result.unwrap_err().error_code(), "T001");
                    }
                }
            }
            prop_assert!(account.balance() >= Decimal::ZERO);
        }

        prop_assert_eq!(account.balance(), expected);
        prop_assert_eq!(account.history().len(), ops.len());
        prop_assert!(account.verify_integrity().is_ok());

        for record in account.history() {
            prop_assert_eq!(
                record.error().is_some(),
                record.status() == TransactionStatus::Failed
            );
        }
    }

    /// Property: a transfer never changes the combined balance, whether it
    /// succeeds or is rejected.
    #[test]
    fn transfers_conserve_funds(
        a in 0i64..1_000_000,
        b in 0i64..1_000_000,
        transfers in prop::collection::vec((any::<bool>(), 1i64..2_000_000), 1..20)
    ) {
        let mut ledger = Ledger::new();
        ledger.open_account(id("ACCOUNTA1"), "Alice", minor(a)).unwrap();
        ledger.open_account(id("ACCOUNTB1"), "Bob", minor(b)).unwrap();
        let total = minor(a) + minor(b);

        for (forward, units) in transfers {
            let (from, to) = if forward {
                (id("ACCOUNTA1"), id("ACCOUNTB1"))
            } else {
                (id("ACCOUNTB1"), id("ACCOUNTA1"))
            };
            let _ = ledger.transfer(&from, &to, amount(units));
            prop_assert_eq!(ledger.total_funds(), total);
        }

        for account in ledger.accounts() {
            prop_assert!(account.balance() >= Decimal::ZERO);
            prop_assert!(account.verify_integrity().is_ok());
        }
    }
}
