//! Custom Test Assertions
//!
//! Assertion helpers for ledger types that give more meaningful failure
//! messages than a bare `assert_eq!`.

use std::collections::HashSet;

use core_kernel::Money;
use domain_accounts::Account;
use rust_decimal::Decimal;

/// Asserts that the cached balance equals the sum of cleared amounts
/// and that transaction ids are unique
///
/// # Panics
///
/// Panics with the full ledger if either property is broken
pub fn assert_ledger_consistent(account: &Account) {
    let cleared = account
        .cleared_total()
        .expect("cleared total overflowed");

    assert_eq!(
        account.balance().value(),
        cleared,
        "Cached balance {} differs from cleared total {} for ledger {:#?}",
        account.balance(),
        cleared,
        account.transactions()
    );

    let mut seen = HashSet::new();
    for transaction in account.transactions() {
        assert!(
            seen.insert(transaction.id()),
            "Duplicate transaction id {} in account {}",
            transaction.id(),
            account.id()
        );
    }
}

/// Asserts the account balance, comparing numerically
pub fn assert_balance_eq(account: &Account, expected: Decimal) {
    assert_eq!(
        account.balance().value(),
        Money::new(expected),
        "Expected balance {}, got {}",
        expected,
        account.balance()
    );
}

/// Asserts that two accounts hold the same ledger
///
/// Versions are ignored so a freshly loaded account can be compared with
/// the one that was saved.
pub fn assert_same_ledger(actual: &Account, expected: &Account) {
    assert_eq!(actual.id(), expected.id(), "Account id mismatch");
    assert_eq!(actual.owner_id(), expected.owner_id(), "Owner mismatch");
    assert_eq!(actual.name(), expected.name(), "Name mismatch");
    assert_eq!(actual.balance(), expected.balance(), "Balance mismatch");
    assert_eq!(actual.is_closed(), expected.is_closed(), "Closed flag mismatch");
    assert_eq!(
        actual.transactions(),
        expected.transactions(),
        "Transactions differ (order matters)"
    );
}

/// Asserts that a Money value is zero
pub fn assert_money_zero(money: &Money) {
    assert!(money.is_zero(), "Expected zero money, got {}", money);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::AccountBuilder;
    use rust_decimal_macros::dec;

    #[test]
    fn test_consistent_ledger_passes() {
        let account = AccountBuilder::new()
            .with_initial_balance(Money::new(dec!(10)))
            .with_uncleared(Money::new(dec!(3)))
            .build();

        assert_ledger_consistent(&account);
        assert_balance_eq(&account, dec!(10.00));
    }

    #[test]
    #[should_panic(expected = "Expected balance")]
    fn test_balance_mismatch_panics() {
        let account = AccountBuilder::new().build();
        assert_balance_eq(&account, dec!(1));
    }
}
