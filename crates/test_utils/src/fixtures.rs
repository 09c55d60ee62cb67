//! Pre-built Test Fixtures
//!
//! Ready-to-use values for the ledger. Fixed values are predictable for unit
//! tests; the `random_*` helpers use `fake` where any valid value will do.

use chrono::NaiveDate;
use core_kernel::{AccountId, Money, TransactionId, UserId};
use domain_accounts::{
    AccountBalance, AccountName, TransactionAmount, TransactionDate, TransactionMemo,
};
use fake::faker::lorem::en::{Sentence, Word};
use fake::Fake;
use rust_decimal_macros::dec;

/// Fixture for money values
pub struct MoneyFixtures;

impl MoneyFixtures {
    /// Opening balance used across scenario tests
    pub fn opening_balance() -> Money {
        Money::new(dec!(1000.00))
    }

    /// A typical incoming payment
    pub fn paycheck() -> Money {
        Money::new(dec!(200.00))
    }

    /// A typical outgoing payment
    pub fn grocery_bill() -> Money {
        Money::new(dec!(-50.00))
    }

    pub fn zero() -> Money {
        Money::zero()
    }
}

/// Fixture for account value objects
pub struct AccountFixtures;

impl AccountFixtures {
    pub fn checking_name() -> AccountName {
        AccountName::new("Checking").expect("fixture name is not blank")
    }

    pub fn savings_name() -> AccountName {
        AccountName::new("Savings").expect("fixture name is not blank")
    }

    /// A random, non-blank account name
    pub fn random_name() -> AccountName {
        let word: String = Word().fake();
        AccountName::new(format!("{word} account")).expect("generated name is not blank")
    }

    pub fn opening_balance() -> AccountBalance {
        AccountBalance::new(MoneyFixtures::opening_balance())
    }

    pub fn zero_balance() -> AccountBalance {
        AccountBalance::zero()
    }
}

/// Fixture for transaction value objects
pub struct TransactionFixtures;

impl TransactionFixtures {
    pub fn paycheck() -> TransactionAmount {
        TransactionAmount::new(MoneyFixtures::paycheck())
    }

    pub fn grocery_bill() -> TransactionAmount {
        TransactionAmount::new(MoneyFixtures::grocery_bill())
    }

    /// A fixed date, for tests that compare dates
    pub fn new_year() -> TransactionDate {
        TransactionDate::new(NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"))
    }

    pub fn month_end() -> TransactionDate {
        TransactionDate::new(NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid date"))
    }

    pub fn memo() -> TransactionMemo {
        TransactionMemo::new("Weekly shop")
    }

    /// A random memo of a few words
    pub fn random_memo() -> TransactionMemo {
        let sentence: String = Sentence(2..5).fake();
        TransactionMemo::new(sentence)
    }
}

/// Fixture for identifiers
pub struct IdFixtures;

impl IdFixtures {
    pub fn user_id() -> UserId {
        UserId::new()
    }

    pub fn account_id() -> AccountId {
        AccountId::new()
    }

    /// An id that no account will ever contain
    pub fn unknown_transaction_id() -> TransactionId {
        TransactionId::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_name_is_valid() {
        for _ in 0..20 {
            assert!(!AccountFixtures::random_name().as_str().trim().is_empty());
        }
    }

    #[test]
    fn test_fixed_dates() {
        assert_eq!(TransactionFixtures::new_year().to_string(), "2024-01-01");
        assert!(TransactionFixtures::new_year() < TransactionFixtures::month_end());
    }
}
