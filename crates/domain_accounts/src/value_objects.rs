//! Value objects for the accounts domain
//!
//! Each type wraps a primitive and enforces its rule once, at construction.
//! They are immutable: changing a field means building a new value and
//! replacing the old one.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use core_kernel::Money;
use crate::error::AccountError;

/// Display name of an account; never blank
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName(String);

impl AccountName {
    /// Creates a name, rejecting empty or whitespace-only input
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` if the name is blank
    pub fn new(value: impl Into<String>) -> Result<Self, AccountError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AccountError::validation("account name must not be blank"));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountName {
    type Error = AccountError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountName> for String {
    fn from(name: AccountName) -> String {
        name.0
    }
}

impl AsRef<str> for AccountName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cached balance of an account
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountBalance(Money);

impl AccountBalance {
    pub fn new(value: Money) -> Self {
        Self(value)
    }

    pub fn zero() -> Self {
        Self(Money::zero())
    }

    pub fn value(&self) -> Money {
        self.0
    }
}

impl From<Money> for AccountBalance {
    fn from(value: Money) -> Self {
        Self(value)
    }
}

impl FromStr for AccountBalance {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_money(s).map(Self)
    }
}

impl fmt::Display for AccountBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Signed amount of a single ledger entry; zero is allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionAmount(Money);

impl TransactionAmount {
    pub fn new(value: Money) -> Self {
        Self(value)
    }

    pub fn value(&self) -> Money {
        self.0
    }
}

impl From<Money> for TransactionAmount {
    fn from(value: Money) -> Self {
        Self(value)
    }
}

impl FromStr for TransactionAmount {
    type Err = AccountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_money(s).map(Self)
    }
}

impl fmt::Display for TransactionAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Calendar date of a transaction (no time component)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionDate(NaiveDate);

impl TransactionDate {
    pub fn new(value: NaiveDate) -> Self {
        Self(value)
    }

    /// The current date on the local calendar
    pub fn today() -> Self {
        Self(Local::now().date_naive())
    }

    pub fn value(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for TransactionDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl FromStr for TransactionDate {
    type Err = AccountError;

    /// Parses an ISO-8601 calendar date (`YYYY-MM-DD`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Self)
            .map_err(|_| AccountError::validation(format!("invalid transaction date: {s}")))
    }
}

impl fmt::Display for TransactionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// Free-text note on a transaction; may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionMemo(String);

impl TransactionMemo {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for TransactionMemo {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TransactionMemo {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for TransactionMemo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn parse_money(s: &str) -> Result<Money, AccountError> {
    s.parse::<Money>()
        .map_err(|e| AccountError::validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_blank_names_are_rejected() {
        assert!(AccountName::new("").is_err());
        assert!(AccountName::new("   ").is_err());
        assert!(AccountName::new("\t\n").is_err());
    }

    #[test]
    fn test_name_keeps_original_text() {
        let name = AccountName::new(" Checking ").unwrap();
        assert_eq!(name.as_str(), " Checking ");
    }

    #[test]
    fn test_name_deserialization_validates() {
        let ok: Result<AccountName, _> = serde_json::from_str("\"Savings\"");
        assert!(ok.is_ok());

        let blank: Result<AccountName, _> = serde_json::from_str("\"  \"");
        assert!(blank.is_err());
    }

    #[test]
    fn test_amount_parsing() {
        let amount: TransactionAmount = "-50.00".parse().unwrap();
        assert_eq!(amount.value().amount(), dec!(-50.00));

        let err = "fifty".parse::<TransactionAmount>().unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));
    }

    #[test]
    fn test_sub_scale_amount_is_rejected_not_rounded() {
        let err = "0.00004".parse::<TransactionAmount>().unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));

        let amount: TransactionAmount = "0.0001".parse().unwrap();
        assert_eq!(amount.value(), Money::new(dec!(0.0001)));
    }

    #[test]
    fn test_balance_parsing() {
        let balance: AccountBalance = "1000".parse().unwrap();
        assert_eq!(balance.value(), Money::new(dec!(1000)));
        assert!("".parse::<AccountBalance>().is_err());
    }

    #[test]
    fn test_date_parsing() {
        let date: TransactionDate = "2024-03-15".parse().unwrap();
        assert_eq!(date.value(), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(date.to_string(), "2024-03-15");

        assert!("2024-02-30".parse::<TransactionDate>().is_err());
        assert!("15/03/2024".parse::<TransactionDate>().is_err());
    }

    #[test]
    fn test_memo_allows_empty() {
        let memo = TransactionMemo::empty();
        assert!(memo.is_empty());
        assert_eq!(TransactionMemo::default(), memo);
    }
}
