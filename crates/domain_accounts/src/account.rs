//! Account Aggregate Root
//!
//! The Account is the consistency boundary for a user's ledger. It owns its
//! transactions outright and is the only code allowed to change them.
//!
//! # Invariants
//!
//! - `balance` equals the sum of the amounts of all cleared transactions
//! - transaction ids are unique within the account
//! - transactions keep their insertion order
//!
//! Every mutating method computes the new balance (checked arithmetic) and
//! performs every lookup before it writes anything, so an `Err` always
//! leaves the account exactly as it was.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use core_kernel::{AccountId, Money, TransactionId, UserId};
use crate::error::AccountError;
use crate::transaction::Transaction;
use crate::value_objects::{
    AccountBalance, AccountName, TransactionAmount, TransactionDate, TransactionMemo,
};

/// Account header without its transactions
///
/// Returned by read paths that list or show accounts, where loading the full
/// ledger would be wasted work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub owner_id: UserId,
    pub name: AccountName,
    pub balance: AccountBalance,
    pub closed: bool,
}

/// Persisted state of an account, as read back by a repository
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub id: AccountId,
    pub owner_id: UserId,
    pub name: AccountName,
    pub balance: AccountBalance,
    pub closed: bool,
    pub transactions: Vec<Transaction>,
    pub version: u64,
}

/// The Account aggregate root
///
/// `closed` is informational; no operation here checks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    id: AccountId,
    owner_id: UserId,
    name: AccountName,
    balance: AccountBalance,
    closed: bool,
    transactions: Vec<Transaction>,
    /// Version for optimistic concurrency, managed by repositories
    #[serde(skip)]
    version: u64,
}

impl Account {
    /// Creates a new, open account
    ///
    /// A non-zero `initial_balance` is seeded as one cleared transaction
    /// dated today with an empty memo. A zero balance creates no transaction.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let account = Account::create(id, owner, AccountName::new("Checking")?, AccountBalance::zero());
    /// assert!(account.transactions().is_empty());
    /// ```
    pub fn create(
        id: AccountId,
        owner_id: UserId,
        name: AccountName,
        initial_balance: AccountBalance,
    ) -> Self {
        let mut transactions = Vec::new();

        if !initial_balance.value().is_zero() {
            transactions.push(Transaction::new(
                TransactionAmount::new(initial_balance.value()),
                TransactionDate::today(),
                TransactionMemo::empty(),
                true,
            ));
        }

        debug!(account_id = %id, user_id = %owner_id, balance = %initial_balance, "account created");

        Self {
            id,
            owner_id,
            name,
            balance: initial_balance,
            closed: false,
            transactions,
            version: 0,
        }
    }

    /// Rebuilds an account from persisted state
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Validation` if two transactions share an id.
    /// A stored balance that disagrees with the cleared transactions is
    /// logged and kept as stored.
    pub fn rehydrate(record: AccountRecord) -> Result<Self, AccountError> {
        let mut seen = HashSet::with_capacity(record.transactions.len());
        for transaction in &record.transactions {
            if !seen.insert(transaction.id()) {
                return Err(AccountError::validation(format!(
                    "duplicate transaction id {} in account {}",
                    transaction.id(),
                    record.id
                )));
            }
        }

        let account = Self {
            id: record.id,
            owner_id: record.owner_id,
            name: record.name,
            balance: record.balance,
            closed: record.closed,
            transactions: record.transactions,
            version: record.version,
        };

        let derived = account.cleared_total()?;
        if derived != account.balance.value() {
            warn!(
                account_id = %account.id,
                stored = %account.balance,
                derived = %derived,
                "stored balance disagrees with cleared transactions"
            );
        }

        Ok(account)
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    pub fn name(&self) -> &AccountName {
        &self.name
    }

    pub fn balance(&self) -> AccountBalance {
        self.balance
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Transactions in insertion order
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Looks up a transaction by id
    pub fn transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id() == id)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Returns the header of this account
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            owner_id: self.owner_id,
            name: self.name.clone(),
            balance: self.balance,
            closed: self.closed,
        }
    }

    /// Recomputes the sum of cleared amounts from the transactions
    ///
    /// This is O(n); [`balance`](Self::balance) is the cached equivalent.
    pub fn cleared_total(&self) -> Result<Money, AccountError> {
        self.sum_where(Transaction::is_cleared)
    }

    /// Sum of amounts still waiting to clear
    pub fn uncleared_total(&self) -> Result<Money, AccountError> {
        self.sum_where(|t| !t.is_cleared())
    }

    /// Replaces the account name
    pub fn rename(&mut self, name: AccountName) {
        self.name = name;
    }

    /// Sets the balance by appending a correcting transaction
    ///
    /// Existing transactions are never edited. The new cleared entry, dated
    /// today with an empty memo, carries `new_balance - balance`; it is
    /// appended even when that difference is zero.
    ///
    /// # Returns
    ///
    /// The correcting transaction
    pub fn rebalance(&mut self, new_balance: AccountBalance) -> Result<Transaction, AccountError> {
        let delta = new_balance.value().checked_sub(&self.balance.value())?;

        let transaction = Transaction::new(
            TransactionAmount::new(delta),
            TransactionDate::today(),
            TransactionMemo::empty(),
            true,
        );

        self.transactions.push(transaction.clone());
        self.balance = new_balance;

        debug!(account_id = %self.id, delta = %delta, balance = %self.balance, "account rebalanced");
        Ok(transaction)
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn open(&mut self) {
        self.closed = false;
    }

    /// Appends a new transaction
    ///
    /// A cleared transaction is folded into the balance immediately.
    ///
    /// # Returns
    ///
    /// A snapshot of the new transaction, including its generated id
    pub fn add_transaction(
        &mut self,
        amount: TransactionAmount,
        date: TransactionDate,
        memo: TransactionMemo,
        cleared: bool,
    ) -> Result<Transaction, AccountError> {
        let new_balance = if cleared {
            Some(self.balance.value().checked_add(&amount.value())?)
        } else {
            None
        };

        let transaction = Transaction::new(amount, date, memo, cleared);
        self.transactions.push(transaction.clone());

        if let Some(balance) = new_balance {
            self.balance = AccountBalance::new(balance);
        }

        debug!(account_id = %self.id, transaction_id = %transaction.id(), cleared, "transaction added");
        Ok(transaction)
    }

    /// Edits the fields of an existing transaction
    ///
    /// Fields passed as `None` keep their current value. When the transaction
    /// is cleared and its amount changes, the balance moves by the difference
    /// between the new and the old amount.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::TransactionNotFound` if no transaction has `id`
    pub fn update_transaction(
        &mut self,
        id: TransactionId,
        amount: Option<TransactionAmount>,
        date: Option<TransactionDate>,
        memo: Option<TransactionMemo>,
    ) -> Result<Transaction, AccountError> {
        let index = self.index_of(id)?;
        let current = &self.transactions[index];

        let new_balance = match amount {
            Some(new_amount) if current.is_cleared() => {
                let delta = new_amount.value().checked_sub(&current.amount().value())?;
                Some(self.balance.value().checked_add(&delta)?)
            }
            _ => None,
        };

        let transaction = &mut self.transactions[index];
        if let Some(amount) = amount {
            transaction.set_amount(amount);
        }
        if let Some(date) = date {
            transaction.set_date(date);
        }
        if let Some(memo) = memo {
            transaction.set_memo(memo);
        }
        let snapshot = transaction.clone();

        if let Some(balance) = new_balance {
            self.balance = AccountBalance::new(balance);
        }

        debug!(account_id = %self.id, transaction_id = %id, "transaction updated");
        Ok(snapshot)
    }

    /// Removes a transaction, taking a cleared amount back out of the balance
    ///
    /// # Returns
    ///
    /// The removed transaction
    pub fn remove_transaction(&mut self, id: TransactionId) -> Result<Transaction, AccountError> {
        let index = self.index_of(id)?;
        let current = &self.transactions[index];

        let new_balance = if current.is_cleared() {
            Some(self.balance.value().checked_sub(&current.amount().value())?)
        } else {
            None
        };

        let removed = self.transactions.remove(index);
        if let Some(balance) = new_balance {
            self.balance = AccountBalance::new(balance);
        }

        debug!(account_id = %self.id, transaction_id = %id, "transaction removed");
        Ok(removed)
    }

    /// Marks a transaction cleared and adds its amount to the balance
    ///
    /// Clearing an already cleared transaction does nothing.
    pub fn clear_transaction(&mut self, id: TransactionId) -> Result<(), AccountError> {
        let index = self.index_of(id)?;
        let current = &self.transactions[index];
        if current.is_cleared() {
            return Ok(());
        }

        let new_balance = self.balance.value().checked_add(&current.amount().value())?;
        self.transactions[index].clear();
        self.balance = AccountBalance::new(new_balance);

        debug!(account_id = %self.id, transaction_id = %id, "transaction cleared");
        Ok(())
    }

    /// Marks a transaction uncleared and subtracts its amount from the balance
    ///
    /// Unclearing an uncleared transaction does nothing.
    pub fn unclear_transaction(&mut self, id: TransactionId) -> Result<(), AccountError> {
        let index = self.index_of(id)?;
        let current = &self.transactions[index];
        if !current.is_cleared() {
            return Ok(());
        }

        let new_balance = self.balance.value().checked_sub(&current.amount().value())?;
        self.transactions[index].unclear();
        self.balance = AccountBalance::new(new_balance);

        debug!(account_id = %self.id, transaction_id = %id, "transaction uncleared");
        Ok(())
    }

    fn index_of(&self, id: TransactionId) -> Result<usize, AccountError> {
        self.transactions
            .iter()
            .position(|t| t.id() == id)
            .ok_or(AccountError::TransactionNotFound(id))
    }

    fn sum_where(&self, include: impl Fn(&Transaction) -> bool) -> Result<Money, AccountError> {
        self.transactions
            .iter()
            .filter(|t| include(t))
            .try_fold(Money::zero(), |total, t| total.checked_add(&t.amount().value()))
            .map_err(AccountError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn money(amount: Decimal) -> Money {
        Money::new(amount)
    }

    fn account_with(initial: Decimal) -> Account {
        Account::create(
            AccountId::new(),
            UserId::new(),
            AccountName::new("Checking").unwrap(),
            AccountBalance::new(money(initial)),
        )
    }

    #[test]
    fn test_zero_balance_creates_no_transaction() {
        let account = account_with(dec!(0));
        assert!(account.transactions().is_empty());
        assert!(account.balance().value().is_zero());
        assert!(!account.is_closed());
        assert_eq!(account.version(), 0);
    }

    #[test]
    fn test_initial_balance_is_seeded_as_cleared_transaction() {
        let account = account_with(dec!(100.00));
        let seed = &account.transactions()[0];

        assert_eq!(account.transactions().len(), 1);
        assert!(seed.is_cleared());
        assert!(seed.memo().is_empty());
        assert_eq!(seed.date(), TransactionDate::today());
        assert_eq!(seed.amount().value(), money(dec!(100.00)));
        assert_eq!(account.balance().value(), money(dec!(100.00)));
    }

    #[test]
    fn test_update_cleared_amount_moves_balance_by_difference() {
        let mut account = account_with(dec!(1000.00));
        let txn = account
            .add_transaction(
                TransactionAmount::new(money(dec!(100.00))),
                TransactionDate::today(),
                TransactionMemo::empty(),
                true,
            )
            .unwrap();

        account
            .update_transaction(txn.id(), Some(TransactionAmount::new(money(dec!(150.00)))), None, None)
            .unwrap();

        assert_eq!(account.balance().value(), money(dec!(1150.00)));
        assert_eq!(account.cleared_total().unwrap(), account.balance().value());
    }

    #[test]
    fn test_overflow_leaves_account_untouched() {
        let mut account = account_with(Decimal::MAX);
        let before = account.clone();

        let result = account.add_transaction(
            TransactionAmount::new(money(dec!(1))),
            TransactionDate::today(),
            TransactionMemo::empty(),
            true,
        );

        assert_eq!(result, Err(AccountError::Money(core_kernel::MoneyError::Overflow)));
        assert_eq!(account, before);
    }

    #[test]
    fn test_rehydrate_rejects_duplicate_transaction_ids() {
        let account = account_with(dec!(10));
        let seed = account.transactions()[0].clone();

        let record = AccountRecord {
            id: account.id(),
            owner_id: account.owner_id(),
            name: account.name().clone(),
            balance: AccountBalance::new(money(dec!(20))),
            closed: false,
            transactions: vec![seed.clone(), seed],
            version: 3,
        };

        assert!(matches!(Account::rehydrate(record), Err(AccountError::Validation(_))));
    }

    #[test]
    fn test_rehydrate_keeps_version() {
        let account = account_with(dec!(10));
        let record = AccountRecord {
            id: account.id(),
            owner_id: account.owner_id(),
            name: account.name().clone(),
            balance: account.balance(),
            closed: true,
            transactions: account.transactions().to_vec(),
            version: 7,
        };

        let restored = Account::rehydrate(record).unwrap();
        assert_eq!(restored.version(), 7);
        assert!(restored.is_closed());
        assert_eq!(restored.transactions(), account.transactions());
    }
}
