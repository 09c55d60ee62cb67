//! Test Data Builders
//!
//! Builders let a test state only the fields it cares about and take
//! defaults for everything else. Accounts are always built through the
//! aggregate's own operations, so a built account satisfies the same
//! invariants as one produced in production.

use std::sync::Arc;

use core_kernel::{AccountId, Money, UserId};
use domain_accounts::ports::memory::InMemoryAccountRepository;
use domain_accounts::{
    Account, AccountBalance, AccountName, AccountService, TransactionAmount, TransactionDate,
    TransactionMemo,
};

use crate::fixtures::{AccountFixtures, TransactionFixtures};

#[derive(Debug, Clone)]
struct PendingTransaction {
    amount: TransactionAmount,
    date: TransactionDate,
    memo: TransactionMemo,
    cleared: bool,
}

/// Builder for accounts with a pre-filled ledger
///
/// # Example
///
/// ```rust,ignore
/// let account = AccountBuilder::new()
///     .with_initial_balance(Money::new(dec!(100)))
///     .with_cleared(Money::new(dec!(20)))
///     .with_uncleared(Money::new(dec!(-5)))
///     .build();
/// ```
pub struct AccountBuilder {
    id: AccountId,
    owner_id: UserId,
    name: AccountName,
    initial_balance: AccountBalance,
    transactions: Vec<PendingTransaction>,
    closed: bool,
}

impl Default for AccountBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AccountBuilder {
    /// Creates a builder for an empty, open "Checking" account
    pub fn new() -> Self {
        Self {
            id: AccountId::new(),
            owner_id: UserId::new(),
            name: AccountFixtures::checking_name(),
            initial_balance: AccountBalance::zero(),
            transactions: Vec::new(),
            closed: false,
        }
    }

    pub fn with_id(mut self, id: AccountId) -> Self {
        self.id = id;
        self
    }

    pub fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = owner_id;
        self
    }

    /// Sets the name
    ///
    /// # Panics
    ///
    /// Panics if `name` is blank
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = AccountName::new(name).expect("builder name must not be blank");
        self
    }

    pub fn with_initial_balance(mut self, balance: Money) -> Self {
        self.initial_balance = AccountBalance::new(balance);
        self
    }

    /// Appends a cleared transaction dated on the fixed test date
    pub fn with_cleared(self, amount: Money) -> Self {
        self.with_transaction(amount, TransactionFixtures::new_year(), "", true)
    }

    /// Appends an uncleared transaction dated on the fixed test date
    pub fn with_uncleared(self, amount: Money) -> Self {
        self.with_transaction(amount, TransactionFixtures::new_year(), "", false)
    }

    pub fn with_transaction(
        mut self,
        amount: Money,
        date: TransactionDate,
        memo: &str,
        cleared: bool,
    ) -> Self {
        self.transactions.push(PendingTransaction {
            amount: TransactionAmount::new(amount),
            date,
            memo: TransactionMemo::new(memo),
            cleared,
        });
        self
    }

    pub fn closed(mut self) -> Self {
        self.closed = true;
        self
    }

    /// Builds the account by replaying create and add operations
    ///
    /// # Panics
    ///
    /// Panics if a transaction overflows the balance
    pub fn build(self) -> Account {
        let mut account = Account::create(self.id, self.owner_id, self.name, self.initial_balance);

        for pending in self.transactions {
            account
                .add_transaction(pending.amount, pending.date, pending.memo, pending.cleared)
                .expect("builder transaction must not overflow");
        }

        if self.closed {
            account.close();
        }

        account
    }
}

/// An account service wired to an in-memory repository
///
/// The repository handle shares storage with the service, so tests can
/// inspect or seed it directly.
pub struct InMemoryService {
    pub service: Arc<AccountService>,
    pub repository: InMemoryAccountRepository,
}

impl InMemoryService {
    pub fn new() -> Self {
        Self::with_repository(InMemoryAccountRepository::new())
    }

    /// Seeds the repository with existing accounts
    pub async fn with_accounts(accounts: Vec<Account>) -> Self {
        Self::with_repository(InMemoryAccountRepository::with_accounts(accounts).await)
    }

    fn with_repository(repository: InMemoryAccountRepository) -> Self {
        let service = Arc::new(AccountService::new(Arc::new(repository.clone())));
        Self { service, repository }
    }
}

impl Default for InMemoryService {
    fn default() -> Self {
        Self::new()
    }
}
