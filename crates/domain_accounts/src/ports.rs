//! Accounts Domain Ports
//!
//! The `AccountRepository` trait is the only way the application layer
//! reaches persistent storage. Adapters:
//!
//! - **PostgreSQL Adapter**: `infra_db::PostgresAccountRepository`
//! - **In-memory Adapter**: [`memory::InMemoryAccountRepository`], for tests
//!   and local development (`mock` feature)
//!
//! # Usage
//!
//! ```rust,ignore
//! use domain_accounts::{AccountRepository, AccountService};
//! use std::sync::Arc;
//!
//! let repository: Arc<dyn AccountRepository> = Arc::new(PostgresAccountRepository::new(pool));
//! let service = AccountService::new(repository);
//! ```
//!
//! # Concurrency
//!
//! Repositories enforce a single writer per account with optimistic
//! versioning. `save` compares the version the account was loaded with
//! against the stored one and fails with `PortError::Conflict` on mismatch.

use async_trait::async_trait;

use core_kernel::{AccountId, DomainPort, HealthCheckable, PortError, UserId};

use crate::account::{Account, AccountSummary};

/// Persistence port for the account aggregate
///
/// Every lookup is scoped to an owner: an account that exists but belongs
/// to someone else is reported as absent.
#[async_trait]
pub trait AccountRepository: DomainPort + HealthCheckable {
    /// Lists the headers of every account the user owns
    async fn find_all_by_owner(&self, owner_id: UserId) -> Result<Vec<AccountSummary>, PortError>;

    /// Loads an account header without its transactions
    async fn find_by_id_and_owner(
        &self,
        id: AccountId,
        owner_id: UserId,
    ) -> Result<Option<AccountSummary>, PortError>;

    /// Loads the full aggregate, ready for mutation
    async fn find_with_transactions_by_id_and_owner(
        &self,
        id: AccountId,
        owner_id: UserId,
    ) -> Result<Option<Account>, PortError>;

    /// Inserts or updates the account and its transactions atomically
    ///
    /// # Returns
    ///
    /// The new stored version
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` if the stored version is not `account.version()`
    async fn save(&self, account: &Account) -> Result<u64, PortError>;

    /// Deletes an account together with its transactions
    ///
    /// Only an account stored under `account.owner_id()` is removed.
    async fn delete(&self, account: &Account) -> Result<(), PortError>;

    /// Deletes every account the user owns
    ///
    /// # Returns
    ///
    /// The number of accounts removed
    async fn delete_all_by_owner(&self, owner_id: UserId) -> Result<u64, PortError>;

    /// Deletes every account
    async fn delete_all(&self) -> Result<(), PortError>;
}

/// In-memory implementation of AccountRepository
#[cfg(any(test, feature = "mock"))]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::RwLock;
    use chrono::Utc;

    use core_kernel::{AdapterHealth, HealthCheckResult};

    /// Account store backed by a `HashMap`
    ///
    /// Clones share the same storage.
    #[derive(Debug, Default, Clone)]
    pub struct InMemoryAccountRepository {
        accounts: Arc<RwLock<HashMap<AccountId, Account>>>,
    }

    impl InMemoryAccountRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// Pre-populates the store, overwriting the accounts' versions to 1
        pub async fn with_accounts(accounts: Vec<Account>) -> Self {
            let repository = Self::new();
            {
                let mut store = repository.accounts.write().await;
                for mut account in accounts {
                    account.set_version(1);
                    store.insert(account.id(), account);
                }
            }
            repository
        }

        /// Number of stored accounts
        pub async fn len(&self) -> usize {
            self.accounts.read().await.len()
        }

        pub async fn is_empty(&self) -> bool {
            self.accounts.read().await.is_empty()
        }
    }

    impl DomainPort for InMemoryAccountRepository {}

    #[async_trait]
    impl HealthCheckable for InMemoryAccountRepository {
        async fn health_check(&self) -> HealthCheckResult {
            HealthCheckResult {
                adapter_id: "in-memory-account-repository".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms: 0,
                message: Some("In-memory adapter always healthy".to_string()),
                checked_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl AccountRepository for InMemoryAccountRepository {
        async fn find_all_by_owner(&self, owner_id: UserId) -> Result<Vec<AccountSummary>, PortError> {
            let store = self.accounts.read().await;
            let mut summaries: Vec<_> = store
                .values()
                .filter(|a| a.owner_id() == owner_id)
                .map(Account::summary)
                .collect();
            summaries.sort_by(|a, b| {
                a.name
                    .as_str()
                    .cmp(b.name.as_str())
                    .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
            });
            Ok(summaries)
        }

        async fn find_by_id_and_owner(
            &self,
            id: AccountId,
            owner_id: UserId,
        ) -> Result<Option<AccountSummary>, PortError> {
            Ok(self
                .accounts
                .read()
                .await
                .get(&id)
                .filter(|a| a.owner_id() == owner_id)
                .map(Account::summary))
        }

        async fn find_with_transactions_by_id_and_owner(
            &self,
            id: AccountId,
            owner_id: UserId,
        ) -> Result<Option<Account>, PortError> {
            Ok(self
                .accounts
                .read()
                .await
                .get(&id)
                .filter(|a| a.owner_id() == owner_id)
                .cloned())
        }

        async fn save(&self, account: &Account) -> Result<u64, PortError> {
            let mut store = self.accounts.write().await;

            let stored_version = store.get(&account.id()).map(Account::version).unwrap_or(0);
            if stored_version != account.version() {
                return Err(PortError::conflict(format!(
                    "account {} is at version {}, write was based on version {}",
                    account.id(),
                    stored_version,
                    account.version()
                )));
            }

            let next_version = stored_version + 1;
            let mut stored = account.clone();
            stored.set_version(next_version);
            store.insert(account.id(), stored);

            Ok(next_version)
        }

        async fn delete(&self, account: &Account) -> Result<(), PortError> {
            let mut store = self.accounts.write().await;
            if store
                .get(&account.id())
                .is_some_and(|stored| stored.owner_id() == account.owner_id())
            {
                store.remove(&account.id());
            }
            Ok(())
        }

        async fn delete_all_by_owner(&self, owner_id: UserId) -> Result<u64, PortError> {
            let mut store = self.accounts.write().await;
            let before = store.len();
            store.retain(|_, a| a.owner_id() != owner_id);
            Ok((before - store.len()) as u64)
        }

        async fn delete_all(&self) -> Result<(), PortError> {
            self.accounts.write().await.clear();
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::value_objects::{AccountBalance, AccountName};

        fn account(owner: UserId, name: &str) -> Account {
            Account::create(
                AccountId::new(),
                owner,
                AccountName::new(name).unwrap(),
                AccountBalance::zero(),
            )
        }

        #[tokio::test]
        async fn test_save_then_load_bumps_version() {
            let repository = InMemoryAccountRepository::new();
            let owner = UserId::new();
            let account = account(owner, "Checking");

            let version = repository.save(&account).await.unwrap();
            assert_eq!(version, 1);

            let loaded = repository
                .find_with_transactions_by_id_and_owner(account.id(), owner)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(loaded.version(), 1);
            assert_eq!(loaded.name(), account.name());
        }

        #[tokio::test]
        async fn test_stale_write_is_a_conflict() {
            let repository = InMemoryAccountRepository::new();
            let owner = UserId::new();
            let account = account(owner, "Checking");
            repository.save(&account).await.unwrap();

            // Still at version 0 in memory
            let error = repository.save(&account).await.unwrap_err();
            assert!(error.is_conflict());
        }

        #[tokio::test]
        async fn test_other_owner_sees_nothing() {
            let repository = InMemoryAccountRepository::new();
            let owner = UserId::new();
            let account = account(owner, "Checking");
            repository.save(&account).await.unwrap();

            let stranger = UserId::new();
            assert!(repository.find_by_id_and_owner(account.id(), stranger).await.unwrap().is_none());
            assert!(repository.find_all_by_owner(stranger).await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn test_list_is_sorted_by_name() {
            let owner = UserId::new();
            let repository = InMemoryAccountRepository::with_accounts(vec![
                account(owner, "Savings"),
                account(owner, "Cash"),
                account(owner, "Checking"),
            ])
            .await;

            let names: Vec<_> = repository
                .find_all_by_owner(owner)
                .await
                .unwrap()
                .into_iter()
                .map(|s| s.name.to_string())
                .collect();
            assert_eq!(names, vec!["Cash", "Checking", "Savings"]);
        }

        #[tokio::test]
        async fn test_delete_all_by_owner_counts_removed() {
            let owner = UserId::new();
            let other = UserId::new();
            let repository = InMemoryAccountRepository::with_accounts(vec![
                account(owner, "A"),
                account(owner, "B"),
                account(other, "C"),
            ])
            .await;

            assert_eq!(repository.delete_all_by_owner(owner).await.unwrap(), 2);
            assert_eq!(repository.len().await, 1);
        }

        #[tokio::test]
        async fn test_delete_removes_only_that_account() {
            let owner = UserId::new();
            let doomed = account(owner, "Old");
            let kept = account(owner, "Kept");
            let repository =
                InMemoryAccountRepository::with_accounts(vec![doomed.clone(), kept.clone()]).await;

            repository.delete(&doomed).await.unwrap();

            assert!(repository
                .find_with_transactions_by_id_and_owner(doomed.id(), owner)
                .await
                .unwrap()
                .is_none());
            assert!(repository.find_by_id_and_owner(kept.id(), owner).await.unwrap().is_some());
        }

        #[tokio::test]
        async fn test_delete_is_scoped_to_owner() {
            let owner = UserId::new();
            let stored = account(owner, "Checking");
            let repository = InMemoryAccountRepository::with_accounts(vec![stored.clone()]).await;

            let impostor = Account::rehydrate(crate::account::AccountRecord {
                owner_id: UserId::new(),
                ..record_of(&stored)
            })
            .unwrap();
            repository.delete(&impostor).await.unwrap();

            assert_eq!(repository.len().await, 1);
        }

        #[tokio::test]
        async fn test_delete_all_empties_the_store() {
            let repository = InMemoryAccountRepository::with_accounts(vec![
                account(UserId::new(), "A"),
                account(UserId::new(), "B"),
            ])
            .await;

            repository.delete_all().await.unwrap();

            assert!(repository.is_empty().await);
        }

        fn record_of(account: &Account) -> crate::account::AccountRecord {
            crate::account::AccountRecord {
                id: account.id(),
                owner_id: account.owner_id(),
                name: account.name().clone(),
                balance: account.balance(),
                closed: account.is_closed(),
                transactions: account.transactions().to_vec(),
                version: account.version(),
            }
        }
    }
}
