//! Account application service
//!
//! Every use case follows the same shape: load the aggregate scoped to the
//! acting user, apply one aggregate operation, save it under the optimistic
//! version check and log the outcome. A failed aggregate operation never
//! reaches `save`.

use std::sync::Arc;

use tracing::info;

use core_kernel::{AccountId, HealthCheckResult, TransactionId, UserId};
use crate::account::{Account, AccountSummary};
use crate::error::ServiceError;
use crate::ports::AccountRepository;
use crate::transaction::Transaction;
use crate::value_objects::{
    AccountBalance, AccountName, TransactionAmount, TransactionDate, TransactionMemo,
};

/// Command to open a new account
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub name: AccountName,
    pub initial_balance: AccountBalance,
}

/// Command to rename and rebalance an account
#[derive(Debug, Clone)]
pub struct UpdateAccount {
    pub name: AccountName,
    pub balance: AccountBalance,
}

/// Command to record a new transaction
///
/// `date` defaults to today and `memo` to the empty memo.
#[derive(Debug, Clone)]
pub struct AddTransaction {
    pub amount: TransactionAmount,
    pub date: Option<TransactionDate>,
    pub memo: Option<TransactionMemo>,
    pub cleared: bool,
}

/// Command to edit a transaction; `None` keeps the current value
#[derive(Debug, Clone, Default)]
pub struct UpdateTransaction {
    pub amount: Option<TransactionAmount>,
    pub date: Option<TransactionDate>,
    pub memo: Option<TransactionMemo>,
}

/// Application service for account use cases
#[derive(Clone)]
pub struct AccountService {
    repository: Arc<dyn AccountRepository>,
}

impl AccountService {
    pub fn new(repository: Arc<dyn AccountRepository>) -> Self {
        Self { repository }
    }

    /// Lists the headers of the user's accounts
    pub async fn list_accounts(&self, owner_id: UserId) -> Result<Vec<AccountSummary>, ServiceError> {
        Ok(self.repository.find_all_by_owner(owner_id).await?)
    }

    /// Opens a new account for the user
    ///
    /// # Returns
    ///
    /// The saved account, including its seeded opening transaction if any
    pub async fn create_account(
        &self,
        owner_id: UserId,
        command: CreateAccount,
    ) -> Result<Account, ServiceError> {
        let mut account = Account::create(
            AccountId::new_v7(),
            owner_id,
            command.name,
            command.initial_balance,
        );
        self.persist(&mut account).await?;

        info!(account_id = %account.id(), user_id = %owner_id, "account created");
        Ok(account)
    }

    /// Shows one account header
    pub async fn get_account(
        &self,
        owner_id: UserId,
        account_id: AccountId,
    ) -> Result<AccountSummary, ServiceError> {
        self.repository
            .find_by_id_and_owner(account_id, owner_id)
            .await?
            .ok_or(ServiceError::AccountNotFound(account_id))
    }

    /// Renames the account, then rebalances it
    ///
    /// The rebalance always appends a correcting transaction, even when the
    /// balance is unchanged.
    pub async fn update_account(
        &self,
        owner_id: UserId,
        account_id: AccountId,
        command: UpdateAccount,
    ) -> Result<Account, ServiceError> {
        let mut account = self.load(owner_id, account_id).await?;

        account.rename(command.name);
        let correction = account.rebalance(command.balance)?;
        self.persist(&mut account).await?;

        info!(
            account_id = %account_id,
            user_id = %owner_id,
            transaction_id = %correction.id(),
            "account updated"
        );
        Ok(account)
    }

    pub async fn close_account(&self, owner_id: UserId, account_id: AccountId) -> Result<(), ServiceError> {
        let mut account = self.load(owner_id, account_id).await?;
        account.close();
        self.persist(&mut account).await?;

        info!(account_id = %account_id, user_id = %owner_id, "account closed");
        Ok(())
    }

    pub async fn open_account(&self, owner_id: UserId, account_id: AccountId) -> Result<(), ServiceError> {
        let mut account = self.load(owner_id, account_id).await?;
        account.open();
        self.persist(&mut account).await?;

        info!(account_id = %account_id, user_id = %owner_id, "account opened");
        Ok(())
    }

    /// Lists the account's transactions in insertion order
    pub async fn list_transactions(
        &self,
        owner_id: UserId,
        account_id: AccountId,
    ) -> Result<Vec<Transaction>, ServiceError> {
        let account = self.load(owner_id, account_id).await?;
        Ok(account.transactions().to_vec())
    }

    pub async fn add_transaction(
        &self,
        owner_id: UserId,
        account_id: AccountId,
        command: AddTransaction,
    ) -> Result<Transaction, ServiceError> {
        let mut account = self.load(owner_id, account_id).await?;

        let transaction = account.add_transaction(
            command.amount,
            command.date.unwrap_or_else(TransactionDate::today),
            command.memo.unwrap_or_default(),
            command.cleared,
        )?;
        self.persist(&mut account).await?;

        info!(
            account_id = %account_id,
            user_id = %owner_id,
            transaction_id = %transaction.id(),
            "transaction added"
        );
        Ok(transaction)
    }

    pub async fn update_transaction(
        &self,
        owner_id: UserId,
        account_id: AccountId,
        transaction_id: TransactionId,
        command: UpdateTransaction,
    ) -> Result<Transaction, ServiceError> {
        let mut account = self.load(owner_id, account_id).await?;

        let transaction = account.update_transaction(
            transaction_id,
            command.amount,
            command.date,
            command.memo,
        )?;
        self.persist(&mut account).await?;

        info!(
            account_id = %account_id,
            user_id = %owner_id,
            transaction_id = %transaction_id,
            "transaction updated"
        );
        Ok(transaction)
    }

    pub async fn remove_transaction(
        &self,
        owner_id: UserId,
        account_id: AccountId,
        transaction_id: TransactionId,
    ) -> Result<(), ServiceError> {
        let mut account = self.load(owner_id, account_id).await?;
        account.remove_transaction(transaction_id)?;
        self.persist(&mut account).await?;

        info!(
            account_id = %account_id,
            user_id = %owner_id,
            transaction_id = %transaction_id,
            "transaction removed"
        );
        Ok(())
    }

    pub async fn clear_transaction(
        &self,
        owner_id: UserId,
        account_id: AccountId,
        transaction_id: TransactionId,
    ) -> Result<(), ServiceError> {
        let mut account = self.load(owner_id, account_id).await?;
        account.clear_transaction(transaction_id)?;
        self.persist(&mut account).await?;

        info!(
            account_id = %account_id,
            user_id = %owner_id,
            transaction_id = %transaction_id,
            "transaction cleared"
        );
        Ok(())
    }

    pub async fn unclear_transaction(
        &self,
        owner_id: UserId,
        account_id: AccountId,
        transaction_id: TransactionId,
    ) -> Result<(), ServiceError> {
        let mut account = self.load(owner_id, account_id).await?;
        account.unclear_transaction(transaction_id)?;
        self.persist(&mut account).await?;

        info!(
            account_id = %account_id,
            user_id = %owner_id,
            transaction_id = %transaction_id,
            "transaction uncleared"
        );
        Ok(())
    }

    /// Removes every account of a user that no longer exists
    ///
    /// # Returns
    ///
    /// The number of accounts deleted
    pub async fn delete_all_for_owner(&self, owner_id: UserId) -> Result<u64, ServiceError> {
        let deleted = self.repository.delete_all_by_owner(owner_id).await?;

        info!(user_id = %owner_id, deleted, "accounts deleted for user");
        Ok(deleted)
    }

    /// Reports the health of the underlying repository
    pub async fn health_check(&self) -> HealthCheckResult {
        self.repository.health_check().await
    }

    async fn load(&self, owner_id: UserId, account_id: AccountId) -> Result<Account, ServiceError> {
        self.repository
            .find_with_transactions_by_id_and_owner(account_id, owner_id)
            .await?
            .ok_or(ServiceError::AccountNotFound(account_id))
    }

    async fn persist(&self, account: &mut Account) -> Result<(), ServiceError> {
        let version = self.repository.save(account).await?;
        account.set_version(version);
        Ok(())
    }
}
