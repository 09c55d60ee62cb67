//! PostgreSQL account repository
//!
//! Implements the `AccountRepository` port on two tables:
//!
//! - `accounts`: one row per aggregate, carrying the cached balance and the
//!   optimistic concurrency `version`
//! - `account_transactions`: the ledger entries, ordered by `position`
//!
//! A save writes the header and every transaction inside one database
//! transaction. The header update only matches the version the aggregate
//! was loaded with, so a concurrent writer turns into `PortError::Conflict`.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PostgresAccountRepository};
//! use domain_accounts::{AccountRepository, AccountService};
//! use std::sync::Arc;
//!
//! let pool = create_pool(DatabaseConfig::new(url)).await?;
//! let repository: Arc<dyn AccountRepository> = Arc::new(PostgresAccountRepository::new(pool));
//! let service = AccountService::new(repository);
//! ```

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool, Postgres, Transaction as DbTransaction};
use tracing::{debug, instrument};
use uuid::Uuid;

use core_kernel::{
    AccountId, AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, Money, PortError,
    TransactionId, UserId,
};
use domain_accounts::{
    Account, AccountBalance, AccountName, AccountRecord, AccountRepository, AccountSummary,
    Transaction, TransactionAmount, TransactionDate, TransactionMemo,
};

use crate::error::DatabaseError;

/// Header row of the `accounts` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub balance: Decimal,
    pub closed: bool,
    pub version: i64,
}

/// Row of the `account_transactions` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransactionRow {
    pub id: Uuid,
    pub amount: Decimal,
    pub date_of_transaction: NaiveDate,
    pub memo: String,
    pub cleared: bool,
}

/// PostgreSQL-backed implementation of the AccountRepository port
#[derive(Debug, Clone)]
pub struct PostgresAccountRepository {
    pool: PgPool,
}

impl PostgresAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_header<'e>(
        executor: impl PgExecutor<'e>,
        id: AccountId,
        owner_id: UserId,
    ) -> Result<Option<AccountRow>, DatabaseError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, owner_id, name, balance, closed, version
            FROM accounts
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(*id.as_uuid())
        .bind(*owner_id.as_uuid())
        .fetch_optional(executor)
        .await?;

        Ok(row)
    }

    async fn fetch_transactions<'e>(
        executor: impl PgExecutor<'e>,
        account_id: Uuid,
    ) -> Result<Vec<TransactionRow>, DatabaseError> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, amount, date_of_transaction, memo, cleared
            FROM account_transactions
            WHERE account_id = $1
            ORDER BY position
            "#,
        )
        .bind(account_id)
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }

    async fn save_account(&self, account: &Account) -> Result<u64, DatabaseError> {
        let expected = to_db_version(account.version())?;
        let mut tx = self.pool.begin().await?;

        let written = if expected == 0 {
            sqlx::query(
                r#"
                INSERT INTO accounts (id, owner_id, name, balance, closed, version)
                VALUES ($1, $2, $3, $4, $5, 1)
                ON CONFLICT (id) DO NOTHING
                "#,
            )
            .bind(*account.id().as_uuid())
            .bind(*account.owner_id().as_uuid())
            .bind(account.name().as_str())
            .bind(account.balance().value().amount())
            .bind(account.is_closed())
            .execute(&mut *tx)
            .await?
            .rows_affected()
        } else {
            sqlx::query(
                r#"
                UPDATE accounts
                SET name = $3, balance = $4, closed = $5,
                    version = version + 1, updated_at = now()
                WHERE id = $1 AND owner_id = $2 AND version = $6
                "#,
            )
            .bind(*account.id().as_uuid())
            .bind(*account.owner_id().as_uuid())
            .bind(account.name().as_str())
            .bind(account.balance().value().amount())
            .bind(account.is_closed())
            .bind(expected)
            .execute(&mut *tx)
            .await?
            .rows_affected()
        };

        if written == 0 {
            return Err(DatabaseError::VersionConflict(format!(
                "account {} was modified or removed since version {}",
                account.id(),
                expected
            )));
        }

        write_transactions(&mut tx, account).await?;
        tx.commit().await?;

        debug!(account_id = %account.id(), version = expected + 1, "account saved");
        Ok(account.version() + 1)
    }

    /// Reads header and ledger from one REPEATABLE READ snapshot
    ///
    /// A save committing between the two queries would otherwise pair a
    /// header with another version's transactions.
    async fn load_account(
        &self,
        id: AccountId,
        owner_id: UserId,
    ) -> Result<Option<Account>, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let Some(header) = Self::fetch_header(&mut *tx, id, owner_id).await? else {
            tx.commit().await?;
            return Ok(None);
        };
        let rows = Self::fetch_transactions(&mut *tx, header.id).await?;
        tx.commit().await?;

        let transactions = rows
            .into_iter()
            .map(row_to_transaction)
            .collect::<Result<Vec<_>, _>>()?;

        let record = AccountRecord {
            id: AccountId::from_uuid(header.id),
            owner_id: UserId::from_uuid(header.owner_id),
            name: parse_name(header.name)?,
            balance: AccountBalance::new(Money::new(header.balance)),
            closed: header.closed,
            transactions,
            version: from_db_version(header.version)?,
        };

        Account::rehydrate(record)
            .map(Some)
            .map_err(DatabaseError::invalid_data)
    }
}

impl DomainPort for PostgresAccountRepository {}

#[async_trait]
impl HealthCheckable for PostgresAccountRepository {
    async fn health_check(&self) -> HealthCheckResult {
        let start = std::time::Instant::now();

        let result = sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult {
                adapter_id: "postgres-account-repository".to_string(),
                status: AdapterHealth::Healthy,
                latency_ms,
                message: None,
                checked_at: Utc::now(),
            },
            Err(e) => HealthCheckResult {
                adapter_id: "postgres-account-repository".to_string(),
                status: AdapterHealth::Unhealthy,
                latency_ms,
                message: Some(format!("Database error: {}", e)),
                checked_at: Utc::now(),
            },
        }
    }
}

#[async_trait]
impl AccountRepository for PostgresAccountRepository {
    #[instrument(skip(self), fields(user_id = %owner_id))]
    async fn find_all_by_owner(&self, owner_id: UserId) -> Result<Vec<AccountSummary>, PortError> {
        let rows = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, owner_id, name, balance, closed, version
            FROM accounts
            WHERE owner_id = $1
            ORDER BY name, id
            "#,
        )
        .bind(*owner_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(rows
            .into_iter()
            .map(row_to_summary)
            .collect::<Result<Vec<_>, _>>()?)
    }

    #[instrument(skip(self), fields(account_id = %id, user_id = %owner_id))]
    async fn find_by_id_and_owner(
        &self,
        id: AccountId,
        owner_id: UserId,
    ) -> Result<Option<AccountSummary>, PortError> {
        Ok(Self::fetch_header(&self.pool, id, owner_id)
            .await?
            .map(row_to_summary)
            .transpose()?)
    }

    #[instrument(skip(self), fields(account_id = %id, user_id = %owner_id))]
    async fn find_with_transactions_by_id_and_owner(
        &self,
        id: AccountId,
        owner_id: UserId,
    ) -> Result<Option<Account>, PortError> {
        Ok(self.load_account(id, owner_id).await?)
    }

    #[instrument(skip(self, account), fields(account_id = %account.id(), version = account.version()))]
    async fn save(&self, account: &Account) -> Result<u64, PortError> {
        Ok(self.save_account(account).await?)
    }

    #[instrument(skip(self, account), fields(account_id = %account.id(), user_id = %account.owner_id()))]
    async fn delete(&self, account: &Account) -> Result<(), PortError> {
        sqlx::query("DELETE FROM accounts WHERE id = $1 AND owner_id = $2")
            .bind(*account.id().as_uuid())
            .bind(*account.owner_id().as_uuid())
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %owner_id))]
    async fn delete_all_by_owner(&self, owner_id: UserId) -> Result<u64, PortError> {
        let result = sqlx::query("DELETE FROM accounts WHERE owner_id = $1")
            .bind(*owner_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> Result<(), PortError> {
        sqlx::query("DELETE FROM accounts")
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::from)?;
        Ok(())
    }
}

// =============================================================================
// Row Writing
// =============================================================================

/// Replaces the stored ledger of `account` with its in-memory transactions
///
/// Rows whose id is gone are deleted, the rest are upserted with their
/// current position. The position constraint is deferred to commit time so
/// that shifting rows never collide midway.
async fn write_transactions(
    tx: &mut DbTransaction<'_, Postgres>,
    account: &Account,
) -> Result<(), DatabaseError> {
    let account_id = *account.id().as_uuid();
    let kept: Vec<Uuid> = account
        .transactions()
        .iter()
        .map(|t| *t.id().as_uuid())
        .collect();

    sqlx::query("DELETE FROM account_transactions WHERE account_id = $1 AND NOT (id = ANY($2))")
        .bind(account_id)
        .bind(&kept)
        .execute(&mut **tx)
        .await?;

    for (index, transaction) in account.transactions().iter().enumerate() {
        let position = i32::try_from(index)
            .map_err(|_| DatabaseError::invalid_data("too many transactions in one account"))?;

        sqlx::query(
            r#"
            INSERT INTO account_transactions
                (id, account_id, position, amount, date_of_transaction, memo, cleared)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET position = EXCLUDED.position,
                amount = EXCLUDED.amount,
                date_of_transaction = EXCLUDED.date_of_transaction,
                memo = EXCLUDED.memo,
                cleared = EXCLUDED.cleared
            WHERE account_transactions.account_id = EXCLUDED.account_id
            "#,
        )
        .bind(*transaction.id().as_uuid())
        .bind(account_id)
        .bind(position)
        .bind(transaction.amount().value().amount())
        .bind(transaction.date().value())
        .bind(transaction.memo().as_str())
        .bind(transaction.is_cleared())
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

// =============================================================================
// Conversion Functions
// =============================================================================

fn row_to_summary(row: AccountRow) -> Result<AccountSummary, DatabaseError> {
    Ok(AccountSummary {
        id: AccountId::from_uuid(row.id),
        owner_id: UserId::from_uuid(row.owner_id),
        name: parse_name(row.name)?,
        balance: AccountBalance::new(Money::new(row.balance)),
        closed: row.closed,
    })
}

fn row_to_transaction(row: TransactionRow) -> Result<Transaction, DatabaseError> {
    Ok(Transaction::rehydrate(
        TransactionId::from_uuid(row.id),
        TransactionAmount::new(Money::new(row.amount)),
        TransactionDate::new(row.date_of_transaction),
        TransactionMemo::new(row.memo),
        row.cleared,
    ))
}

fn parse_name(name: String) -> Result<AccountName, DatabaseError> {
    AccountName::new(name).map_err(DatabaseError::invalid_data)
}

fn to_db_version(version: u64) -> Result<i64, DatabaseError> {
    i64::try_from(version).map_err(|_| DatabaseError::invalid_data(format!("version {version} out of range")))
}

fn from_db_version(version: i64) -> Result<u64, DatabaseError> {
    u64::try_from(version).map_err(|_| DatabaseError::invalid_data(format!("stored version {version} is negative")))
}
