//! Infrastructure Database Layer
//!
//! PostgreSQL persistence for the envelope ledger using SQLx.
//!
//! # Architecture
//!
//! The crate follows the repository pattern: `PostgresAccountRepository`
//! implements the `AccountRepository` port from `domain_accounts`, so the
//! domain layer never sees SQL or connection handling.
//!
//! Schema changes live in `migrations/` and are embedded into the binary;
//! [`run_migrations`] applies them at startup.
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, run_migrations, DatabaseConfig, PostgresAccountRepository};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/envelope")).await?;
//! run_migrations(&pool).await?;
//! let repository = PostgresAccountRepository::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod repositories;

pub use pool::{DatabasePool, DatabaseConfig, create_pool, create_pool_from_url, run_migrations};
pub use error::DatabaseError;
pub use repositories::PostgresAccountRepository;
