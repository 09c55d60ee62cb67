//! Accounts Domain - Envelope Ledger
//!
//! This crate implements the ledger aggregate: an account that owns its
//! transactions and keeps a cached balance in step with them.
//!
//! # Balance Invariant
//!
//! After every mutating operation returns:
//!
//! ```text
//! balance == Σ amount of every cleared transaction
//! ```
//!
//! The balance is a materialised cache so reads stay O(1); every mutation
//! path (create, rebalance, add, update, remove, clear, unclear) adjusts it
//! in lock-step with the transaction it touches.
//!
//! # Architecture
//!
//! - **Aggregate**: [`Account`] is the only consistency boundary
//! - **Entity**: [`Transaction`] is owned by exactly one account
//! - **Value Objects**: names, amounts, dates and memos validated once
//! - **Port**: [`AccountRepository`] abstracts persistence
//! - **Application Service**: [`AccountService`] runs load, mutate, save
//!
//! # Example
//!
//! ```rust,ignore
//! use domain_accounts::{Account, AccountBalance, AccountName};
//!
//! let mut account = Account::create(
//!     AccountId::new(),
//!     owner,
//!     AccountName::new("Checking")?,
//!     AccountBalance::new(Money::new(dec!(1000.00))),
//! );
//! let txn = account.add_transaction(amount, date, memo, true)?;
//! account.clear_transaction(txn.id())?;
//! ```

pub mod account;
pub mod transaction;
pub mod value_objects;
pub mod events;
pub mod ports;
pub mod services;
pub mod error;

pub use account::{Account, AccountRecord, AccountSummary};
pub use transaction::Transaction;
pub use value_objects::{
    AccountBalance, AccountName, TransactionAmount, TransactionDate, TransactionMemo,
};
pub use events::{DomainEvent, UserDeletedHandler};
pub use ports::AccountRepository;
pub use services::{
    AccountService, AddTransaction, CreateAccount, UpdateAccount, UpdateTransaction,
};
pub use error::{AccountError, ServiceError};
