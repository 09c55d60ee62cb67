//! Test Utilities Crate
//!
//! Shared test infrastructure, fixtures, and helpers for the envelope
//! ledger test suite.
//!
//! # Modules
//!
//! - `fixtures`: Pre-built test data for common values
//! - `builders`: Builders for accounts and in-memory services
//! - `database`: PostgreSQL test container management
//! - `assertions`: Ledger-aware assertion helpers
//! - `generators`: Property-based strategies, including random ledger operations

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
