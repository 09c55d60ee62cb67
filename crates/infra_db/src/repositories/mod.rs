//! Repository implementations for domain aggregates
//!
//! Repositories encapsulate SQL and map between database rows and domain
//! types. Each one implements a domain port and reports failures as
//! `PortError`.

pub mod account;

pub use account::PostgresAccountRepository;
