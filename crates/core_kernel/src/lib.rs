//! Core Kernel - Foundational types shared by every ledger crate
//!
//! This crate provides the building blocks the domain and infrastructure
//! layers agree on:
//! - Money with precise decimal arithmetic
//! - Strongly-typed identifiers
//! - Port infrastructure for hexagonal adapters

pub mod money;
pub mod identifiers;
pub mod ports;
pub mod error;

pub use money::{Money, MoneyError};
pub use identifiers::{AccountId, TransactionId, UserId};
pub use ports::{AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, PortError};
pub use error::CoreError;
