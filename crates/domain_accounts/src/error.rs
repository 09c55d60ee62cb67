//! Accounts domain errors

use thiserror::Error;

use core_kernel::{AccountId, MoneyError, PortError, TransactionId};

/// Errors raised by the account aggregate and its value objects
///
/// A failed operation never leaves the aggregate partially modified.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    /// A value object or aggregate failed validation at construction
    #[error("Validation error: {0}")]
    Validation(String),

    /// No transaction with this id belongs to the account
    #[error("Transaction not found: {0}")]
    TransactionNotFound(TransactionId),

    /// Balance arithmetic failed
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),
}

impl AccountError {
    /// Creates a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        AccountError::Validation(message.into())
    }
}

/// Errors returned by the account application service
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No account with this id exists for the acting user
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// Another writer saved the account after it was loaded
    #[error("Concurrent modification: {0}")]
    Conflict(String),

    /// The aggregate rejected the operation
    #[error(transparent)]
    Domain(#[from] AccountError),

    /// The repository failed
    #[error("Repository error: {0}")]
    Port(PortError),
}

impl From<PortError> for ServiceError {
    fn from(error: PortError) -> Self {
        match error {
            PortError::Conflict { message } => ServiceError::Conflict(message),
            other => ServiceError::Port(other),
        }
    }
}

impl ServiceError {
    /// Returns true if the error refers to a missing account or transaction
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ServiceError::AccountNotFound(_)
                | ServiceError::Domain(AccountError::TransactionNotFound(_))
        )
    }
}
