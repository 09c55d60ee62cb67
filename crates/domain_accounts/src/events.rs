//! Domain events consumed by the accounts domain
//!
//! The ledger produces no events of its own. It listens for the removal of
//! a user and deletes that user's accounts.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use core_kernel::UserId;
use crate::error::ServiceError;
use crate::services::AccountService;

/// Events published by other parts of the system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// A user account has been deleted
    UserDeleted {
        user_id: UserId,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent {
    pub fn user_deleted(user_id: UserId) -> Self {
        DomainEvent::UserDeleted {
            user_id,
            timestamp: Utc::now(),
        }
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            DomainEvent::UserDeleted { .. } => "UserDeleted",
        }
    }
}

/// Deletes all accounts of a user once the user is gone
#[derive(Clone)]
pub struct UserDeletedHandler {
    service: Arc<AccountService>,
}

impl UserDeletedHandler {
    pub fn new(service: Arc<AccountService>) -> Self {
        Self { service }
    }

    /// Handles one event
    ///
    /// # Returns
    ///
    /// The number of accounts removed
    pub async fn handle(&self, event: &DomainEvent) -> Result<u64, ServiceError> {
        match event {
            DomainEvent::UserDeleted { user_id, .. } => {
                info!(user_id = %user_id, event = event.event_type(), "handling event");
                self.service.delete_all_for_owner(*user_id).await
            }
        }
    }
}
