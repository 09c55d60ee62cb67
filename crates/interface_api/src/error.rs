//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use core_kernel::MoneyError;
use domain_accounts::{AccountError, ServiceError};

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// Request body failed field validation; one entry per failed rule
    #[error("Invalid fields: {}", .0.join(", "))]
    InvalidFields(Vec<String>),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", "Unauthorized".to_string()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, "validation_error", msg.clone()),
            ApiError::InvalidFields(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Request validation failed".to_string(),
            ),
        };

        let details = match self {
            ApiError::InvalidFields(fields) => Some(fields),
            _ => None,
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::AccountNotFound(_)
            | ServiceError::Domain(AccountError::TransactionNotFound(_)) => {
                warn!(error = %err, "resource not found");
                ApiError::NotFound(err.to_string())
            }
            ServiceError::Domain(AccountError::Validation(msg)) => ApiError::Validation(msg),
            ServiceError::Conflict(msg) => {
                warn!(error = %msg, "concurrent modification");
                ApiError::Conflict(msg)
            }
            ServiceError::Domain(AccountError::Money(e)) => ApiError::Validation(e.to_string()),
            ServiceError::Port(e) => {
                error!(error = %e, "repository failure");
                ApiError::Internal("repository failure".to_string())
            }
        }
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        ServiceError::Domain(err).into()
    }
}

impl From<MoneyError> for ApiError {
    fn from(err: MoneyError) -> Self {
        AccountError::from(err).into()
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter()
                    .map(move |e| format!("{}: {}", field, e.code))
            })
            .collect();
        fields.sort();
        ApiError::InvalidFields(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::{AccountId, PortError, TransactionId};

    fn status_of(error: ApiError) -> StatusCode {
        error.into_response().status()
    }

    #[test]
    fn test_not_found_mapping() {
        assert_eq!(
            status_of(ServiceError::AccountNotFound(AccountId::new()).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(AccountError::TransactionNotFound(TransactionId::new()).into()),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_validation_and_conflict_mapping() {
        assert_eq!(
            status_of(AccountError::validation("blank").into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(ServiceError::from(PortError::conflict("stale")).into()),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_money_error_is_unprocessable() {
        let error: ApiError = MoneyError::InvalidAmount("0.00004".to_string()).into();
        assert!(matches!(error, ApiError::Validation(_)));
        assert_eq!(status_of(error), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_field_errors_are_listed_in_details() {
        let error = ApiError::InvalidFields(vec!["name: length".to_string()]);
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["details"][0], "name: length");
    }

    #[test]
    fn test_port_failure_hides_details() {
        let error: ApiError = ServiceError::from(PortError::internal("password=secret")).into();
        assert!(matches!(error, ApiError::Internal(ref m) if !m.contains("secret")));
    }
}
