//! Account handlers
//!
//! Every handler acts on behalf of the [`AuthUser`] extracted from the
//! bearer token; accounts of other users answer 404.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use core_kernel::{AccountId, TransactionId};

use crate::auth::AuthUser;
use crate::dto::accounts::*;
use crate::{AppState, error::ApiError};

/// Lists the caller's accounts
pub async fn list_accounts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<AccountListResponse>, ApiError> {
    let summaries = state.service.list_accounts(user).await?;
    Ok(Json(summaries.into()))
}

/// Opens an account; answers 201 with a `Location` header
pub async fn create_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(request): Json<CreateAccountRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = request.into_command()?;
    let account = state.service.create_account(user, command).await?;

    let location = format!("/api/v1/accounts/{}", account.id().as_uuid());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(AccountResponse::from(&account)),
    ))
}

pub async fn get_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountResponse>, ApiError> {
    let summary = state
        .service
        .get_account(user, AccountId::from_uuid(id))
        .await?;
    Ok(Json(AccountResponse::from(&summary)))
}

/// Renames and rebalances an account
pub async fn update_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<AccountResponse>, ApiError> {
    let command = request.into_command()?;
    let account = state
        .service
        .update_account(user, AccountId::from_uuid(id), command)
        .await?;
    Ok(Json(AccountResponse::from(&account)))
}

pub async fn close_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.close_account(user, AccountId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn open_account(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.service.open_account(user, AccountId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_transactions(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<TransactionListResponse>, ApiError> {
    let transactions = state
        .service
        .list_transactions(user, AccountId::from_uuid(id))
        .await?;
    Ok(Json(transactions.into()))
}

/// Records a transaction; answers 201 with a `Location` header
pub async fn add_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
    Json(request): Json<AddTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let command = request.into_command()?;
    let transaction = state
        .service
        .add_transaction(user, AccountId::from_uuid(id), command)
        .await?;

    let location = format!("/api/v1/accounts/{}/transactions", id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(TransactionResponse::from(&transaction)),
    ))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((account_id, transaction_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let command = request.into_command()?;
    let transaction = state
        .service
        .update_transaction(
            user,
            AccountId::from_uuid(account_id),
            TransactionId::from_uuid(transaction_id),
            command,
        )
        .await?;
    Ok(Json(TransactionResponse::from(&transaction)))
}

pub async fn remove_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((account_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .remove_transaction(
            user,
            AccountId::from_uuid(account_id),
            TransactionId::from_uuid(transaction_id),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((account_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .clear_transaction(
            user,
            AccountId::from_uuid(account_id),
            TransactionId::from_uuid(transaction_id),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn unclear_transaction(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path((account_id, transaction_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    state
        .service
        .unclear_transaction(
            user,
            AccountId::from_uuid(account_id),
            TransactionId::from_uuid(transaction_id),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
