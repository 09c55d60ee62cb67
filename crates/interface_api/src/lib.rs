//! HTTP API Layer
//!
//! REST surface over the account ledger, built on Axum.
//!
//! # Architecture
//!
//! - **Handlers**: account, transaction and health endpoints
//! - **Middleware**: bearer authentication and audit logging
//! - **DTOs**: request/response bodies and their conversion to commands
//! - **Error Handling**: consistent JSON error responses
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::new(service, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod auth;
pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, patch, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_accounts::AccountService;

use crate::config::ApiConfig;
use crate::handlers::{accounts, health};
use crate::middleware::{audit_middleware, auth_middleware};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AccountService>,
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(service: Arc<AccountService>, config: ApiConfig) -> Self {
        Self { service, config }
    }
}

/// Creates the main API router
///
/// Health endpoints are public; everything under `/api/v1` requires a
/// bearer token.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let account_routes = Router::new()
        .route("/", get(accounts::list_accounts).post(accounts::create_account))
        .route("/:id", get(accounts::get_account).put(accounts::update_account))
        .route("/:id/close", patch(accounts::close_account))
        .route("/:id/open", patch(accounts::open_account))
        .route(
            "/:id/transactions",
            get(accounts::list_transactions).post(accounts::add_transaction),
        )
        .route(
            "/:id/transactions/:transaction_id",
            put(accounts::update_transaction).delete(accounts::remove_transaction),
        )
        .route(
            "/:id/transactions/:transaction_id/clear",
            patch(accounts::clear_transaction),
        )
        .route(
            "/:id/transactions/:transaction_id/unclear",
            patch(accounts::unclear_transaction),
        );

    let api_routes = Router::new()
        .nest("/accounts", account_routes)
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
