//! Libris Library Management System
//!
//! Patrons register, log in, search the catalog and borrow books;
//! administrators see who holds what and check books back in. The same
//! operations are served as a server-rendered HTML interface and as a
//! REST JSON API.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod seed;
pub mod services;
pub mod ui;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/register", post(api::auth::register))
        .route("/auth/login", post(api::auth::login))
        .route("/auth/admin/login", post(api::auth::admin_login))
        .route("/auth/me", get(api::auth::me))
        // Books
        .route("/books", get(api::books::list_available))
        .route("/books/search", get(api::books::search))
        .route("/books/:id", get(api::books::get_book))
        // Loans
        .route("/loans", get(api::loans::list_outstanding).post(api::loans::borrow))
        .route("/loans/me", get(api::loans::my_loans))
        .route("/loans/:id/return", post(api::loans::return_book))
        .route("/history", get(api::loans::history))
        // Users
        .route("/users", get(api::users::list_users))
        .layer(cors)
        .with_state(state.clone());

    Router::new()
        .merge(ui::router(state))
        .nest("/api/v1", api_v1)
        .merge(api::openapi::create_openapi_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
