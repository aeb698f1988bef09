//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, health, loans, users};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Libris API",
        version = "0.3.0",
        description = "Library Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::register,
        auth::login,
        auth::admin_login,
        auth::me,
        // Books
        books::list_available,
        books::search,
        books::get_book,
        // Loans
        loans::borrow,
        loans::return_book,
        loans::list_outstanding,
        loans::my_loans,
        loans::history,
        // Users
        users::list_users,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            crate::models::session::SessionClaims,
            crate::models::session::Role,
            // Books
            crate::models::book::Book,
            crate::models::book::BookListing,
            // Users
            crate::models::user::RegisterUser,
            crate::models::user::UserSummary,
            // Loans
            loans::BorrowRequest,
            loans::BorrowResponse,
            loans::ReturnRequest,
            loans::ReturnResponse,
            crate::models::transaction::Transaction,
            crate::models::transaction::OutstandingLoan,
            crate::models::transaction::ReturnReceipt,
            crate::models::history::HistoryEntry,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Registration and login"),
        (name = "books", description = "Catalog browsing and search"),
        (name = "loans", description = "Borrowing and returning"),
        (name = "users", description = "Registered users")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
