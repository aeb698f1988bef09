//! Loan management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        history::{HistoryEntry, HistoryQuery},
        transaction::{OutstandingLoan, ReturnReceipt, Transaction},
    },
};

use super::AuthenticatedUser;

/// Borrow request
#[derive(Deserialize, ToSchema)]
pub struct BorrowRequest {
    /// Book to borrow
    pub book_id: i32,
}

/// Borrow response
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    /// Open transaction created for the loan
    pub transaction: Transaction,
    /// Status message
    pub message: String,
}

/// Return request
#[derive(Deserialize, Default, ToSchema)]
pub struct ReturnRequest {
    /// Book shown to the librarian; rejected if it differs from the loan's book
    pub book_id: Option<i32>,
}

/// Return response
#[derive(Serialize, ToSchema)]
pub struct ReturnResponse {
    /// Return status
    pub status: String,
    pub receipt: ReturnReceipt,
}

/// Borrow a book for the logged-in user
#[utoipa::path(
    post,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    request_body = BorrowRequest,
    responses(
        (status = 201, description = "Book borrowed", body = BorrowResponse),
        (status = 403, description = "Only users can borrow"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book is already borrowed")
    )
)]
pub async fn borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<BorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    let user_id = claims.require_user()?;

    let transaction = state.services.loans.borrow_book(user_id, request.book_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            transaction,
            message: "Book borrowed successfully!".to_string(),
        }),
    ))
}

/// Return a borrowed book (admin only)
#[utoipa::path(
    post,
    path = "/loans/{id}/return",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Transaction ID")
    ),
    request_body = ReturnRequest,
    responses(
        (status = 200, description = "Book returned", body = ReturnResponse),
        (status = 400, description = "Book does not match the transaction"),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "Transaction not found")
    )
)]
pub async fn return_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(transaction_id): Path<i32>,
    request: Option<Json<ReturnRequest>>,
) -> AppResult<Json<ReturnResponse>> {
    claims.require_admin()?;

    let Json(request) = request.unwrap_or_default();
    let receipt = state
        .services
        .loans
        .return_book(transaction_id, request.book_id)
        .await?;

    Ok(Json(ReturnResponse {
        status: "returned".to_string(),
        receipt,
    }))
}

/// List outstanding loans (admin only)
#[utoipa::path(
    get,
    path = "/loans",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Outstanding loans", body = Vec<OutstandingLoan>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_outstanding(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<OutstandingLoan>>> {
    claims.require_admin()?;

    let loans = state.services.loans.outstanding_loans().await?;
    Ok(Json(loans))
}

/// List the logged-in user's outstanding loans
#[utoipa::path(
    get,
    path = "/loans/me",
    tag = "loans",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's outstanding loans", body = Vec<OutstandingLoan>),
        (status = 403, description = "Only users hold loans")
    )
)]
pub async fn my_loans(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<OutstandingLoan>>> {
    let user_id = claims.require_user()?;

    let loans = state.services.loans.user_loans(user_id).await?;
    Ok(Json(loans))
}

/// Borrow history (admin only)
#[utoipa::path(
    get,
    path = "/history",
    tag = "loans",
    security(("bearer_auth" = [])),
    params(HistoryQuery),
    responses(
        (status = 200, description = "History rows, newest first", body = Vec<HistoryEntry>),
        (status = 403, description = "Admin privileges required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn history(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<Vec<HistoryEntry>>> {
    claims.require_admin()?;

    let entries = state.services.loans.history(query.user_id).await?;
    Ok(Json(entries))
}
