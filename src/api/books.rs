//! Catalog endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookListing, BookSearchQuery},
};

use super::AuthenticatedUser;

/// List books available for borrowing
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Available books", body = Vec<BookListing>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn list_available(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BookListing>>> {
    let books = state.services.catalog.available_books().await?;
    Ok(Json(books))
}

/// Search books by title, author or genre
#[utoipa::path(
    get,
    path = "/books/search",
    tag = "books",
    security(("bearer_auth" = [])),
    params(BookSearchQuery),
    responses(
        (status = 200, description = "Matching books, available or not", body = Vec<Book>),
        (status = 400, description = "Empty query"),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn search(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<BookSearchQuery>,
) -> AppResult<Json<Vec<Book>>> {
    let books = state.services.catalog.search_books(&query.q).await?;
    Ok(Json(books))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book", body = Book),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Book>> {
    let book = state.services.catalog.get_book(id).await?;
    Ok(Json(book))
}
