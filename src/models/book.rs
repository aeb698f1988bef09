//! Book model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Book row as stored: `books(book_id, title, author, genre, year, available)`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
    pub available: bool,
}

/// Borrowable book, without the availability flag (always true)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookListing {
    pub book_id: i32,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: i32,
}

/// Catalog search parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookSearchQuery {
    /// Case-insensitive substring matched against title, author and genre
    #[serde(default)]
    pub q: String,
}

/// Build an `ILIKE` pattern matching `term` literally as a substring.
pub fn substring_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
