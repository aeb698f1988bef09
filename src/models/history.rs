//! Borrow history (audit trail kept after return)

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// Row of `borrowed_books_history(user_id, user_name, book_id, book_title, issued_date, return_date)`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct HistoryEntry {
    pub user_id: i32,
    pub user_name: String,
    pub book_id: i32,
    pub book_title: String,
    pub issued_date: DateTime<Utc>,
    /// Null while the book is still out
    pub return_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Restrict to one borrower
    pub user_id: Option<i32>,
}
