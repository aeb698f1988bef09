//! Open loans (`transactions`) and return receipts

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Row of `transactions(transaction_id, user_id, book_id, borrow_date)`.
/// Exists only while the loan is outstanding.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Transaction {
    pub transaction_id: i32,
    pub user_id: i32,
    pub book_id: i32,
    pub borrow_date: DateTime<Utc>,
}

/// Outstanding loan joined with borrower name and book title
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OutstandingLoan {
    pub transaction_id: i32,
    pub user_name: String,
    pub book_title: String,
    pub borrow_date: DateTime<Utc>,
    pub book_id: i32,
}

/// Outcome of a successful return
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReturnReceipt {
    pub transaction_id: i32,
    pub user_id: i32,
    pub user_name: String,
    pub book_id: i32,
    pub book_title: String,
    pub borrow_date: DateTime<Utc>,
    pub return_date: NaiveDate,
}
