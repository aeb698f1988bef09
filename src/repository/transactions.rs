//! Loans repository: open `transactions` rows and the borrow history

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Pool, Postgres, Row};

use crate::{
    error::{AppError, AppResult},
    models::{
        history::HistoryEntry,
        transaction::{OutstandingLoan, ReturnReceipt, Transaction},
    },
};

#[derive(Clone)]
pub struct TransactionsRepository {
    pool: Pool<Postgres>,
}

impl TransactionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Borrow a book: mark it unavailable, open a transaction and append a
    /// history row, all in one database transaction.
    ///
    /// The availability flag is flipped with a conditional update, so two
    /// concurrent borrowers of the same book cannot both succeed.
    pub async fn borrow(&self, user_id: i32, book_id: i32) -> AppResult<Transaction> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let user_name: String = sqlx::query_scalar("SELECT name FROM users WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::user_not_found(user_id))?;

        let book_title: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE books SET available = FALSE
            WHERE book_id = $1 AND available = TRUE
            RETURNING title
            "#,
        )
        .bind(book_id)
        .fetch_optional(&mut *tx)
        .await?;

        let book_title = match book_title {
            Some(title) => title,
            None => {
                let exists: bool =
                    sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM books WHERE book_id = $1)")
                        .bind(book_id)
                        .fetch_one(&mut *tx)
                        .await?;
                return Err(if exists {
                    AppError::Unavailable("Book is already borrowed".to_string())
                } else {
                    AppError::book_not_found(book_id)
                });
            }
        };

        let transaction = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (user_id, book_id, borrow_date)
            VALUES ($1, $2, $3)
            RETURNING transaction_id, user_id, book_id, borrow_date
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO borrowed_books_history (user_id, user_name, book_id, book_title, issued_date)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(user_id)
        .bind(&user_name)
        .bind(book_id)
        .bind(&book_title)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(transaction)
    }

    /// Return a book: restore availability, close the history row and delete
    /// the open transaction. Nothing is written when the transaction is unknown.
    ///
    /// `expected_book_id`, when given, must match the book on the transaction.
    pub async fn return_book(
        &self,
        transaction_id: i32,
        expected_book_id: Option<i32>,
    ) -> AppResult<ReturnReceipt> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT t.transaction_id, t.user_id, t.book_id, t.borrow_date,
                   u.name AS user_name, b.title AS book_title
            FROM transactions t
            JOIN users u ON t.user_id = u.user_id
            JOIN books b ON t.book_id = b.book_id
            WHERE t.transaction_id = $1
            FOR UPDATE OF t
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(AppError::transaction_not_found)?;

        let user_id: i32 = row.get("user_id");
        let book_id: i32 = row.get("book_id");
        let borrow_date: DateTime<Utc> = row.get("borrow_date");

        if let Some(expected) = expected_book_id {
            if expected != book_id {
                return Err(AppError::BadRequest(format!(
                    "Transaction {} is for book {}, not book {}",
                    transaction_id, book_id, expected
                )));
            }
        }

        sqlx::query("UPDATE books SET available = TRUE WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut *tx)
            .await?;

        let return_date: NaiveDate = sqlx::query_scalar("SELECT CURRENT_DATE")
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            r#"
            UPDATE borrowed_books_history
            SET return_date = $3
            WHERE user_id = $1 AND book_id = $2 AND return_date IS NULL
            "#,
        )
        .bind(user_id)
        .bind(book_id)
        .bind(return_date)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM transactions WHERE transaction_id = $1")
            .bind(transaction_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(ReturnReceipt {
            transaction_id,
            user_id,
            user_name: row.get("user_name"),
            book_id,
            book_title: row.get("book_title"),
            borrow_date,
            return_date,
        })
    }

    /// All outstanding loans with borrower name and book title
    pub async fn list_outstanding(&self) -> AppResult<Vec<OutstandingLoan>> {
        let loans = sqlx::query_as::<_, OutstandingLoan>(
            r#"
            SELECT t.transaction_id, u.name AS user_name, b.title AS book_title,
                   t.borrow_date, b.book_id
            FROM transactions t
            JOIN users u ON t.user_id = u.user_id
            JOIN books b ON t.book_id = b.book_id
            ORDER BY t.borrow_date, t.transaction_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Outstanding loans of one user
    pub async fn list_for_user(&self, user_id: i32) -> AppResult<Vec<OutstandingLoan>> {
        let loans = sqlx::query_as::<_, OutstandingLoan>(
            r#"
            SELECT t.transaction_id, u.name AS user_name, b.title AS book_title,
                   t.borrow_date, b.book_id
            FROM transactions t
            JOIN users u ON t.user_id = u.user_id
            JOIN books b ON t.book_id = b.book_id
            WHERE t.user_id = $1
            ORDER BY t.borrow_date, t.transaction_id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(loans)
    }

    /// Borrow history, newest first, optionally for a single user
    pub async fn history(&self, user_id: Option<i32>) -> AppResult<Vec<HistoryEntry>> {
        let entries = sqlx::query_as::<_, HistoryEntry>(
            r#"
            SELECT user_id, user_name, book_id, book_title, issued_date, return_date
            FROM borrowed_books_history
            WHERE $1::INTEGER IS NULL OR user_id = $1
            ORDER BY issued_date DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
