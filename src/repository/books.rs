//! Books repository for database operations

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::book::{substring_pattern, Book, BookListing},
};

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        sqlx::query_as::<_, Book>(
            "SELECT book_id, title, author, genre, year, available FROM books WHERE book_id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::book_not_found(id))
    }

    /// Books that can currently be borrowed
    pub async fn list_available(&self) -> AppResult<Vec<BookListing>> {
        let books = sqlx::query_as::<_, BookListing>(
            r#"
            SELECT book_id, title, author, genre, year
            FROM books
            WHERE available = TRUE
            ORDER BY book_id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Case-insensitive substring search over title, author and genre
    pub async fn search(&self, term: &str) -> AppResult<Vec<Book>> {
        let pattern = substring_pattern(term);

        let books = sqlx::query_as::<_, Book>(
            r#"
            SELECT book_id, title, author, genre, year, available
            FROM books
            WHERE title ILIKE $1 OR author ILIKE $1 OR genre ILIKE $1
            ORDER BY book_id
            "#,
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }
}
