//! Catalog browsing and search

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookListing},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Books currently on the shelf
    pub async fn available_books(&self) -> AppResult<Vec<BookListing>> {
        self.repository.books.list_available().await
    }

    /// Search title, author and genre for a case-insensitive substring
    pub async fn search_books(&self, query: &str) -> AppResult<Vec<Book>> {
        let term = query.trim();
        if term.is_empty() {
            return Err(AppError::Validation("Search query must not be empty".to_string()));
        }

        let books = self.repository.books.search(term).await?;
        tracing::debug!("Search {:?} matched {} books", term, books.len());
        Ok(books)
    }

    /// Get book by ID
    pub async fn get_book(&self, id: i32) -> AppResult<Book> {
        self.repository.books.get_by_id(id).await
    }
}
