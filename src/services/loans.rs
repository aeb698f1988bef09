//! Borrowing and returning books

use crate::{
    error::AppResult,
    models::{
        history::HistoryEntry,
        transaction::{OutstandingLoan, ReturnReceipt, Transaction},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LoansService {
    repository: Repository,
}

impl LoansService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Borrow an available book for a user
    pub async fn borrow_book(&self, user_id: i32, book_id: i32) -> AppResult<Transaction> {
        let transaction = self.repository.transactions.borrow(user_id, book_id).await?;
        tracing::info!(
            "Book {} borrowed by user {} (transaction {})",
            book_id,
            user_id,
            transaction.transaction_id
        );
        Ok(transaction)
    }

    /// Return the book held by an open transaction
    pub async fn return_book(
        &self,
        transaction_id: i32,
        expected_book_id: Option<i32>,
    ) -> AppResult<ReturnReceipt> {
        let receipt = self
            .repository
            .transactions
            .return_book(transaction_id, expected_book_id)
            .await?;
        tracing::info!(
            "Book {} returned by user {} (transaction {})",
            receipt.book_id,
            receipt.user_id,
            transaction_id
        );
        Ok(receipt)
    }

    /// Every outstanding loan, for the admin dashboard
    pub async fn outstanding_loans(&self) -> AppResult<Vec<OutstandingLoan>> {
        self.repository.transactions.list_outstanding().await
    }

    /// Outstanding loans of one user
    pub async fn user_loans(&self, user_id: i32) -> AppResult<Vec<OutstandingLoan>> {
        self.repository.transactions.list_for_user(user_id).await
    }

    /// Borrow history, optionally restricted to one user
    pub async fn history(&self, user_id: Option<i32>) -> AppResult<Vec<HistoryEntry>> {
        if let Some(id) = user_id {
            // Unknown user is a 404, not an empty history
            self.repository.users.get_by_id(id).await?;
        }
        self.repository.transactions.history(user_id).await
    }
}
