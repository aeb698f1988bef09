//! Data models for Libris

pub mod admin;
pub mod book;
pub mod history;
pub mod session;
pub mod transaction;
pub mod user;

// Re-export commonly used types
pub use admin::Admin;
pub use book::{Book, BookListing};
pub use history::HistoryEntry;
pub use session::{Role, SessionClaims};
pub use transaction::{OutstandingLoan, ReturnReceipt, Transaction};
pub use user::{User, UserSummary};
