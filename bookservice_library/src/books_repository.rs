use std::time::Duration;

pub use in_memory_books_repository::InMemoryBookRepository;
pub use mongo_books_repository::MongoBooksRepository;
pub use timeout_books_repository::TimeoutBookRepository;

use crate::api::{Book, BookId, BookSummary, CreatedBook};
use crate::data_store::DataStoreError;

mod in_memory_books_repository;
mod mongo_books_repository;
mod timeout_books_repository;

#[derive(thiserror::Error, Debug)]
pub enum BookRepositoryError {
    #[error("Store did not acknowledge {0}")]
    NotAcknowledged(&'static str),

    #[error("Failed to deserialize book: {0}")]
    DeserializationError(#[from] mongodb::bson::de::Error),

    #[error("DatabaseFailure failure {0}")]
    DatabaseFailure(#[from] mongodb::error::Error),

    #[error("Data store error {0}")]
    Store(#[from] DataStoreError),

    #[error("Store call did not finish within {0:?}")]
    Timeout(Duration),

    #[error("Other error {0}")]
    Other(String),
}

/// Outcome of a delete, `deleted_count` of 0 means nothing matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteResult {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// Lists all books together with number of their comments, order is up to the store
    async fn list_books(&self) -> Result<Vec<BookSummary>, BookRepositoryError>;
    /// Adds a book without comments, returns the id assigned to it
    async fn insert_book(&self, title: String) -> Result<CreatedBook, BookRepositoryError>;
    /// Retrieves book with its comments, None if there is no such book
    async fn find_book(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError>;
    /// Appends comment at the end and returns the updated book, None if there is no such book
    async fn append_comment(
        &self,
        book_id: BookId,
        comment: String,
    ) -> Result<Option<Book>, BookRepositoryError>;
    /// Deletes the given book, or every book when no id is given
    async fn delete_books(
        &self,
        book_id: Option<BookId>,
    ) -> Result<DeleteResult, BookRepositoryError>;
}
