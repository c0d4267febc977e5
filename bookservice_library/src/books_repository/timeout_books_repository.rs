use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::api::{Book, BookId, BookSummary, CreatedBook};
use crate::books_repository::{BookRepository, BookRepositoryError, DeleteResult};

/// Bounds every call of the wrapped repository, a call running past the deadline fails
/// with `BookRepositoryError::Timeout` instead of holding the request.
pub struct TimeoutBookRepository {
    inner: Arc<dyn BookRepository>,
    timeout: Duration,
}

impl TimeoutBookRepository {
    pub fn new(inner: Arc<dyn BookRepository>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, BookRepositoryError>>,
    ) -> Result<T, BookRepositoryError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| BookRepositoryError::Timeout(self.timeout))?
    }
}

#[async_trait::async_trait]
impl BookRepository for TimeoutBookRepository {
    async fn list_books(&self) -> Result<Vec<BookSummary>, BookRepositoryError> {
        self.bounded(self.inner.list_books()).await
    }

    async fn insert_book(&self, title: String) -> Result<CreatedBook, BookRepositoryError> {
        self.bounded(self.inner.insert_book(title)).await
    }

    async fn find_book(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        self.bounded(self.inner.find_book(book_id)).await
    }

    async fn append_comment(
        &self,
        book_id: BookId,
        comment: String,
    ) -> Result<Option<Book>, BookRepositoryError> {
        self.bounded(self.inner.append_comment(book_id, comment)).await
    }

    async fn delete_books(
        &self,
        book_id: Option<BookId>,
    ) -> Result<DeleteResult, BookRepositoryError> {
        self.bounded(self.inner.delete_books(book_id)).await
    }
}
