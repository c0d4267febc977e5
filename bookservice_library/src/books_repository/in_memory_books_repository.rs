use std::collections::HashMap;

use crate::api::{Book, BookId, BookSummary, CreatedBook};
use crate::books_repository::{BookRepository, BookRepositoryError, DeleteResult};

struct StoredBook {
    title: String,
    comments: Vec<String>,
}

#[derive(Default)]
pub struct InMemoryBookRepository {
    books: parking_lot::RwLock<HashMap<BookId, StoredBook>>,
}

#[async_trait::async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list_books(&self) -> Result<Vec<BookSummary>, BookRepositoryError> {
        Ok(self
            .books
            .read()
            .iter()
            .map(|(&book_id, book)| BookSummary {
                book_id,
                title: book.title.clone(),
                commentcount: book.comments.len() as u64,
            })
            .collect())
    }

    async fn insert_book(&self, title: String) -> Result<CreatedBook, BookRepositoryError> {
        let book_id = BookId::new();
        self.books.write().insert(
            book_id,
            StoredBook {
                title: title.clone(),
                comments: vec![],
            },
        );
        Ok(CreatedBook { book_id, title })
    }

    async fn find_book(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        Ok(self.books.read().get(&book_id).map(|book| Book {
            book_id,
            title: book.title.clone(),
            comments: book.comments.clone(),
        }))
    }

    async fn append_comment(
        &self,
        book_id: BookId,
        comment: String,
    ) -> Result<Option<Book>, BookRepositoryError> {
        let mut locked_books = self.books.write();
        Ok(locked_books.get_mut(&book_id).map(|book| {
            book.comments.push(comment);
            Book {
                book_id,
                title: book.title.clone(),
                comments: book.comments.clone(),
            }
        }))
    }

    async fn delete_books(
        &self,
        book_id: Option<BookId>,
    ) -> Result<DeleteResult, BookRepositoryError> {
        let mut locked_books = self.books.write();
        let deleted_count = match book_id {
            Some(book_id) => locked_books.remove(&book_id).map_or(0, |_| 1),
            None => {
                let count = locked_books.len() as u64;
                locked_books.clear();
                count
            }
        };
        Ok(DeleteResult {
            acknowledged: true,
            deleted_count,
        })
    }
}

#[cfg(test)]
mod in_memory_book_repository_tests {
    use crate::api::{Book, BookId, BookSummary};
    use crate::books_repository::{BookRepository, InMemoryBookRepository};

    #[tokio::test]
    /// Tests if insert_book and find_book work correctly
    async fn test_insert_book_and_find_it() {
        let repo = InMemoryBookRepository::default();

        let not_existing_book_id: BookId = "8faf84b9d50ae9233ea21a13".parse().unwrap();
        let book_not_found = repo
            .find_book(not_existing_book_id)
            .await
            .expect("Failed to find book");
        assert_eq!(book_not_found, None);

        let created = repo
            .insert_book("xx".to_string())
            .await
            .expect("Failed to add book");
        assert_eq!(created.title, "xx");

        let book = repo
            .find_book(created.book_id)
            .await
            .expect("Failed to find book");
        assert_eq!(
            book,
            Some(Book {
                book_id: created.book_id,
                title: "xx".to_string(),
                comments: vec![],
            })
        );
    }

    #[tokio::test]
    /// Tests if list_books reports number of comments of every book
    async fn test_list_books_counts_comments() {
        let repo = InMemoryBookRepository::default();

        let list = repo.list_books().await.expect("Failed to list books");
        assert_eq!(list, vec![]);

        let book1 = repo.insert_book("title1".to_string()).await.unwrap();
        let book2 = repo.insert_book("title2".to_string()).await.unwrap();

        for comment in ["a", "b", "c"] {
            repo.append_comment(book2.book_id, comment.to_string())
                .await
                .unwrap();
        }

        let mut list = repo.list_books().await.expect("Failed to list books");
        list.sort_by(|a, b| a.title.cmp(&b.title));

        assert_eq!(
            list,
            vec![
                BookSummary {
                    book_id: book1.book_id,
                    title: "title1".to_string(),
                    commentcount: 0,
                },
                BookSummary {
                    book_id: book2.book_id,
                    title: "title2".to_string(),
                    commentcount: 3,
                }
            ]
        );
    }

    #[tokio::test]
    /// Tests if comments are appended in order and missing books are reported as None
    async fn test_append_comment() {
        let repo = InMemoryBookRepository::default();
        let missing: BookId = "8faf84b9d50ae9233ea21a13".parse().unwrap();
        let result = repo
            .append_comment(missing, "lost".to_string())
            .await
            .expect("Failed to append");
        assert_eq!(result, None);

        let created = repo.insert_book("xx".to_string()).await.unwrap();
        let first = repo
            .append_comment(created.book_id, "first".to_string())
            .await
            .unwrap()
            .expect("Book not found");
        assert_eq!(first.comments, vec!["first".to_string()]);

        let second = repo
            .append_comment(created.book_id, "second".to_string())
            .await
            .unwrap()
            .expect("Book not found");
        assert_eq!(
            second.comments,
            vec!["first".to_string(), "second".to_string()]
        );
        assert_eq!(repo.find_book(created.book_id).await.unwrap(), Some(second));
    }

    #[tokio::test]
    /// Tests deleting a single book, a missing book and all books
    async fn test_delete_books() {
        let repo = InMemoryBookRepository::default();
        let book1 = repo.insert_book("title1".to_string()).await.unwrap();
        repo.insert_book("title2".to_string()).await.unwrap();
        repo.insert_book("title3".to_string()).await.unwrap();

        let result = repo.delete_books(Some(book1.book_id)).await.unwrap();
        assert!(result.acknowledged);
        assert_eq!(result.deleted_count, 1);

        for _ in 0..2 {
            let result = repo.delete_books(Some(book1.book_id)).await.unwrap();
            assert_eq!(result.deleted_count, 0);
        }

        let result = repo.delete_books(None).await.unwrap();
        assert_eq!(result.deleted_count, 2);
        assert_eq!(repo.list_books().await.unwrap(), vec![]);
    }
}
