use std::sync::Arc;

use futures_util::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, from_document, Document};
use mongodb::options::{Acknowledgment, ReturnDocument};
use mongodb::Collection;
use serde::{Deserialize, Serialize};

use crate::api::{Book, BookId, BookSummary, CreatedBook};
use crate::books_repository::BookRepositoryError::{NotAcknowledged, Other};
use crate::books_repository::{BookRepository, BookRepositoryError, DeleteResult};
use crate::data_store::DataStore;

/// Book as persisted in the collection. Older documents may lack `comments`.
#[derive(Debug, Serialize, Deserialize)]
struct BookDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    comments: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BookSummaryDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    #[serde(default)]
    title: String,
    commentcount: u64,
}

impl BookDocument {
    fn into_book(self) -> Result<Book, BookRepositoryError> {
        let id = self
            .id
            .ok_or_else(|| Other("Stored book has no id".to_string()))?;
        Ok(Book {
            book_id: id.into(),
            title: self.title,
            comments: self.comments,
        })
    }
}

pub struct MongoBooksRepository {
    store: Arc<DataStore>,
    collection_name: String,
}

impl MongoBooksRepository {
    pub fn new(store: Arc<DataStore>) -> Self {
        let collection_name = store.settings().collection.clone();
        Self {
            store,
            collection_name,
        }
    }

    fn books(&self) -> Result<Collection<BookDocument>, BookRepositoryError> {
        Ok(self.store.collection(&self.collection_name)?)
    }

    fn writes_acknowledged(books: &Collection<BookDocument>) -> bool {
        !matches!(
            books.write_concern().and_then(|concern| concern.w.as_ref()),
            Some(Acknowledgment::Nodes(0))
        )
    }

    fn list_pipeline() -> Vec<Document> {
        vec![doc! {
            "$project": {
                "_id": 1,
                "title": 1,
                "commentcount": { "$size": { "$ifNull": ["$comments", []] } },
            }
        }]
    }
}

#[async_trait::async_trait]
impl BookRepository for MongoBooksRepository {
    async fn list_books(&self) -> Result<Vec<BookSummary>, BookRepositoryError> {
        let documents: Vec<Document> = self
            .books()?
            .aggregate(Self::list_pipeline())
            .await?
            .try_collect()
            .await?;

        documents
            .into_iter()
            .map(|document| -> Result<BookSummary, BookRepositoryError> {
                let summary: BookSummaryDocument = from_document(document)?;
                Ok(BookSummary {
                    book_id: summary.id.into(),
                    title: summary.title,
                    commentcount: summary.commentcount,
                })
            })
            .collect()
    }

    async fn insert_book(&self, title: String) -> Result<CreatedBook, BookRepositoryError> {
        let books = self.books()?;
        let result = books
            .insert_one(BookDocument {
                id: None,
                title: title.clone(),
                comments: vec![],
            })
            .await?;

        if !Self::writes_acknowledged(&books) {
            return Err(NotAcknowledged("insert"));
        }

        let book_id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| Other("Id not returned".to_string()))?;

        Ok(CreatedBook {
            book_id: book_id.into(),
            title,
        })
    }

    async fn find_book(&self, book_id: BookId) -> Result<Option<Book>, BookRepositoryError> {
        self.books()?
            .find_one(doc! { "_id": book_id.object_id() })
            .await?
            .map(BookDocument::into_book)
            .transpose()
    }

    async fn append_comment(
        &self,
        book_id: BookId,
        comment: String,
    ) -> Result<Option<Book>, BookRepositoryError> {
        self.books()?
            .find_one_and_update(
                doc! { "_id": book_id.object_id() },
                doc! { "$push": { "comments": comment } },
            )
            .return_document(ReturnDocument::After)
            .await?
            .map(BookDocument::into_book)
            .transpose()
    }

    async fn delete_books(
        &self,
        book_id: Option<BookId>,
    ) -> Result<DeleteResult, BookRepositoryError> {
        let books = self.books()?;
        let result = match book_id {
            Some(book_id) => {
                books
                    .delete_one(doc! { "_id": book_id.object_id() })
                    .await?
            }
            None => books.delete_many(doc! {}).await?,
        };

        Ok(DeleteResult {
            acknowledged: Self::writes_acknowledged(&books),
            deleted_count: result.deleted_count,
        })
    }
}
