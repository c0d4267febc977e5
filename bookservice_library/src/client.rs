use anyhow::{bail, Context};
use reqwest::header::CONTENT_TYPE;
use reqwest::Response;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_tracing::TracingMiddleware;
use serde::de::DeserializeOwned;

use crate::api::{Book, BookForm, BookId, BookSummary, CreatedBook};

const NO_BOOK_EXISTS: &str = "no book exists";

pub struct BookServiceLibraryClient {
    url: String,
    client: ClientWithMiddleware,
}

/// Reads a JSON body, or None if the service answered that the book does not exist
async fn json_or_missing<T: DeserializeOwned>(response: Response) -> anyhow::Result<Option<T>> {
    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.contains("json"))
        .unwrap_or(false);

    if is_json {
        return Ok(Some(response.json().await?));
    }
    let text = response.text().await?;
    if text == NO_BOOK_EXISTS {
        Ok(None)
    } else {
        bail!("Unexpected response {}", text)
    }
}

impl BookServiceLibraryClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let client = ClientBuilder::new(reqwest_client)
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Calls GET /api/books endpoint
    pub async fn list_books(&self) -> anyhow::Result<Vec<BookSummary>> {
        let response = self
            .client
            .get(format!("{}/api/books", self.url))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to list books {}", error)
        }
    }

    /// Calls POST /api/books endpoint
    /// Returns id and the title as stored by the service
    pub async fn add_book(&self, title: &str) -> anyhow::Result<CreatedBook> {
        let response = self
            .client
            .post(format!("{}/api/books", self.url))
            .json(&BookForm {
                title: Some(title.to_string()),
                comment: None,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to add book {}", error)
        }
        Ok(response.json().await?)
    }

    /// Calls GET /api/books/{book_id} endpoint
    /// Returns None if book was not in the repository
    pub async fn get_book(&self, book_id: BookId) -> anyhow::Result<Option<Book>> {
        let response = self
            .client
            .get(format!("{}/api/books/{}", self.url, book_id))
            .send()
            .await?;
        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to get book {}", error)
        }
        json_or_missing(response).await
    }

    /// Calls POST /api/books/{book_id} endpoint
    /// Returns the book with all comments, None if book was not in the repository
    pub async fn add_comment(
        &self,
        book_id: BookId,
        comment: &str,
    ) -> anyhow::Result<Option<Book>> {
        let response = self
            .client
            .post(format!("{}/api/books/{}", self.url, book_id))
            .json(&BookForm {
                title: None,
                comment: Some(comment.to_string()),
            })
            .send()
            .await?;
        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to add comment {}", error)
        }
        json_or_missing(response).await
    }

    /// Calls DELETE /api/books/{book_id} endpoint
    /// Returns true if book was deleted and false if it was not found
    pub async fn delete_book(&self, book_id: BookId) -> anyhow::Result<bool> {
        let response = self
            .client
            .delete(format!("{}/api/books/{}", self.url, book_id))
            .send()
            .await?;
        if !response.status().is_success() {
            let error = response.text().await.unwrap_or_default();
            bail!("Failed to delete book {}", error)
        }
        match response.text().await?.as_str() {
            "delete successful" => Ok(true),
            NO_BOOK_EXISTS => Ok(false),
            other => bail!("Unexpected response {}", other),
        }
    }

    /// Calls DELETE /api/books endpoint
    pub async fn delete_all_books(&self) -> anyhow::Result<()> {
        let response = self
            .client
            .delete(format!("{}/api/books", self.url))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if status.is_success() && text == "complete delete successful" {
            Ok(())
        } else {
            bail!("Failed to delete books {}", text)
        }
    }
}
