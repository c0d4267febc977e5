use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::books_repository::BookRepositoryError;
use crate::sanitize::BodyError;

/// Every way a request can fail. Translated into a status and a plain text body in one place.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("_id error")]
    InvalidBookId,

    #[error("missing required field {0}")]
    MissingField(&'static str),

    #[error("invalid request body")]
    MalformedBody(#[from] BodyError),

    /// The store rejected the delete, or did not acknowledge it (no source)
    #[error("delete failed.")]
    DeleteFailed(#[source] Option<BookRepositoryError>),

    #[error("store timeout")]
    Timeout,

    #[error("internal error")]
    Repository(#[source] BookRepositoryError),
}

impl From<BookRepositoryError> for ApiError {
    fn from(err: BookRepositoryError) -> Self {
        match err {
            BookRepositoryError::Timeout(_) => ApiError::Timeout,
            other => ApiError::Repository(other),
        }
    }
}

impl ApiError {
    /// Translation used when removing every book, where a store failure has its own message
    pub fn delete_failed(err: BookRepositoryError) -> Self {
        match err {
            BookRepositoryError::Timeout(_) => ApiError::Timeout,
            other => ApiError::DeleteFailed(Some(other)),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBookId | ApiError::MissingField(_) | ApiError::MalformedBody(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::DeleteFailed(_) | ApiError::Repository(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ApiError::Repository(err) => tracing::error!("Book store failure {}", err),
            ApiError::DeleteFailed(Some(err)) => tracing::error!("Delete all books failed {}", err),
            ApiError::MalformedBody(err) => tracing::debug!("Rejected body {}", err),
            ApiError::Timeout | ApiError::DeleteFailed(None) => tracing::warn!("{}", self),
            _ => {}
        }
        HttpResponse::build(self.status_code())
            .content_type(ContentType::plaintext())
            .body(self.to_string())
    }
}

#[cfg(test)]
mod api_error_tests {
    use std::time::Duration;

    use actix_web::body::to_bytes;

    use super::*;

    async fn rendered(err: ApiError) -> (StatusCode, String) {
        let response = err.error_response();
        let status = response.status();
        let body = to_bytes(response.into_body()).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[actix_web::test]
    async fn validation_errors_are_bad_requests() {
        assert_eq!(
            rendered(ApiError::InvalidBookId).await,
            (StatusCode::BAD_REQUEST, "_id error".to_string())
        );
        assert_eq!(
            rendered(ApiError::MissingField("title")).await,
            (
                StatusCode::BAD_REQUEST,
                "missing required field title".to_string()
            )
        );
    }

    #[actix_web::test]
    async fn store_failures_are_server_errors() {
        assert_eq!(
            rendered(ApiError::DeleteFailed(None)).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "delete failed.".to_string()
            )
        );
        assert_eq!(
            rendered(BookRepositoryError::Other("boom".to_string()).into()).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string()
            )
        );
        assert_eq!(
            rendered(BookRepositoryError::Timeout(Duration::from_secs(1)).into()).await,
            (StatusCode::GATEWAY_TIMEOUT, "store timeout".to_string())
        );
    }

    #[actix_web::test]
    async fn delete_all_failures_keep_their_own_message() {
        let err = ApiError::delete_failed(BookRepositoryError::Other("boom".to_string()));
        assert!(matches!(
            err,
            ApiError::DeleteFailed(Some(BookRepositoryError::Other(_)))
        ));
        assert_eq!(
            rendered(err).await,
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "delete failed.".to_string()
            )
        );
        assert_eq!(
            rendered(ApiError::delete_failed(BookRepositoryError::Timeout(
                Duration::from_secs(1)
            )))
            .await,
            (StatusCode::GATEWAY_TIMEOUT, "store timeout".to_string())
        );
    }
}
