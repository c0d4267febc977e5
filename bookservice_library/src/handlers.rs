use std::sync::Arc;

use actix_web::http::header::ContentType;
use actix_web::web::{Bytes, Data};
use actix_web::{Error, HttpRequest, HttpResponse};
use paperclip::actix::{
    api_v2_operation,
    web::{self},
};

use crate::api::BookId;
use crate::books_repository::{BookRepository, BookRepositoryError};
use crate::error::ApiError;
use crate::sanitize::{parse_book_form, sanitize_field};

const NO_BOOK_EXISTS: &str = "no book exists";

fn text(body: &'static str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(body)
}

fn parse_book_id(raw: &str) -> Result<BookId, ApiError> {
    raw.parse().map_err(|_| ApiError::InvalidBookId)
}

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn list_books(
    books_repository: Data<Arc<dyn BookRepository>>,
) -> Result<HttpResponse, Error> {
    let books = books_repository
        .list_books()
        .await
        .map_err(ApiError::from)?;
    Ok(HttpResponse::Ok().json(books))
}

#[api_v2_operation]
pub async fn add_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    req: HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, Error> {
    let form = parse_book_form(&req, &body).map_err(ApiError::from)?;
    let title = sanitize_field(form.title.as_deref()).ok_or(ApiError::MissingField("title"))?;

    let created = books_repository
        .insert_book(title)
        .await
        .map_err(ApiError::from)?;
    tracing::info!(book_id = %created.book_id, "Book added");
    Ok(HttpResponse::Ok().json(created))
}

#[api_v2_operation]
pub async fn delete_all_books(
    books_repository: Data<Arc<dyn BookRepository>>,
) -> Result<HttpResponse, Error> {
    let result = books_repository
        .delete_books(None)
        .await
        .map_err(ApiError::delete_failed)?;

    if !result.acknowledged {
        return Err(ApiError::DeleteFailed(None).into());
    }

    tracing::info!(deleted = result.deleted_count, "All books deleted");
    Ok(text("complete delete successful"))
}

#[api_v2_operation]
pub async fn get_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let book_id = parse_book_id(&book_id)?;

    Ok(
        match books_repository
            .find_book(book_id)
            .await
            .map_err(ApiError::from)?
        {
            Some(book) => HttpResponse::Ok().json(book),
            None => text(NO_BOOK_EXISTS),
        },
    )
}

#[api_v2_operation]
pub async fn add_comment(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<String>,
    req: HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, Error> {
    let book_id = parse_book_id(&book_id)?;
    let form = parse_book_form(&req, &body).map_err(ApiError::from)?;
    let comment =
        sanitize_field(form.comment.as_deref()).ok_or(ApiError::MissingField("comment"))?;

    Ok(
        match books_repository
            .append_comment(book_id, comment)
            .await
            .map_err(ApiError::from)?
        {
            Some(book) => HttpResponse::Ok().json(book),
            None => text(NO_BOOK_EXISTS),
        },
    )
}

#[api_v2_operation]
pub async fn delete_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let book_id = parse_book_id(&book_id)?;

    let result = books_repository
        .delete_books(Some(book_id))
        .await
        .map_err(ApiError::from)?;

    if !result.acknowledged {
        return Err(ApiError::from(BookRepositoryError::NotAcknowledged("delete")).into());
    }

    Ok(if result.deleted_count == 0 {
        text(NO_BOOK_EXISTS)
    } else {
        tracing::info!(%book_id, "Book deleted");
        text("delete successful")
    })
}
