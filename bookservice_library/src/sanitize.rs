use actix_web::error::ContentTypeError;
use actix_web::{mime, HttpMessage, HttpRequest};

use crate::api::BookForm;

/// Trims surrounding whitespace and replaces HTML-sensitive characters with entities
pub fn sanitize(raw: &str) -> String {
    let trimmed = raw.trim();
    let mut escaped = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Sanitizes an optional field, returning None when nothing is left after trimming
pub fn sanitize_field(raw: Option<&str>) -> Option<String> {
    raw.map(sanitize).filter(|value| !value.is_empty())
}

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("Unreadable content type: {0}")]
    ContentType(#[from] ContentTypeError),

    #[error("Body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Body is not a valid form: {0}")]
    Form(#[from] serde_urlencoded::de::Error),
}

fn is_json(content_type: &mime::Mime) -> bool {
    content_type.subtype() == mime::JSON || content_type.suffix() == Some(mime::JSON)
}

/// Reads the accepted fields from a JSON or urlencoded body.
/// Empty body means no fields were sent, any content type other than JSON is read as a form.
pub fn parse_book_form(req: &HttpRequest, body: &[u8]) -> Result<BookForm, BodyError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(BookForm::default());
    }

    match req.mime_type()? {
        Some(content_type) if is_json(&content_type) => Ok(serde_json::from_slice(body)?),
        _ => Ok(serde_urlencoded::from_bytes(body)?),
    }
}
