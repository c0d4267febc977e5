use std::fmt;
use std::str::FromStr;

use bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of a book, assigned by the store on creation.
///
/// Accepted textual forms are exactly 24 hexadecimal characters or exactly 12 raw bytes.
/// Always serialized as the 24 character lowercase hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BookId(ObjectId);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid book id {0:?}")]
pub struct InvalidBookId(pub String);

impl BookId {
    pub fn new() -> Self {
        Self(ObjectId::new())
    }

    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ObjectId> for BookId {
    fn from(value: ObjectId) -> Self {
        Self(value)
    }
}

/// Returns true if `raw` is an acceptable book identifier
pub fn is_valid_book_id(raw: &str) -> bool {
    raw.parse::<BookId>().is_ok()
}

impl FromStr for BookId {
    type Err = InvalidBookId;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw.len() == 24 {
            return ObjectId::parse_str(raw)
                .map(Self)
                .map_err(|_| InvalidBookId(raw.to_string()));
        }
        let bytes: [u8; 12] = raw
            .as_bytes()
            .try_into()
            .map_err(|_| InvalidBookId(raw.to_string()))?;
        Ok(Self(ObjectId::from_bytes(bytes)))
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl Serialize for BookId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        ObjectId::parse_str(&hex)
            .map(Self)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
/// Element of the books list, comments are replaced with their number
pub struct BookSummary {
    #[serde(rename = "_id")]
    pub book_id: BookId,
    pub title: String,
    pub commentcount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
/// Returned after a book was created
pub struct CreatedBook {
    #[serde(rename = "_id")]
    pub book_id: BookId,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
/// Book with all of its comments, in the order they were added
pub struct Book {
    #[serde(rename = "_id")]
    pub book_id: BookId,
    pub title: String,
    pub comments: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Eq, PartialEq)]
/// Fields accepted in request bodies. Anything else sent by the caller is ignored.
/// Numbers and booleans are taken as their text, like form fields would be.
pub struct BookForm {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar_as_string"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar_as_string"
    )]
    pub comment: Option<String>,
}

fn scalar_as_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(text) => Ok(Some(text)),
        serde_json::Value::Number(number) => Ok(Some(number.to_string())),
        serde_json::Value::Bool(flag) => Ok(Some(flag.to_string())),
        other => Err(serde::de::Error::custom(format!("expected a text field, got {other}"))),
    }
}
