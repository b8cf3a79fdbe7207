//! Book model and related types.
//!
//! `Book` is the stored record, `BookSummary` the condensed `{id, name, publisher}`
//! view returned by listings, and `BookPayload` the client-supplied field set used
//! by both create and update.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Full book record as stored and returned by `GET /books/{bookId}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Opaque identifier assigned at creation
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    pub page_count: i64,
    pub read_page: i64,
    /// Derived: `page_count == read_page` at the last write
    pub finished: bool,
    pub reading: bool,
    #[serde(with = "timestamp")]
    pub inserted_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl Book {
    pub fn is_finished(page_count: i64, read_page: i64) -> bool {
        page_count == read_page
    }
}

/// Condensed projection used by list responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
}

impl From<&Book> for BookSummary {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id.clone(),
            name: book.name.clone(),
            publisher: book.publisher.clone(),
        }
    }
}

/// Create / update request body.
///
/// `finished` is derived server-side; a `finished` key in the body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: Option<i64>,
    pub author: Option<String>,
    pub summary: Option<String>,
    pub publisher: Option<String>,
    #[serde(default)]
    pub page_count: i64,
    #[serde(default)]
    pub read_page: i64,
    #[serde(default)]
    pub reading: bool,
}

/// Query parameters accepted by `GET /books`
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the book name
    pub name: Option<String>,
    /// `1` for books being read, `0` for the others
    pub reading: Option<String>,
    /// `1` for finished books, `0` for unfinished ones
    pub finished: Option<String>,
}

/// A single list filter. Only one applies per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookFilter {
    All,
    /// Lowercased needle
    Name(String),
    /// `None` when the requested flag is not a recognised value; matches nothing
    Reading(Option<bool>),
    Finished(Option<bool>),
}

impl BookFilter {
    pub fn matches(&self, book: &Book) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Name(needle) => book.name.to_lowercase().contains(needle.as_str()),
            BookFilter::Reading(flag) => *flag == Some(book.reading),
            BookFilter::Finished(flag) => *flag == Some(book.finished),
        }
    }
}

impl From<&BookQuery> for BookFilter {
    /// Precedence is name, then reading, then finished. Empty values count as absent.
    fn from(query: &BookQuery) -> Self {
        fn present(value: &Option<String>) -> Option<&str> {
            value.as_deref().filter(|v| !v.is_empty())
        }

        if let Some(name) = present(&query.name) {
            BookFilter::Name(name.to_lowercase())
        } else if let Some(reading) = present(&query.reading) {
            BookFilter::Reading(parse_flag(reading))
        } else if let Some(finished) = present(&query.finished) {
            BookFilter::Finished(parse_flag(finished))
        } else {
            BookFilter::All
        }
    }
}

/// Numeric flag coercion: a value equal to 1 is true, 0 is false.
/// Blank text counts as 0 and `0x`/`0o`/`0b` prefixes are read in their radix.
/// Anything else (`true`, `2`, `abc`) yields `None`.
pub fn parse_flag(raw: &str) -> Option<bool> {
    let trimmed = raw.trim();
    let radix = match trimmed.get(..2) {
        Some("0x" | "0X") => Some(16),
        Some("0o" | "0O") => Some(8),
        Some("0b" | "0B") => Some(2),
        _ => None,
    };

    let value = match radix {
        _ if trimmed.is_empty() => 0.0,
        Some(radix) => u64::from_str_radix(&trimmed[2..], radix).ok()? as f64,
        None => trimmed.parse::<f64>().ok()?,
    };

    if value == 1.0 {
        Some(true)
    } else if value == 0.0 {
        Some(false)
    } else {
        None
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix
pub(crate) mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|at| at.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
