use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A stored bookshelf entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Generated identifier, never changes after insertion
    pub id: String,
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    /// Always `page_count == read_page`
    pub finished: bool,
    pub reading: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub inserted_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Book {
    /// Overwrite every client-editable field and recompute `finished`.
    pub(crate) fn apply(&mut self, fields: BookFields, now: OffsetDateTime) {
        self.name = fields.name;
        self.year = fields.year;
        self.author = fields.author;
        self.summary = fields.summary;
        self.publisher = fields.publisher;
        self.page_count = fields.page_count;
        self.read_page = fields.read_page;
        self.reading = fields.reading;
        self.finished = fields.page_count == fields.read_page;
        self.updated_at = now;
    }

    pub fn to_summary(&self) -> BookSummary {
        BookSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            publisher: self.publisher.clone(),
        }
    }
}

/// Request body for adding or updating a book.
///
/// Every field is optional on the wire; absent fields take their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BookPayload {
    pub name: Option<String>,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

/// A payload that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BookFields {
    pub name: String,
    pub year: i32,
    pub author: String,
    pub summary: String,
    pub publisher: String,
    pub page_count: u32,
    pub read_page: u32,
    pub reading: bool,
}

/// List projection of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: String,
    pub name: String,
    pub publisher: String,
}

/// Query string of `GET /books`.
///
/// Flags are kept raw: `1`/`true` and `0`/`false` are understood, any other
/// value matches nothing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookFilter {
    pub name: Option<String>,
    pub reading: Option<String>,
    pub finished: Option<String>,
}

/// `data` of a successful add.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedBook {
    pub book_id: String,
}

/// `data` of a list.
#[derive(Debug, Serialize)]
pub struct BookList {
    pub books: Vec<BookSummary>,
}

/// `data` of a get.
#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book: Book,
}
