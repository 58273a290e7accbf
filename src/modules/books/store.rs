//! In-memory book store.
//!
//! Records live in a `Vec` in insertion order and every lookup is a linear
//! scan.

use std::sync::Arc;

use thiserror::Error;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Book, BookFields, BookFilter, BookPayload, BookSummary};

/// Store handle shared between request handlers.
pub type SharedStore = Arc<RwLock<BookStore>>;

/// Why a store operation was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BookError {
    #[error("book name is missing")]
    MissingName,

    #[error("readPage {read_page} is greater than pageCount {page_count}")]
    InvalidPageRange { read_page: u32, page_count: u32 },

    #[error("book '{0}' not found")]
    NotFound(String),

    #[error("book '{0}' could not be inserted")]
    InsertFailed(String),
}

impl BookPayload {
    /// Check the write invariants shared by add and update.
    pub(crate) fn validate(self) -> Result<BookFields, BookError> {
        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => return Err(BookError::MissingName),
        };

        if self.read_page > self.page_count {
            return Err(BookError::InvalidPageRange {
                read_page: self.read_page,
                page_count: self.page_count,
            });
        }

        Ok(BookFields {
            name,
            year: self.year,
            author: self.author,
            summary: self.summary,
            publisher: self.publisher,
            page_count: self.page_count,
            read_page: self.read_page,
            reading: self.reading,
        })
    }
}

/// `1`/`true` and `0`/`false`; anything else is not a flag.
fn parse_flag(raw: &str) -> Option<bool> {
    match raw {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

fn flag_matches(wanted: Option<&str>, actual: bool) -> bool {
    match wanted {
        None => true,
        Some(raw) => parse_flag(raw) == Some(actual),
    }
}

#[derive(Debug, Default)]
pub struct BookStore {
    books: Vec<Book>,
}

impl BookStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a fresh store for sharing across handlers.
    pub fn shared() -> SharedStore {
        Arc::new(RwLock::new(Self::new()))
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Validate and append a new book, returning its generated id.
    pub fn add(&mut self, payload: BookPayload) -> Result<String, BookError> {
        self.add_with_id(Uuid::new_v4().to_string(), payload)
    }

    fn add_with_id(&mut self, id: String, payload: BookPayload) -> Result<String, BookError> {
        let fields = payload.validate()?;

        if self.position(&id).is_some() {
            return Err(BookError::InsertFailed(id));
        }

        let now = OffsetDateTime::now_utc();
        let finished = fields.page_count == fields.read_page;
        self.books.push(Book {
            id: id.clone(),
            name: fields.name,
            year: fields.year,
            author: fields.author,
            summary: fields.summary,
            publisher: fields.publisher,
            page_count: fields.page_count,
            read_page: fields.read_page,
            finished,
            reading: fields.reading,
            inserted_at: now,
            updated_at: now,
        });

        Ok(id)
    }

    /// Summaries of the books passing every filter, in insertion order.
    ///
    /// Name filtering is a case-insensitive substring match.
    pub fn list(&self, filter: &BookFilter) -> Vec<BookSummary> {
        let needle = filter.name.as_deref().map(str::to_lowercase);

        self.books
            .iter()
            .filter(|book| match &needle {
                Some(needle) => book.name.to_lowercase().contains(needle.as_str()),
                None => true,
            })
            .filter(|book| flag_matches(filter.reading.as_deref(), book.reading))
            .filter(|book| flag_matches(filter.finished.as_deref(), book.finished))
            .map(Book::to_summary)
            .collect()
    }

    pub fn get(&self, id: &str) -> Result<&Book, BookError> {
        self.books
            .iter()
            .find(|book| book.id == id)
            .ok_or_else(|| BookError::NotFound(id.to_string()))
    }

    /// Replace every mutable field of the book with `id`.
    ///
    /// The payload is validated before the lookup, so an invalid payload for
    /// an unknown id reports the validation failure.
    pub fn update(&mut self, id: &str, payload: BookPayload) -> Result<&Book, BookError> {
        let fields = payload.validate()?;
        let index = self
            .position(id)
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;

        let book = &mut self.books[index];
        book.apply(fields, OffsetDateTime::now_utc());
        Ok(book)
    }

    pub fn delete(&mut self, id: &str) -> Result<Book, BookError> {
        let index = self
            .position(id)
            .ok_or_else(|| BookError::NotFound(id.to_string()))?;
        Ok(self.books.remove(index))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.books.iter().position(|book| book.id == id)
    }
}
