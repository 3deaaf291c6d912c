//! Book catalog records parsed from a BookBuddy export.
//!
//! A [`BookRecord`] is created by the [`reader`] from one CSV row, gets its
//! ISBN and cover URL filled in by the enrichment loop, and is then handed
//! to the output writer unchanged.

pub mod reader;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use reader::read_catalog;

/// Value stamped into `addedBy` for every imported book
pub const ADDED_BY: &str = "BookBuddy Import";

/// Reading progress as understood by the target database
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReadingStatus {
    /// No status (or one we don't recognize)
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "Read")]
    Read,
    #[serde(rename = "Reading")]
    Reading,
    #[serde(rename = "Want to Read")]
    WantToRead,
}

impl ReadingStatus {
    /// Map a BookBuddy `Status` cell. Matching is exact.
    pub fn from_bookbuddy(status: &str) -> Self {
        match status {
            "Read" => Self::Read,
            "Reading" => Self::Reading,
            "Unread" | "Want to Read" => Self::WantToRead,
            _ => Self::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "",
            Self::Read => "Read",
            Self::Reading => "Reading",
            Self::WantToRead => "Want to Read",
        }
    }
}

/// One book from the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub title: String,
    pub authors: String,
    /// ISBN with hyphens stripped; empty when unknown
    pub isbn: String,
    pub publisher: String,
    pub publish_date: String,
    pub number_of_pages: String,
    pub notes: String,
    /// Filled in by enrichment
    pub cover_url: String,
    pub added_by: String,
    pub added_at: DateTime<Utc>,
    pub copies: u32,
    pub reading_status: ReadingStatus,
    pub is_wishlist: bool,
}

impl BookRecord {
    /// Create a record with import defaults for everything but title/author.
    pub fn new(title: impl Into<String>, authors: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: authors.into(),
            isbn: String::new(),
            publisher: String::new(),
            publish_date: String::new(),
            number_of_pages: String::new(),
            notes: String::new(),
            cover_url: String::new(),
            added_by: ADDED_BY.to_string(),
            added_at: Utc::now(),
            copies: 1,
            reading_status: ReadingStatus::None,
            is_wishlist: false,
        }
    }

    /// Key used for progress caching: `"{title}|{authors}"`.
    ///
    /// Not unique across real-world duplicates (two editions of the same
    /// book share a key).
    pub fn natural_key(&self) -> String {
        format!("{}|{}", self.title, self.authors)
    }

    pub fn has_isbn(&self) -> bool {
        !self.isbn.is_empty()
    }

    pub fn has_cover(&self) -> bool {
        !self.cover_url.is_empty()
    }
}
