//! Output document for bulk import into the document database.
//!
//! Books are keyed `book_0000`, `book_0001`, … in input order and written as
//! pretty-printed UTF-8 JSON with non-ASCII text kept literal.

use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::catalog::{BookRecord, ReadingStatus};
use crate::error::{Result, ResultExt};

/// Flattened projection of a [`BookRecord`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputBook {
    pub isbn: String,
    pub title: String,
    pub authors: String,
    pub publisher: String,
    pub publish_date: String,
    pub number_of_pages: String,
    #[serde(rename = "coverURL")]
    pub cover_url: String,
    pub notes: String,
    pub added_by: String,
    /// Milliseconds since the Unix epoch
    pub added_at: i64,
    pub copies: u32,
    pub reading_status: ReadingStatus,
    pub is_wishlist: bool,
}

impl OutputBook {
    fn from_record(book: &BookRecord, added_at: i64) -> Self {
        Self {
            isbn: book.isbn.clone(),
            title: book.title.clone(),
            authors: book.authors.clone(),
            publisher: book.publisher.clone(),
            publish_date: book.publish_date.clone(),
            number_of_pages: book.number_of_pages.clone(),
            cover_url: book.cover_url.clone(),
            notes: book.notes.clone(),
            added_by: book.added_by.clone(),
            added_at,
            copies: book.copies,
            reading_status: book.reading_status,
            is_wishlist: book.is_wishlist,
        }
    }
}

/// Ordered `book_NNNN` → book mapping
#[derive(Debug, Clone, Default)]
pub struct OutputDocument {
    entries: Vec<(String, OutputBook)>,
}

/// Document key for the book at `index`: width 4, wider past 9999
pub fn document_key(index: usize) -> String {
    format!("book_{:04}", index)
}

impl OutputDocument {
    /// Build the document, stamping every book with the same `added_at`.
    pub fn build(books: &[BookRecord], added_at: DateTime<Utc>) -> Self {
        let millis = added_at.timestamp_millis();
        let entries = books
            .iter()
            .enumerate()
            .map(|(i, book)| (document_key(i), OutputBook::from_record(book, millis)))
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&OutputBook> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, book)| book)
    }
}

impl Serialize for OutputDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, book) in &self.entries {
            map.serialize_entry(key, book)?;
        }
        map.end()
    }
}

/// Write the document to `path`, creating the parent directory if needed.
pub fn write_document(document: &OutputDocument, path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).with_context(format!("creating directory {}", dir.display()))?;
    }

    let file = std::fs::File::create(path).with_context(format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, document)
        .with_context(format!("writing {}", path.display()))?;
    writer
        .flush()
        .with_context(format!("writing {}", path.display()))?;

    tracing::debug!("Wrote {} books to {:?}", document.len(), path);
    Ok(())
}

// ============================================================================
// Summary
// ============================================================================

/// ISBN and cover coverage of an import
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub total: usize,
    pub with_isbn: usize,
    pub with_cover: usize,
}

impl ImportSummary {
    pub fn from_books(books: &[BookRecord]) -> Self {
        Self {
            total: books.len(),
            with_isbn: books.iter().filter(|b| b.has_isbn()).count(),
            with_cover: books.iter().filter(|b| b.has_cover()).count(),
        }
    }

    pub fn missing_isbn(&self) -> usize {
        self.total - self.with_isbn
    }

    pub fn missing_cover(&self) -> usize {
        self.total - self.with_cover
    }

    /// Percentage of the total; 0.0 for an empty import
    pub fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.total as f64
        }
    }
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total books:     {}", self.total)?;
        writeln!(
            f,
            "With ISBN:       {} ({:.1}%)",
            self.with_isbn,
            self.percent(self.with_isbn)
        )?;
        writeln!(
            f,
            "With cover:      {} ({:.1}%)",
            self.with_cover,
            self.percent(self.with_cover)
        )?;
        writeln!(f, "Missing ISBN:    {}", self.missing_isbn())?;
        write!(f, "Missing cover:   {}", self.missing_cover())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::numbered_books;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 5, 19, 11, 58).unwrap()
    }

    #[test]
    fn test_keys_are_sequential_without_gaps() {
        let document = OutputDocument::build(&numbered_books(12), stamp());
        let keys: Vec<&str> = document.keys().collect();
        assert_eq!(keys.len(), 12);
        assert_eq!(keys[0], "book_0000");
        assert_eq!(keys[11], "book_0011");
    }

    #[test]
    fn test_key_width_grows_past_9999() {
        assert_eq!(document_key(9999), "book_9999");
        assert_eq!(document_key(10000), "book_10000");
    }

    #[test]
    fn test_book_fields() {
        let mut book = BookRecord::new("Dune", "Frank Herbert");
        book.isbn = "9780441013593".to_string();
        book.cover_url = "dune-M.jpg".to_string();
        book.reading_status = ReadingStatus::Read;

        let document = OutputDocument::build(&[book], stamp());
        let json = serde_json::to_value(&document).unwrap();
        let dune = json["book_0000"].as_object().unwrap();

        let mut fields: Vec<&str> = dune.keys().map(String::as_str).collect();
        fields.sort_unstable();
        assert_eq!(
            fields,
            vec![
                "addedAt",
                "addedBy",
                "authors",
                "copies",
                "coverURL",
                "isWishlist",
                "isbn",
                "notes",
                "numberOfPages",
                "publishDate",
                "publisher",
                "readingStatus",
                "title",
            ]
        );
        assert_eq!(dune["addedAt"], stamp().timestamp_millis());
        assert_eq!(dune["copies"], 1);
        assert_eq!(dune["readingStatus"], "Read");
        assert_eq!(dune["isWishlist"], false);
        assert_eq!(dune["addedBy"], "BookBuddy Import");
    }

    #[test]
    fn test_added_at_is_restamped() {
        let books = numbered_books(3);
        let document = OutputDocument::build(&books, stamp());
        let millis = stamp().timestamp_millis();
        for key in ["book_0000", "book_0001", "book_0002"] {
            assert_eq!(document.get(key).unwrap().added_at, millis);
        }
    }

    #[test]
    fn test_write_document_preserves_order_and_unicode() {
        let mut books = numbered_books(2);
        books[1].title = "Cien años de soledad".to_string();
        let document = OutputDocument::build(&books, stamp());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("books_for_import.json");
        write_document(&document, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Cien años de soledad"));
        assert!(text.contains("\n  \"book_0000\": {"));
        assert!(text.find("book_0000").unwrap() < text.find("book_0001").unwrap());

        let parsed: std::collections::HashMap<String, OutputBook> =
            serde_json::from_str(&text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["book_0001"].title, "Cien años de soledad");
    }

    #[test]
    fn test_summary() {
        let mut books = numbered_books(4);
        books[0].isbn = "1".to_string();
        books[1].isbn = "2".to_string();
        books[1].cover_url = "c.jpg".to_string();

        let summary = ImportSummary::from_books(&books);
        assert_eq!(summary.with_isbn, 2);
        assert_eq!(summary.with_cover, 1);
        assert_eq!(summary.missing_isbn(), 2);
        assert_eq!(summary.missing_cover(), 3);

        let text = summary.to_string();
        assert!(text.contains("With ISBN:       2 (50.0%)"));
        assert!(text.contains("With cover:      1 (25.0%)"));
        assert!(text.contains("Missing cover:   3"));
    }

    #[test]
    fn test_empty_summary_has_no_division_by_zero() {
        let summary = ImportSummary::from_books(&[]);
        assert_eq!(summary.percent(0), 0.0);
        assert!(summary.to_string().contains("With ISBN:       0 (0.0%)"));
    }

    proptest! {
        #[test]
        fn prop_key_count_matches_books(n in 0usize..60) {
            let document = OutputDocument::build(&numbered_books(n), stamp());
            prop_assert_eq!(document.len(), n);
            for (i, key) in document.keys().enumerate() {
                prop_assert_eq!(key, document_key(i));
            }
        }
    }
}
