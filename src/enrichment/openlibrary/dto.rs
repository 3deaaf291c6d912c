//! Open Library API Data Transfer Objects
//!
//! These types match what the Open Library API returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the openlibrary module - convert to domain types.
//!
//! API Reference: https://openlibrary.org/developers/api
//!
//! We use two endpoints:
//! - `/search.json` (title/author or ISBN search, first document only)
//! - `/api/books?jscmd=data` (edition data keyed by `ISBN:<isbn>`)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Search response (`/search.json`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    /// Total hits (we only ever request one)
    #[serde(rename = "numFound")]
    pub num_found: Option<u64>,
    /// Matching works, best first
    #[serde(default)]
    pub docs: Vec<SearchDoc>,
}

/// A single search hit (a work, aggregated over its editions)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchDoc {
    /// Work key, e.g. `/works/OL893415W`
    pub key: Option<String>,
    pub title: Option<String>,
    #[serde(default)]
    pub author_name: Vec<String>,
    /// ISBNs of all editions, in no particular order
    #[serde(default)]
    pub isbn: Vec<String>,
    /// Numeric cover ID for covers.openlibrary.org
    pub cover_i: Option<i64>,
}

/// Books API response (`/api/books?bibkeys=ISBN:...&format=json&jscmd=data`)
///
/// An object keyed by the requested bibkey; keys with no edition are absent.
pub type BooksResponse = HashMap<String, BookData>;

/// Edition data for one bibkey
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookData {
    pub url: Option<String>,
    pub key: Option<String>,
    pub title: Option<String>,
    pub cover: Option<Cover>,
}

/// Cover image URLs by size
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Cover {
    pub small: Option<String>,
    pub medium: Option<String>,
    pub large: Option<String>,
}

#[cfg(test)]
mod contract_tests {
    use super::*;

    #[test]
    fn test_parse_search_response() {
        let json = r#"{
            "numFound": 1,
            "start": 0,
            "numFoundExact": true,
            "docs": [{
                "key": "/works/OL893415W",
                "title": "Dune",
                "author_name": ["Frank Herbert"],
                "isbn": ["0441013597", "9780441013593"],
                "cover_i": 11481354,
                "first_publish_year": 1965
            }],
            "q": ""
        }"#;

        let response: SearchResponse =
            serde_json::from_str(json).expect("Should parse search response");

        assert_eq!(response.num_found, Some(1));
        assert_eq!(response.docs.len(), 1);
        let doc = &response.docs[0];
        assert_eq!(doc.title.as_deref(), Some("Dune"));
        assert_eq!(doc.isbn.len(), 2);
        assert_eq!(doc.cover_i, Some(11481354));
    }

    #[test]
    fn test_parse_empty_search() {
        let json = r#"{"numFound": 0, "start": 0, "docs": []}"#;
        let response: SearchResponse =
            serde_json::from_str(json).expect("Should parse empty search");
        assert!(response.docs.is_empty());
    }

    #[test]
    fn test_parse_doc_without_isbn_or_cover() {
        let json = r#"{"docs": [{"key": "/works/OL1W", "title": "Pamphlet"}]}"#;
        let response: SearchResponse = serde_json::from_str(json).unwrap();
        assert!(response.docs[0].isbn.is_empty());
        assert!(response.docs[0].cover_i.is_none());
    }

    #[test]
    fn test_parse_books_response() {
        let json = r#"{
            "ISBN:9780441013593": {
                "url": "https://openlibrary.org/books/OL7353617M/Dune",
                "key": "/books/OL7353617M",
                "title": "Dune",
                "number_of_pages": 528,
                "cover": {
                    "small": "https://covers.openlibrary.org/b/id/11481354-S.jpg",
                    "medium": "https://covers.openlibrary.org/b/id/11481354-M.jpg",
                    "large": "https://covers.openlibrary.org/b/id/11481354-L.jpg"
                }
            }
        }"#;

        let response: BooksResponse =
            serde_json::from_str(json).expect("Should parse books response");

        let book = response.get("ISBN:9780441013593").expect("entry present");
        let cover = book.cover.as_ref().expect("cover present");
        assert!(cover.medium.as_deref().unwrap().ends_with("-M.jpg"));
    }

    #[test]
    fn test_parse_books_response_missing_key() {
        let response: BooksResponse = serde_json::from_str("{}").unwrap();
        assert!(response.is_empty());
    }
}
