//! Adapter layer: Convert Open Library DTOs to domain models
//!
//! This is the ONLY place where DTO types are converted to domain types.

use super::dto;
use crate::enrichment::domain::{BookMatch, CoverMatch};

/// Cover image template for search hits (medium size)
pub const COVER_URL_TEMPLATE: &str = "https://covers.openlibrary.org/b/id/{id}-M.jpg";

/// Build a medium cover URL from a numeric cover ID
pub fn cover_url(cover_id: i64) -> String {
    COVER_URL_TEMPLATE.replace("{id}", &cover_id.to_string())
}

/// Pick the ISBN to adopt: first ISBN-13, else the first listed, else empty.
pub fn preferred_isbn(isbns: &[String]) -> String {
    isbns
        .iter()
        .find(|isbn| isbn.chars().count() == 13)
        .or_else(|| isbns.first())
        .cloned()
        .unwrap_or_default()
}

/// Strip hyphens and spaces from a user-supplied ISBN
pub fn normalize_isbn(isbn: &str) -> String {
    isbn.chars().filter(|c| *c != '-' && *c != ' ').collect()
}

/// Convert a title/author search response. `None` when there are no hits.
pub fn to_book_match(response: dto::SearchResponse) -> Option<BookMatch> {
    let doc = response.docs.into_iter().next()?;
    Some(BookMatch {
        isbn: preferred_isbn(&doc.isbn),
        cover_url: doc.cover_i.map(cover_url).unwrap_or_default(),
    })
}

/// Convert an ISBN search response. `None` when there are no hits.
pub fn to_search_cover(response: dto::SearchResponse) -> Option<CoverMatch> {
    let doc = response.docs.into_iter().next()?;
    Some(CoverMatch {
        cover_url: doc.cover_i.map(cover_url).unwrap_or_default(),
    })
}

/// Convert a Books API response for `ISBN:<isbn>`.
///
/// `None` means the service has no edition under that key; an edition
/// without a cover is still `Some` with an empty URL.
pub fn to_edition_cover(mut response: dto::BooksResponse, isbn: &str) -> Option<CoverMatch> {
    let book = response.remove(&format!("ISBN:{}", isbn))?;
    let cover_url = book
        .cover
        .and_then(|cover| cover.medium.or(cover.small))
        .unwrap_or_default();
    Some(CoverMatch { cover_url })
}
