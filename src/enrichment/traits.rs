//! Trait definition for the bibliographic lookup client.
//!
//! The enrichment service is written against [`BookLookup`] so tests can
//! substitute a scripted mock for the real Open Library client.

use async_trait::async_trait;

use super::domain::{BookMatch, CoverMatch, LookupOutcome};

/// The two lookups the enrichment loop issues.
#[async_trait]
pub trait BookLookup: Send + Sync {
    /// Search by title/author for an ISBN and a cover.
    async fn search_by_title_author(&self, title: &str, author: &str) -> LookupOutcome<BookMatch>;

    /// Find a cover for a known ISBN.
    async fn lookup_by_isbn(&self, isbn: &str) -> LookupOutcome<CoverMatch>;
}

#[async_trait]
impl BookLookup for super::openlibrary::OpenLibraryClient {
    async fn search_by_title_author(&self, title: &str, author: &str) -> LookupOutcome<BookMatch> {
        self.search_by_title_author(title, author).await
    }

    async fn lookup_by_isbn(&self, isbn: &str) -> LookupOutcome<CoverMatch> {
        self.lookup_by_isbn(isbn).await
    }
}
