//! Open Library HTTP client
//!
//! Handles communication with the Open Library web service.
//! See: https://openlibrary.org/developers/api
//!
//! No API key is required. Open Library asks clients to identify themselves
//! with a User-Agent and to keep request rates modest; the pause between
//! records is enforced by the enrichment service, not here.
//!
//! Every public operation returns a [`LookupOutcome`] and never fails: the
//! import treats any problem with a single lookup as "no result".

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{adapter, dto};
use crate::enrichment::domain::{BookMatch, CoverMatch, EnrichmentError, LookupOutcome};

/// User agent string sent with every request
pub const USER_AGENT: &str = "FamilyBooks/1.0";

/// Per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Open Library API client
pub struct OpenLibraryClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl OpenLibraryClient {
    /// Create a client against the given base URL (e.g. `https://openlibrary.org`)
    pub fn new(base_url: impl Into<String>) -> Result<Self, EnrichmentError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| EnrichmentError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Search by title and/or author, returning the first hit's ISBN and cover.
    ///
    /// With both arguments empty no request is made.
    pub async fn search_by_title_author(
        &self,
        title: &str,
        author: &str,
    ) -> LookupOutcome<BookMatch> {
        let Some(url) = self.title_author_url(title, author) else {
            return LookupOutcome::NotFound;
        };

        let result = self
            .get_json::<dto::SearchResponse>(&url)
            .await
            .map(adapter::to_book_match);
        LookupOutcome::from_result(result)
    }

    /// Look up an edition's cover by ISBN.
    ///
    /// Falls back to [`search_by_isbn`](Self::search_by_isbn) when the Books
    /// API has no entry for the ISBN.
    pub async fn lookup_by_isbn(&self, isbn: &str) -> LookupOutcome<CoverMatch> {
        let isbn = adapter::normalize_isbn(isbn);
        let url = format!(
            "{}/api/books?bibkeys=ISBN:{}&format=json&jscmd=data",
            self.base_url,
            urlencoding::encode(&isbn)
        );

        match self.get_json::<dto::BooksResponse>(&url).await {
            Ok(response) => match adapter::to_edition_cover(response, &isbn) {
                Some(cover) => LookupOutcome::Found(cover),
                None => {
                    tracing::debug!("No edition for ISBN {}, trying search", isbn);
                    self.search_by_isbn(&isbn).await
                }
            },
            Err(e) => LookupOutcome::from_result(Err(e)),
        }
    }

    /// Search by ISBN, returning the first hit's cover.
    pub async fn search_by_isbn(&self, isbn: &str) -> LookupOutcome<CoverMatch> {
        let url = format!(
            "{}/search.json?isbn={}&limit=1",
            self.base_url,
            urlencoding::encode(isbn)
        );

        let result = self
            .get_json::<dto::SearchResponse>(&url)
            .await
            .map(adapter::to_search_cover);
        LookupOutcome::from_result(result)
    }

    /// Build the title/author search URL, or `None` if there is nothing to search
    fn title_author_url(&self, title: &str, author: &str) -> Option<String> {
        let mut params = Vec::new();
        if !title.is_empty() {
            params.push(format!("title={}", urlencoding::encode(title)));
        }
        if !author.is_empty() {
            params.push(format!("author={}", urlencoding::encode(author)));
        }
        if params.is_empty() {
            return None;
        }

        Some(format!(
            "{}/search.json?{}&limit=1",
            self.base_url,
            params.join("&")
        ))
    }

    /// Send a GET request and parse the JSON body
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, EnrichmentError> {
        tracing::debug!("GET {}", url);

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(EnrichmentError::NoMatches);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EnrichmentError::RateLimited);
        }

        if !status.is_success() {
            return Err(EnrichmentError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let body = response.bytes().await.map_err(map_request_error)?;
        serde_json::from_slice(&body).map_err(|e| EnrichmentError::Parse(e.to_string()))
    }
}

fn map_request_error(e: reqwest::Error) -> EnrichmentError {
    if e.is_timeout() {
        EnrichmentError::Timeout
    } else {
        EnrichmentError::Network(e.to_string())
    }
}
