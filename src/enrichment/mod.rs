//! Book enrichment - finds ISBNs and cover art from Open Library.
//!
//! # Architecture
//!
//! - **Domain models** (`domain.rs`) - our lookup results and error types
//! - **API DTOs** (`openlibrary/dto.rs`) - exact API response shapes
//! - **Adapter** - converts DTOs to domain models
//! - **Client** - HTTP client for Open Library
//! - **Traits** - the lookup seam the service is written against
//! - **Service** - the resumable enrichment loop
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::{EnrichmentService, EnrichmentConfig, OpenLibraryClient};
//!
//! let client = OpenLibraryClient::new("https://openlibrary.org")?;
//! let store = JsonProgressStore::new("import_progress.json");
//! let service = EnrichmentService::new(&client, &store, EnrichmentConfig::default());
//!
//! let report = service.run(books).await?;
//! println!("{} looked up, {} cached", report.looked_up, report.cache_hits);
//! ```

pub mod domain;
pub mod openlibrary;
pub mod service;
pub mod traits;

pub use domain::{BookMatch, CoverMatch, EnrichmentError, LookupOutcome};
pub use openlibrary::OpenLibraryClient;
pub use service::{EnrichmentConfig, EnrichmentReport, EnrichmentService};
pub use traits::BookLookup;
