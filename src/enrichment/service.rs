//! Enrichment service - resumable ISBN/cover lookup over a whole catalog
//!
//! For each book, in input order:
//! 1. If its natural key is already in the progress state, reuse the cached
//!    cover (and ISBN, when the book has none) without touching the network
//! 2. With an ISBN: look up the cover by ISBN, falling back to a
//!    title/author search (cover only, the ISBN is never replaced)
//! 3. Without an ISBN: title/author search, adopting ISBN and cover
//! 4. Record the result, checkpoint every 10th book, pause before the next
//!
//! A final save happens after the loop.

use std::time::Duration;

use crate::catalog::BookRecord;
use crate::config::ImportConfig;
use crate::enrichment::domain::LookupOutcome;
use crate::enrichment::traits::BookLookup;
use crate::error::Result;
use crate::progress::{ProgressEntry, ProgressStore};

/// Books between progress checkpoints
pub const CHECKPOINT_INTERVAL: usize = 10;

/// Longest title prefix shown in progress lines
const TITLE_DISPLAY_CHARS: usize = 50;

/// Configuration for the enrichment service
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Pause between books that issued lookups
    pub request_delay: Duration,
    /// Cache results even when a lookup failed transiently
    pub cache_transient_failures: bool,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            request_delay: Duration::from_millis(crate::config::DEFAULT_REQUEST_DELAY_MS),
            cache_transient_failures: false,
        }
    }
}

impl From<&ImportConfig> for EnrichmentConfig {
    fn from(config: &ImportConfig) -> Self {
        Self {
            request_delay: config.request_delay,
            cache_transient_failures: config.cache_transient_failures,
        }
    }
}

/// Outcome of one enrichment run
#[derive(Debug)]
pub struct EnrichmentReport {
    /// Every input book, enriched, in input order
    pub books: Vec<BookRecord>,
    /// Books served from the progress cache
    pub cache_hits: usize,
    /// Books that went to the network
    pub looked_up: usize,
    /// Books left out of the cache because a lookup failed transiently
    pub uncached: usize,
}

/// What the lookups settled on for one book
struct Resolution {
    isbn: String,
    cover_url: String,
    /// A lookup in the chain failed transiently
    saw_transient: bool,
}

impl Resolution {
    /// A transient failure that left us without a cover may have hidden data
    fn is_definitive(&self) -> bool {
        !(self.saw_transient && self.cover_url.is_empty())
    }
}

/// Service that enriches catalog records through a lookup client
pub struct EnrichmentService<'a, L: ?Sized, S: ?Sized> {
    lookup: &'a L,
    store: &'a S,
    config: EnrichmentConfig,
}

impl<'a, L, S> EnrichmentService<'a, L, S>
where
    L: BookLookup + ?Sized,
    S: ProgressStore + ?Sized,
{
    pub fn new(lookup: &'a L, store: &'a S, config: EnrichmentConfig) -> Self {
        Self {
            lookup,
            store,
            config,
        }
    }

    /// Enrich every book, resuming from and checkpointing to the store.
    ///
    /// Only progress persistence can fail; lookup problems leave the
    /// affected fields empty.
    pub async fn run(&self, books: Vec<BookRecord>) -> Result<EnrichmentReport> {
        let mut state = self.store.load()?;
        println!(
            "Loaded progress: {} books already processed",
            state.processed.len()
        );

        let total = books.len();
        let mut report = EnrichmentReport {
            books: Vec::with_capacity(total),
            cache_hits: 0,
            looked_up: 0,
            uncached: 0,
        };

        for (i, mut book) in books.into_iter().enumerate() {
            let key = book.natural_key();

            if let Some(cached) = state.processed.get(&key) {
                // A record's own ISBN always wins over one cached under a shared key
                if book.isbn.is_empty() {
                    book.isbn = cached.isbn.clone();
                }
                book.cover_url = cached.cover_url.clone();
                report.cache_hits += 1;
                report.books.push(book);
                continue;
            }

            println!("\n[{}/{}] {}...", i + 1, total, display_title(&book.title));

            let resolution = self.resolve(&book).await;
            book.isbn = resolution.isbn.clone();
            book.cover_url = resolution.cover_url.clone();
            report.looked_up += 1;

            if resolution.is_definitive() || self.config.cache_transient_failures {
                state.processed.insert(
                    key,
                    ProgressEntry {
                        isbn: resolution.isbn,
                        cover_url: resolution.cover_url,
                    },
                );
            } else {
                tracing::warn!(
                    "Lookup for {:?} failed; not caching so the next run retries it",
                    book.title
                );
                report.uncached += 1;
            }
            state.last_index = i;

            if (i + 1) % CHECKPOINT_INTERVAL == 0 {
                self.store.save(&state)?;
                println!("\n  Progress saved ({} books processed)", i + 1);
            }

            report.books.push(book);

            if i + 1 < total && !self.config.request_delay.is_zero() {
                tokio::time::sleep(self.config.request_delay).await;
            }
        }

        self.store.save(&state)?;
        tracing::info!(
            "Enrichment finished: {} cached, {} looked up, {} left for retry",
            report.cache_hits,
            report.looked_up,
            report.uncached
        );

        Ok(report)
    }

    /// Apply the lookup fallback chain to one uncached book
    async fn resolve(&self, book: &BookRecord) -> Resolution {
        if book.has_isbn() {
            self.resolve_cover(book).await
        } else {
            self.resolve_by_search(book).await
        }
    }

    /// Book has an ISBN: only the cover is missing
    async fn resolve_cover(&self, book: &BookRecord) -> Resolution {
        println!("  ISBN: {} - looking up cover...", book.isbn);
        let mut resolution = Resolution {
            isbn: book.isbn.clone(),
            cover_url: String::new(),
            saw_transient: false,
        };

        let by_isbn = self.lookup.lookup_by_isbn(&book.isbn).await;
        resolution.saw_transient |= log_failure(&by_isbn, "ISBN lookup", &book.title);
        if let Some(cover) = by_isbn.found().filter(|c| !c.cover_url.is_empty()) {
            println!("  Found cover!");
            resolution.cover_url = cover.cover_url;
            return resolution;
        }

        println!("  No cover from ISBN, trying search...");
        let search = self
            .lookup
            .search_by_title_author(&book.title, &book.authors)
            .await;
        resolution.saw_transient |= log_failure(&search, "Search", &book.title);
        if let Some(found) = search.found().filter(|m| !m.cover_url.is_empty()) {
            println!("  Found cover via search!");
            resolution.cover_url = found.cover_url;
        }

        resolution
    }

    /// Book has no ISBN: search for both
    async fn resolve_by_search(&self, book: &BookRecord) -> Resolution {
        println!("  No ISBN - searching Open Library...");
        let search = self
            .lookup
            .search_by_title_author(&book.title, &book.authors)
            .await;
        let saw_transient = log_failure(&search, "Search", &book.title);

        let mut resolution = Resolution {
            isbn: String::new(),
            cover_url: String::new(),
            saw_transient,
        };

        match search.found() {
            Some(found) => {
                if !found.isbn.is_empty() {
                    println!("  Found ISBN: {}", found.isbn);
                    resolution.isbn = found.isbn;
                }
                if !found.cover_url.is_empty() {
                    println!("  Found cover!");
                    resolution.cover_url = found.cover_url;
                }
            }
            None => println!("  No results found"),
        }

        resolution
    }
}

/// Log a failed lookup. Returns true if the failure was transient.
fn log_failure<T>(outcome: &LookupOutcome<T>, what: &str, title: &str) -> bool {
    match outcome {
        LookupOutcome::TransientError(e) => {
            tracing::warn!("{} failed for {:?}: {}", what, title, e);
            true
        }
        LookupOutcome::NotFound => {
            tracing::debug!("{} found nothing for {:?}", what, title);
            false
        }
        LookupOutcome::Found(_) => false,
    }
}

fn display_title(title: &str) -> String {
    title.chars().take(TITLE_DISPLAY_CHARS).collect()
}
