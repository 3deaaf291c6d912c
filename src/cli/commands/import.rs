//! The import run: parse, enrich, write, summarize.

use chrono::Utc;
use tokio::runtime::Runtime;

use crate::catalog;
use crate::config::ImportConfig;
use crate::enrichment::{EnrichmentConfig, EnrichmentService, OpenLibraryClient};
use crate::output::{self, ImportSummary, OutputDocument};
use crate::progress::JsonProgressStore;

use super::print_rule;

/// Import a BookBuddy CSV into a keyed output document
pub fn cmd_import(rt: &Runtime, config: &ImportConfig) -> anyhow::Result<()> {
    print_rule();
    println!("BookBuddy Import");
    print_rule();

    println!("\nParsing CSV: {}", config.input_path.display());
    let books = catalog::read_catalog(&config.input_path)?;
    println!("Found {} books in CSV", books.len());

    let client = OpenLibraryClient::new(config.api_base_url.as_str())?;
    let store = JsonProgressStore::new(&config.progress_path);
    println!("Progress file: {}", store.path().display());
    let service = EnrichmentService::new(&client, &store, EnrichmentConfig::from(config));

    let report = rt.block_on(service.run(books))?;

    println!();
    print_rule();
    println!("Generating output...");

    let document = OutputDocument::build(&report.books, Utc::now());
    output::write_document(&document, &config.output_path)?;
    println!("\nOutput saved to: {}", config.output_path.display());

    let summary = ImportSummary::from_books(&report.books);
    println!();
    print_rule();
    println!("SUMMARY");
    print_rule();
    println!("{}", summary);

    if report.uncached > 0 {
        println!(
            "\n{} book(s) hit lookup errors and will be retried on the next run.",
            report.uncached
        );
    }

    Ok(())
}
