//! BookBuddy CSV reader.
//!
//! Columns are matched by exact header name; any column may be missing, in
//! which case the field is left empty. When a header repeats, the last
//! column with that name wins. Rows without a title are skipped.

use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use super::{BookRecord, ReadingStatus};
use crate::error::{Result, ResultExt};

const TITLE: &str = "Title";
const AUTHOR: &str = "Author";
const ISBN: &str = "ISBN";
const PUBLISHER: &str = "Publisher";
const YEAR_PUBLISHED: &str = "Year Published";
const NUMBER_OF_PAGES: &str = "Number of Pages";
const NOTES: &str = "Notes";
const WISH_LIST: &str = "Wish List";
const STATUS: &str = "Status";

/// Header positions resolved once per file
struct Columns {
    title: Option<usize>,
    author: Option<usize>,
    isbn: Option<usize>,
    publisher: Option<usize>,
    year_published: Option<usize>,
    number_of_pages: Option<usize>,
    notes: Option<usize>,
    wish_list: Option<usize>,
    status: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, h)| *h == name)
                .map(|(i, _)| i)
                .last()
        };
        Self {
            title: find(TITLE),
            author: find(AUTHOR),
            isbn: find(ISBN),
            publisher: find(PUBLISHER),
            year_published: find(YEAR_PUBLISHED),
            number_of_pages: find(NUMBER_OF_PAGES),
            notes: find(NOTES),
            wish_list: find(WISH_LIST),
            status: find(STATUS),
        }
    }
}

/// Trimmed cell value, or "" when the column or cell is missing
fn cell<'r>(row: &'r StringRecord, column: Option<usize>) -> &'r str {
    column.and_then(|i| row.get(i)).map(str::trim).unwrap_or("")
}

/// Read and parse a BookBuddy export from disk.
///
/// Fails if the file can't be opened or a row is malformed.
pub fn read_catalog(path: &Path) -> Result<Vec<BookRecord>> {
    let file =
        std::fs::File::open(path).with_context(format!("opening {}", path.display()))?;
    parse_catalog(file).with_context(format!("parsing {}", path.display()))
}

/// Parse a BookBuddy export from any reader.
pub fn parse_catalog<R: Read>(source: R) -> Result<Vec<BookRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(source);

    let columns = Columns::from_headers(reader.headers()?);

    let mut books = Vec::new();
    let mut skipped = 0usize;

    for row in reader.records() {
        let row = row?;
        match to_record(&row, &columns) {
            Some(book) => books.push(book),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!("Skipped {} rows without a title", skipped);
    }

    Ok(books)
}

fn to_record(row: &StringRecord, columns: &Columns) -> Option<BookRecord> {
    let title = cell(row, columns.title);
    if title.is_empty() {
        return None;
    }

    let mut book = BookRecord::new(title, cell(row, columns.author));
    book.isbn = cell(row, columns.isbn).replace('-', "");
    book.publisher = cell(row, columns.publisher).to_string();
    book.publish_date = cell(row, columns.year_published).to_string();
    book.number_of_pages = cell(row, columns.number_of_pages).to_string();
    book.notes = cell(row, columns.notes).to_string();
    book.is_wishlist = cell(row, columns.wish_list) == "1";
    book.reading_status = ReadingStatus::from_bookbuddy(cell(row, columns.status));

    Some(book)
}
