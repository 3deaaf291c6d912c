//! Test utilities and fixtures for shelf-import tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{MemoryProgressStore, numbered_books};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let store = MemoryProgressStore::default();
//!     let books = numbered_books(23);
//!     // ... test logic
//!     assert_eq!(store.saves().len(), 3);
//! }
//! ```

use std::path::PathBuf;
use std::sync::Mutex;

use tempfile::TempDir;

use crate::catalog::BookRecord;
use crate::error::Result;
use crate::progress::{ProgressState, ProgressStore};

/// Full BookBuddy header row, in export order
pub const BOOKBUDDY_HEADER: &str =
    "Title,Author,ISBN,Publisher,Year Published,Number of Pages,Notes,Wish List,Status";

/// Writes a BookBuddy CSV with the standard header and the given rows.
///
/// Keep the TempDir alive for the duration of your test.
pub fn write_csv(rows: &[&str]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let path = dir.path().join("BookBuddy.csv");

    let mut contents = String::from(BOOKBUDDY_HEADER);
    contents.push('\n');
    for row in rows {
        contents.push_str(row);
        contents.push('\n');
    }
    std::fs::write(&path, contents).expect("Failed to write CSV fixture");

    (dir, path)
}

/// Creates `n` books titled `Book 0`, `Book 1`, … with distinct authors and no ISBN.
pub fn numbered_books(n: usize) -> Vec<BookRecord> {
    (0..n)
        .map(|i| BookRecord::new(format!("Book {}", i), format!("Author {}", i)))
        .collect()
}

/// In-memory progress store that keeps a copy of every save.
#[derive(Default)]
pub struct MemoryProgressStore {
    current: Mutex<ProgressState>,
    saves: Mutex<Vec<ProgressState>>,
}

impl MemoryProgressStore {
    /// A store that already holds `state`, as if a previous run saved it
    pub fn with_state(state: ProgressState) -> Self {
        Self {
            current: Mutex::new(state),
            saves: Mutex::new(Vec::new()),
        }
    }

    /// Every state passed to `save`, oldest first
    pub fn saves(&self) -> Vec<ProgressState> {
        self.saves.lock().unwrap().clone()
    }

    pub fn last_saved(&self) -> Option<ProgressState> {
        self.saves.lock().unwrap().last().cloned()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn load(&self) -> Result<ProgressState> {
        Ok(self.current.lock().unwrap().clone())
    }

    fn save(&self, state: &ProgressState) -> Result<()> {
        *self.current.lock().unwrap() = state.clone();
        self.saves.lock().unwrap().push(state.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv_has_header() {
        let (_dir, path) = write_csv(&["Dune,Frank Herbert,,,,,,,"]);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with(BOOKBUDDY_HEADER));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_numbered_books_have_distinct_keys() {
        let books = numbered_books(3);
        assert_eq!(books[2].natural_key(), "Book 2|Author 2");
        assert!(books.iter().all(|b| !b.has_isbn()));
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryProgressStore::default();
        let mut state = store.load().unwrap();
        state.last_index = 7;
        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap().last_index, 7);
        assert_eq!(store.saves().len(), 1);
    }
}
