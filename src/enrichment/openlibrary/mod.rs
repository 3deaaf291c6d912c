//! Open Library integration
//!
//! Finds ISBNs and cover images for books by title/author or by ISBN.
//! No API key required.
//!
//! API docs: https://openlibrary.org/developers/api

pub mod dto;
mod adapter;
mod client;

pub use client::OpenLibraryClient;
