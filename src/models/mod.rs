// src/models/mod.rs

//! Domain models for the bookstock client.

mod book;

// Re-export all public types
pub use book::{Book, BookDraft, DraftErrors};
