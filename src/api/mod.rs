//! Backend access for book records.
//!
//! `BookApi` is the seam between the store and the wire. `RestApi` talks to
//! the real backend; tests substitute an in-process fake.

pub mod rest;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{Book, BookDraft};

// Re-export for convenience
pub use rest::RestApi;

/// Trait for backends serving book records.
#[async_trait]
pub trait BookApi: Send + Sync {
    /// Fetch the full collection.
    async fn list(&self) -> Result<Vec<Book>>;

    /// Create a record from a draft; the backend assigns the id.
    async fn create(&self, draft: &BookDraft) -> Result<Book>;

    /// Fetch a single record by id.
    async fn fetch(&self, id: u64) -> Result<Book>;

    /// Replace a record's fields; the id stays fixed.
    async fn update(&self, id: u64, draft: &BookDraft) -> Result<Book>;

    /// Delete a record by id.
    async fn delete(&self, id: u64) -> Result<()>;
}
