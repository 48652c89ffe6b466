// src/storage.rs

//! Snapshot files and import seeds.
//!
//! Exports write a self-describing JSON envelope so a snapshot can be
//! inspected or re-imported later:
//!
//! ```json
//! {
//!   "exported_at": "2026-08-25T09:30:00Z",
//!   "count": 2,
//!   "books": [ { "id": 1, "title": "...", ... } ]
//! }
//! ```
//!
//! Imports read either a snapshot or a TOML seed file of drafts:
//!
//! ```toml
//! [[books]]
//! title = "The Pragmatic Programmer"
//! author = "Hunt & Thomas"
//! price = 39.99
//! qty = 12
//! ```

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::{Book, BookDraft};

/// On-disk export envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub exported_at: DateTime<Utc>,
    pub count: usize,
    pub books: Vec<Book>,
}

impl Snapshot {
    /// Wrap a collection with the current timestamp.
    pub fn new(books: Vec<Book>) -> Self {
        Self {
            exported_at: Utc::now(),
            count: books.len(),
            books,
        }
    }

    /// Turn the snapshot's records back into drafts for re-import.
    pub fn into_drafts(self) -> Vec<BookDraft> {
        self.books.iter().map(Book::to_draft).collect()
    }
}

#[derive(Debug, Deserialize)]
struct DraftFile {
    #[serde(default)]
    books: Vec<BookDraft>,
}

/// Write a snapshot of the collection to `path`.
pub async fn write_snapshot(path: impl AsRef<Path>, books: &[Book]) -> Result<Snapshot> {
    let snapshot = Snapshot::new(books.to_vec());
    let bytes = serde_json::to_vec_pretty(&snapshot)?;
    write_bytes_atomic(path.as_ref(), &bytes).await?;
    log::info!(
        "Exported {} books to {}",
        snapshot.count,
        path.as_ref().display()
    );
    Ok(snapshot)
}

/// Read a snapshot, returning `None` if the file doesn't exist.
pub async fn read_snapshot(path: impl AsRef<Path>) -> Result<Option<Snapshot>> {
    match tokio::fs::read(path.as_ref()).await {
        Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Io(e)),
    }
}

/// Read an import seed: a TOML draft file, or a JSON snapshot when the
/// path ends in `.json`.
pub async fn read_drafts(path: impl AsRef<Path>) -> Result<Vec<BookDraft>> {
    let path = path.as_ref();
    if path.extension().is_some_and(|ext| ext == "json") {
        let snapshot = read_snapshot(path).await?.ok_or_else(|| {
            AppError::config(format!("Snapshot file not found: {}", path.display()))
        })?;
        return Ok(snapshot.into_drafts());
    }

    let text = tokio::fs::read_to_string(path).await?;
    let file: DraftFile = toml::from_str(&text)?;
    Ok(file.books)
}

/// Write bytes atomically (write to temp, then rename).
async fn write_bytes_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
