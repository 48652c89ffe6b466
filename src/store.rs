// src/store.rs

//! Book collection state container.
//!
//! `BookStore` owns the authoritative in-memory collection and tracks each
//! CRUD operation's in-flight flag and error independently, so a failed
//! create never blanks out an earlier list error and a delete racing a list
//! refresh keeps its own status. Successful mutations patch the local
//! collection in place (append/replace/remove); nothing re-fetches behind
//! the caller's back, and a failed fetch leaves the previous collection
//! visible.
//!
//! State sits behind a `std::sync::Mutex` that is never held across an
//! await: concurrent operations suspend only their own caller and apply
//! their results in completion order. Two racing mutations on the same
//! record can therefore land out of issue order; no sequencing token
//! discards stale responses.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use futures::stream::{self, StreamExt};

use crate::api::BookApi;
use crate::config::ImportConfig;
use crate::error::{AppError, Result};
use crate::models::{Book, BookDraft};

/// CRUD operations tracked by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Create,
    Read,
    Update,
    Delete,
}

/// Per-operation status: in-flight flag plus the last error, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpStatus {
    /// True while the operation's request is outstanding
    pub in_flight: bool,

    /// Human-readable failure from the last attempt
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct StoreState {
    books: Vec<Book>,
    loaded: Option<Book>,
    list: OpStatus,
    create: OpStatus,
    read: OpStatus,
    update: OpStatus,
    delete: OpStatus,
}

impl StoreState {
    fn status_mut(&mut self, op: Operation) -> &mut OpStatus {
        match op {
            Operation::List => &mut self.list,
            Operation::Create => &mut self.create,
            Operation::Read => &mut self.read,
            Operation::Update => &mut self.update,
            Operation::Delete => &mut self.delete,
        }
    }
}

/// State container over a book backend.
pub struct BookStore<A: BookApi> {
    api: A,
    state: Mutex<StoreState>,
}

impl<A: BookApi> BookStore<A> {
    /// Create an empty store over the given backend.
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Fetch the full collection.
    ///
    /// On success the local collection is replaced; on failure the previous
    /// collection stays visible and the list error is set.
    pub async fn list(&self) -> Result<Vec<Book>> {
        self.begin(Operation::List);
        match self.api.list().await {
            Ok(books) => {
                let mut state = self.lock();
                state.list.in_flight = false;
                state.books = books.clone();
                Ok(books)
            }
            Err(err) => Err(self.fail(Operation::List, err)),
        }
    }

    /// Create a record from a draft and append it to the local collection.
    ///
    /// An invalid draft sets the create error and returns without any
    /// network call.
    pub async fn create(&self, draft: &BookDraft) -> Result<Book> {
        if let Some(err) = self.reject_invalid(Operation::Create, draft) {
            return Err(err);
        }

        self.begin(Operation::Create);
        match self.api.create(draft).await {
            Ok(book) => {
                let mut state = self.lock();
                state.create.in_flight = false;
                state.books.push(book.clone());
                Ok(book)
            }
            Err(err) => Err(self.fail(Operation::Create, err)),
        }
    }

    /// Fetch a single record and keep it as the currently loaded one.
    ///
    /// On failure (including not-found) the loaded record is cleared.
    pub async fn read_one(&self, id: u64) -> Result<Book> {
        self.begin(Operation::Read);
        self.lock().loaded = None;

        match self.api.fetch(id).await {
            Ok(book) => {
                let mut state = self.lock();
                state.read.in_flight = false;
                state.loaded = Some(book.clone());
                Ok(book)
            }
            Err(err) => Err(self.fail(Operation::Read, err)),
        }
    }

    /// Replace a record's fields.
    ///
    /// On success the matching collection entry is replaced, and so is the
    /// loaded record when it shares the id. An invalid draft sets the
    /// update error and returns without any network call.
    pub async fn update(&self, id: u64, draft: &BookDraft) -> Result<Book> {
        if let Some(err) = self.reject_invalid(Operation::Update, draft) {
            return Err(err);
        }

        self.begin(Operation::Update);
        match self.api.update(id, draft).await {
            Ok(book) => {
                let mut state = self.lock();
                state.update.in_flight = false;
                if let Some(entry) = state.books.iter_mut().find(|b| b.id == id) {
                    *entry = book.clone();
                }
                if state.loaded.as_ref().is_some_and(|b| b.id == id) {
                    state.loaded = Some(book.clone());
                }
                Ok(book)
            }
            Err(err) => Err(self.fail(Operation::Update, err)),
        }
    }

    /// Delete a record and drop it from the local collection.
    pub async fn delete(&self, id: u64) -> Result<()> {
        self.begin(Operation::Delete);
        match self.api.delete(id).await {
            Ok(()) => {
                let mut state = self.lock();
                state.delete.in_flight = false;
                state.books.retain(|b| b.id != id);
                Ok(())
            }
            Err(err) => Err(self.fail(Operation::Delete, err)),
        }
    }

    /// Create many records with bounded concurrency.
    ///
    /// Drafts failing client-side validation are reported in the outcome
    /// without reaching the network. Successful records are appended to the
    /// local collection in completion order. Import reports failures through
    /// the returned outcome rather than the per-operation status table.
    pub async fn import(&self, drafts: &[BookDraft], config: &ImportConfig) -> ImportOutcome {
        let delay = Duration::from_millis(config.request_delay_ms);
        let concurrency = config.max_concurrent.max(1);

        let mut outcome = ImportOutcome::default();

        let mut pending = Vec::new();
        for draft in drafts {
            match draft.validate() {
                Ok(()) => pending.push(draft),
                Err(errors) => outcome.failures.push(ImportFailure {
                    title: draft.title.clone(),
                    reason: errors.to_string(),
                }),
            }
        }

        let mut results = stream::iter(pending)
            .map(|draft| async move { (draft.title.clone(), self.api.create(draft).await) })
            .buffer_unordered(concurrency);

        while let Some((title, result)) = results.next().await {
            match result {
                Ok(book) => {
                    self.lock().books.push(book.clone());
                    outcome.added.push(book);
                }
                Err(error) => {
                    log::warn!("Failed to import '{}': {}", title, error);
                    outcome.failures.push(ImportFailure {
                        title,
                        reason: error.to_string(),
                    });
                }
            }

            if delay.as_millis() > 0 {
                tokio::time::sleep(delay).await;
            }
        }

        outcome
    }

    /// Snapshot of the local collection.
    pub fn books(&self) -> Vec<Book> {
        self.lock().books.clone()
    }

    /// The currently loaded record, if any.
    pub fn loaded(&self) -> Option<Book> {
        self.lock().loaded.clone()
    }

    /// Number of records in the local collection.
    pub fn count(&self) -> usize {
        self.lock().books.len()
    }

    /// Status of one operation.
    pub fn status(&self, op: Operation) -> OpStatus {
        self.lock().status_mut(op).clone()
    }

    /// Last error of one operation, if any.
    pub fn error(&self, op: Operation) -> Option<String> {
        self.status(op).error
    }

    /// Clear one operation's error without touching the others.
    pub fn clear_error(&self, op: Operation) {
        self.lock().status_mut(op).error = None;
    }

    /// Mark an operation in flight and clear its own error only.
    fn begin(&self, op: Operation) {
        let mut state = self.lock();
        let status = state.status_mut(op);
        status.in_flight = true;
        status.error = None;
    }

    /// Record a failure and hand the error back for propagation.
    fn fail(&self, op: Operation, err: AppError) -> AppError {
        let mut state = self.lock();
        let status = state.status_mut(op);
        status.in_flight = false;
        status.error = Some(err.to_string());
        err
    }

    /// Validation backstop for mutating operations: records the error on
    /// the operation without ever toggling its in-flight flag.
    fn reject_invalid(&self, op: Operation, draft: &BookDraft) -> Option<AppError> {
        match draft.validate() {
            Ok(()) => None,
            Err(errors) => {
                let err = AppError::validation(errors.to_string());
                self.lock().status_mut(op).error = Some(err.to_string());
                Some(err)
            }
        }
    }

    // Critical sections never panic while holding the guard, so a poisoned
    // lock can only carry consistent state; take it as-is.
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Summary of a bulk import run.
#[derive(Debug, Default)]
pub struct ImportOutcome {
    /// Records created, in completion order
    pub added: Vec<Book>,
    /// Drafts that failed validation or the create call
    pub failures: Vec<ImportFailure>,
}

impl ImportOutcome {
    /// True when every draft was imported.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// One draft that did not make it into the collection.
#[derive(Debug)]
pub struct ImportFailure {
    pub title: String,
    pub reason: String,
}
