// src/api/rest.rs

//! REST implementation of `BookApi`.
//!
//! Wire contract:
//!
//! | operation | method & path            | success body        |
//! |-----------|--------------------------|---------------------|
//! | list      | GET `/api/books`         | JSON array of Book  |
//! | create    | POST `/api/books`        | JSON Book (with id) |
//! | read one  | GET `/api/books/{id}`    | JSON Book           |
//! | update    | PUT `/api/books/{id}`    | JSON Book           |
//! | delete    | DELETE `/api/books/{id}` | empty/ack           |
//!
//! Non-2xx responses may carry a JSON `{message}` field, preferred over the
//! generic fallback when present. Transport failures (unreachable backend,
//! timeout) collapse into `AppError::Connection` so callers surface one
//! consistent connectivity message.

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::api::BookApi;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{Book, BookDraft};
use crate::utils::{http, join_url};

/// Collection endpoint path, relative to the profile base URL.
const BOOKS_PATH: &str = "api/books";

/// REST client for the bookstore backend.
#[derive(Debug, Clone)]
pub struct RestApi {
    client: reqwest::Client,
    base_url: Url,
}

impl RestApi {
    /// Create a client against the given base URL.
    pub fn new(client: reqwest::Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Build a client from configuration and an active profile name.
    pub fn from_config(config: &Config, profile: &str) -> Result<Self> {
        let client = http::create_client(&config.http)?;
        let base_url = config.base_url(profile)?;
        Ok(Self::new(client, base_url))
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn books_url(&self) -> Result<Url> {
        join_url(&self.base_url, BOOKS_PATH)
    }

    fn book_url(&self, id: u64) -> Result<Url> {
        join_url(&self.base_url, &format!("{BOOKS_PATH}/{id}"))
    }
}

#[async_trait]
impl BookApi for RestApi {
    async fn list(&self) -> Result<Vec<Book>> {
        let url = self.books_url()?;
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(api_error(response, "Failed to fetch books").await);
        }
        Ok(response.json().await?)
    }

    async fn create(&self, draft: &BookDraft) -> Result<Book> {
        let url = self.books_url()?;
        log::debug!("POST {url}");
        let response = self
            .client
            .post(url)
            .json(draft)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(api_error(response, "Failed to add book").await);
        }
        Ok(response.json().await?)
    }

    async fn fetch(&self, id: u64) -> Result<Book> {
        let url = self.book_url(id)?;
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(api_error(response, "Book not found").await);
        }
        Ok(response.json().await?)
    }

    async fn update(&self, id: u64, draft: &BookDraft) -> Result<Book> {
        let url = self.book_url(id)?;
        log::debug!("PUT {url}");
        let response = self
            .client
            .put(url)
            .json(draft)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(api_error(response, "Failed to update book").await);
        }
        Ok(response.json().await?)
    }

    async fn delete(&self, id: u64) -> Result<()> {
        let url = self.book_url(id)?;
        log::debug!("DELETE {url}");
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(transport_error)?;

        if !response.status().is_success() {
            return Err(api_error(response, "Failed to delete book").await);
        }
        Ok(())
    }
}

/// Optional error payload on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Collapse transport-level failures into the connectivity error.
fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_connect() || err.is_timeout() {
        AppError::Connection
    } else {
        AppError::Http(err)
    }
}

/// Turn a non-2xx response into an API error.
async fn api_error(response: reqwest::Response, fallback: &str) -> AppError {
    let status = response.status().as_u16();
    let server_message = response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message);
    AppError::api(status, display_message(status, server_message, fallback))
}

/// Prefer the server-provided message; fall back to the generic one.
fn display_message(status: u16, server_message: Option<String>, fallback: &str) -> String {
    server_message.unwrap_or_else(|| format!("HTTP {status}: {fallback}"))
}
