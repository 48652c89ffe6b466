// src/utils/http.rs

//! HTTP client construction.

use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue};

use crate::config::HttpConfig;
use crate::error::Result;

/// Create an asynchronous HTTP client for the JSON API.
///
/// Every request and response body on this backend is JSON, so the
/// content-type and accept headers are pinned once here.
pub fn create_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}
