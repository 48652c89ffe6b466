//! Utility functions and helpers.

pub mod http;

use url::Url;

use crate::error::Result;

/// Join an endpoint path onto a base URL.
///
/// Tolerates a trailing slash on the base and a leading slash on the path,
/// so configured base URLs never produce doubled or missing separators.
pub fn join_url(base: &Url, path: &str) -> Result<Url> {
    let mut joined = base.as_str().trim_end_matches('/').to_string();
    joined.push('/');
    joined.push_str(path.trim_start_matches('/'));
    Ok(Url::parse(&joined)?)
}
