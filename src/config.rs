// src/config.rs

//! Application configuration structures.
//!
//! Configuration is loaded from a TOML file. Every field has a serde
//! default so a partial (or absent) file still yields a usable config.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};

/// Profile name used when neither the CLI flag nor the environment picks one.
pub const DEFAULT_PROFILE: &str = "development";

/// Environment variable consulted for the active profile.
pub const PROFILE_ENV_VAR: &str = "BOOKSTOCK_PROFILE";

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP client behavior settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Bulk import behavior settings
    #[serde(default)]
    pub import: ImportConfig,

    /// Named backend profiles (base URL per environment)
    #[serde(default = "defaults::profiles")]
    pub profiles: HashMap<String, Profile>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.import.max_concurrent == 0 {
            return Err(AppError::validation("import.max_concurrent must be > 0"));
        }
        if self.profiles.is_empty() {
            return Err(AppError::validation("No profiles defined"));
        }
        for (name, profile) in &self.profiles {
            if Url::parse(&profile.base_url).is_err() {
                return Err(AppError::validation(format!(
                    "profiles.{name}.base_url is not a valid URL: {}",
                    profile.base_url
                )));
            }
        }
        Ok(())
    }

    /// Resolve the base URL for a named profile.
    pub fn base_url(&self, profile: &str) -> Result<Url> {
        let entry = self.profiles.get(profile).ok_or_else(|| {
            AppError::config(format!("Unknown profile '{profile}' (check [profiles] in config)"))
        })?;
        Ok(Url::parse(&entry.base_url)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            import: ImportConfig::default(),
            profiles: defaults::profiles(),
        }
    }
}

/// HTTP client behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Bulk import behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Maximum concurrent create requests during import
    #[serde(default = "defaults::max_concurrent")]
    pub max_concurrent: usize,

    /// Delay between request completions in milliseconds
    #[serde(default = "defaults::request_delay")]
    pub request_delay_ms: u64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_concurrent: defaults::max_concurrent(),
            request_delay_ms: defaults::request_delay(),
        }
    }
}

/// A named backend endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Base URL of the backend for this profile
    pub base_url: String,
}

/// Pick the active profile name: explicit flag, then environment, then default.
pub fn active_profile(explicit: Option<&str>) -> String {
    pick_profile(explicit, std::env::var(PROFILE_ENV_VAR).ok())
}

fn pick_profile(explicit: Option<&str>, env: Option<String>) -> String {
    explicit
        .map(str::to_string)
        .or(env)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
}

mod defaults {
    use std::collections::HashMap;

    use super::Profile;

    pub fn user_agent() -> String {
        "bookstock/0.1".into()
    }
    pub fn timeout() -> u64 {
        30
    }
    pub fn max_concurrent() -> usize {
        4
    }
    pub fn request_delay() -> u64 {
        0
    }

    pub fn profiles() -> HashMap<String, Profile> {
        HashMap::from([
            (
                "development".to_string(),
                Profile {
                    base_url: "http://127.0.0.1:8000".to_string(),
                },
            ),
            (
                "production".to_string(),
                Profile {
                    base_url: "https://bookstoredb.onrender.com".to_string(),
                },
            ),
        ])
    }
}
