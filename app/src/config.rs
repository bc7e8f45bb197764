//! Application configuration.
//!
//! Everything is read from the environment with sensible defaults:
//!
//! | Variable                  | Default                                       |
//! |---------------------------|-----------------------------------------------|
//! | `TODOBOARD_DIRECTORY_URL` | `https://jsonplaceholder.typicode.com/users`  |
//! | `TODOBOARD_LOG`           | `todoboard=info,todoboard_runtime=info`       |
//!
//! ```no_run
//! use todoboard::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! println!("Directory: {}", config.directory_url);
//! # Ok(())
//! # }
//! ```

use reqwest::Url;
use thiserror::Error;

/// Variable holding the user directory endpoint
pub const DIRECTORY_URL_VAR: &str = "TODOBOARD_DIRECTORY_URL";

/// Variable holding the log filter
pub const LOG_FILTER_VAR: &str = "TODOBOARD_LOG";

/// Endpoint used when none is configured
pub const DEFAULT_DIRECTORY_URL: &str = "https://jsonplaceholder.typicode.com/users";

/// Log filter used when none is configured
pub const DEFAULT_LOG_FILTER: &str = "todoboard=info,todoboard_runtime=info";

/// Configuration error
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The directory endpoint is not a valid URL
    #[error("invalid directory URL {url:?}: {reason}")]
    InvalidUrl {
        /// The rejected value
        url: String,
        /// Parser message
        reason: String,
    },

    /// The directory endpoint is not http or https
    #[error("unsupported scheme {scheme:?} for directory URL (expected http or https)")]
    UnsupportedScheme {
        /// The rejected scheme
        scheme: String,
    },
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Endpoint of the user directory
    pub directory_url: Url,
    /// `tracing-subscriber` filter directives
    pub log_filter: String,
}

impl AppConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the directory endpoint is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its value
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the directory endpoint is invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let directory_url = lookup(DIRECTORY_URL_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DIRECTORY_URL.to_string());
        let log_filter = lookup(LOG_FILTER_VAR)
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(Self {
            directory_url: parse_directory_url(&directory_url)?,
            log_filter,
        })
    }

    /// Replace the directory endpoint
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `url` is invalid.
    pub fn with_directory_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.directory_url = parse_directory_url(url)?;
        Ok(self)
    }
}

fn parse_directory_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim()).map_err(|e| ConfigError::InvalidUrl {
        url: value.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(ConfigError::UnsupportedScheme {
            scheme: scheme.to_string(),
        }),
    }
}
