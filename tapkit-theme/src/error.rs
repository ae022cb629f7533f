//! # Theme Error Types
//!
//! Errors produced while loading theme documents and decoding their values.
//!
//! Loading failures are returned to the caller. Decoding failures are absorbed
//! by the decoders (they log and fall back), but the typed errors are still
//! exposed so callers can run a decoder directly and inspect why it failed.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a document.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file or bundle resource does not exist.
    #[error("Theme document not found: {path:?}")]
    NotFound {
        /// The path that was looked up.
        path: PathBuf,
    },

    /// The bytes are not a valid JSON, property list or TOML document.
    #[error("Failed to parse theme document {origin}: {details}")]
    Parse {
        /// Where the bytes came from (path or URL).
        origin: String,
        /// Details about the parse error.
        details: String,
    },

    /// The remote URL is malformed or does not point at a `.json` file.
    #[error("Invalid theme URL '{url}': {reason}")]
    InvalidUrl {
        /// The rejected URL string.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The network request failed.
    #[error("Failed to fetch theme document {url}: {details}")]
    Network {
        /// The requested URL.
        url: String,
        /// Details about the failure.
        details: String,
    },

    /// Reading a file that exists failed.
    #[error("Failed to read theme document {path:?}: {source}")]
    Io {
        /// The path being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Create a not found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a parse error.
    pub fn parse(origin: impl Into<String>, details: impl ToString) -> Self {
        Self::Parse {
            origin: origin.into(),
            details: details.to_string(),
        }
    }

    /// Create an invalid URL error.
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a network error.
    pub fn network(url: impl Into<String>, details: impl ToString) -> Self {
        Self::Network {
            url: url.into(),
            details: details.to_string(),
        }
    }
}

/// Errors that can occur while decoding a raw value into a typed value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A hex color string does not start with `#`.
    #[error("Hex color '{0}' does not start with '#'")]
    NoHashPrefix(String),

    /// A hex color string contains characters outside `[0-9a-fA-F]`.
    #[error("Hex color '{0}' contains invalid hex digits")]
    InvalidHexDigits(String),

    /// A hex color string has a digit count other than 3, 4, 6 or 8.
    #[error("Hex color '{value}' has unsupported length {len}")]
    UnsupportedLength {
        /// The rejected string.
        value: String,
        /// Number of digits after the `#`.
        len: usize,
    },

    /// Nothing usable was found for the key path or resource name.
    #[error("No value found for '{0}'")]
    NotFound(String),
}

/// Errors that can occur in the theming system outside of plain loading.
#[derive(Error, Debug)]
pub enum ThemeError {
    /// Loading a document failed.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Error parsing a theme configuration file.
    #[error("Failed to parse theme configuration {path:?}: {details}")]
    ConfigParse {
        /// The path of the configuration file.
        path: PathBuf,
        /// Details about the parse error.
        details: String,
    },

    /// Error reloading a theme after a file change.
    #[error("Failed to reload theme: {source}")]
    Reload {
        /// The underlying error.
        #[source]
        source: LoadError,
    },

    /// Error setting up the file watcher for hot reload.
    #[error("Failed to setup file watcher: {source}")]
    FileWatcher {
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Generic I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for theme operations.
pub type ThemeResult<T> = Result<T, ThemeError>;

impl ThemeError {
    /// Create a configuration parse error.
    pub fn config_parse(path: impl Into<PathBuf>, details: impl ToString) -> Self {
        Self::ConfigParse {
            path: path.into(),
            details: details.to_string(),
        }
    }

    /// Create a file watcher error from any error type.
    pub fn file_watcher(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::FileWatcher {
            source: Box::new(source),
        }
    }
}
