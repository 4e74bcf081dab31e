//! Error types and handling for sitegen-core operations.
//!
//! Most failures in the generator are soft: missing inputs, malformed rows and
//! unreachable export endpoints are logged and turned into empty collections
//! at the loader boundary. The variants below cover the failures that do reach
//! a caller, chiefly configuration problems and the output write.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: reading inputs, writing the sitemap
//! - **Network Errors**: export API fetch, sitemap upload
//! - **Parse Errors**: JSON inputs, sitemap XML read-back
//! - **Configuration Errors**: invalid base URL, priority or config file
//!
//! ```rust
//! use sitegen_core::Error;
//!
//! let err = Error::Config("priority must be within 0.0..=1.0".to_string());
//! assert_eq!(err.category(), "config");
//! ```

use thiserror::Error;

/// The main error type for sitegen-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    ///
    /// Covers reading input files and writing the sitemap. Only the output
    /// write is treated as fatal by the pipeline.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    ///
    /// Raised by the export client and the uploader. The pipeline converts
    /// export failures into empty record lists.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Parsing operation failed.
    ///
    /// Occurs when an input document is not the expected JSON shape or the
    /// rendered sitemap cannot be read back.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration is invalid or inaccessible.
    ///
    /// ## Common Causes
    ///
    /// - Invalid TOML syntax in the config file
    /// - Priority outside `0.0..=1.0`
    /// - Unknown change frequency
    #[error("Configuration error: {0}")]
    Config(String),

    /// URL is malformed or invalid.
    ///
    /// Used for base URLs that are not absolute `http`/`https` URLs.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error for uncategorized failures.
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

impl Error {
    /// Get the error category as a string identifier.
    ///
    /// Returns one of `"io"`, `"network"`, `"parse"`, `"config"`,
    /// `"invalid_url"`, `"serialization"` or `"other"`.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network(_) => "network",
            Self::Parse(_) => "parse",
            Self::Config(_) => "config",
            Self::InvalidUrl(_) => "invalid_url",
            Self::Serialization(_) => "serialization",
            Self::Other(_) => "other",
        }
    }
}

/// Convenience type alias for Results with our Error type.
pub type Result<T> = std::result::Result<T, Error>;
