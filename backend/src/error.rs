//! Error types for the lottosheet pipeline.
//!
//! - [`GridError`] - Failures while opening or reading a grid source
//! - [`ConfigError`] - Invalid runtime settings
//! - [`ClientError`] - Failures talking to a remote draw endpoint
//! - [`ServerError`] - HTTP server startup errors
//!
//! Cell-level problems (blank, non-numeric, out-of-range values) are not
//! errors at all: the extractor discards those cells.

use thiserror::Error;

// =============================================================================
// Grid Source Errors
// =============================================================================

/// Errors while reading cells from a grid source.
///
/// A missing sheet is *not* one of these: sources report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum GridError {
    /// Failed to read the backing file.
    #[error("Failed to read workbook: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV sheet.
    #[error("Invalid CSV sheet: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed JSON workbook.
    #[error("Invalid JSON workbook: {0}")]
    Json(#[from] serde_json::Error),

    /// Bytes could not be decoded to text.
    #[error("Failed to decode sheet: {0}")]
    Encoding(String),

    /// A1 range could not be parsed.
    #[error("Invalid cell range '{0}'")]
    InvalidRange(String),

    /// A1 range covers more cells than one read may allocate.
    #[error("Cell range '{range}' spans {cells} cells, the limit is {limit}")]
    RangeTooLarge { range: String, cells: usize, limit: usize },

    /// Workbook layout is not what the backend expects.
    #[error("Invalid workbook: {0}")]
    InvalidWorkbook(String),
}

// =============================================================================
// Configuration Errors
// =============================================================================

/// Errors while loading settings from the environment or CLI.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A variable holds an unusable value.
    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },

    /// A setting is required for this command but absent.
    #[error("Missing setting: {0}")]
    Missing(String),

    /// Range setting failed to parse.
    #[error(transparent)]
    Range(#[from] GridError),
}

// =============================================================================
// Client Errors
// =============================================================================

/// Errors from [`crate::client::SheetApiClient`].
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport or HTTP status failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Body is not a draw envelope, or holds malformed games.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Remote endpoint answered with a failure envelope.
    #[error("Remote error: {0}")]
    Remote(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Http(e.to_string())
    }
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind or serve.
    #[error("Server IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad startup configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for grid source operations.
pub type GridResult<T> = Result<T, GridError>;

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
