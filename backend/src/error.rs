//! Error types for the smokestats pipeline.
//!
//! - [`FetchError`] - network failures while downloading the dataset
//! - [`CsvError`] - decoding and CSV parsing failures
//! - [`PivotError`] - schema problems detected while pivoting
//! - [`PipelineError`] - top-level orchestration errors
//! - [`ServerError`] - HTTP layer errors
//!
//! Field-level normalization problems (an unparsable value, a missing
//! region label) are not errors: they become missing values in the output.
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use thiserror::Error;

// =============================================================================
// Fetch Errors
// =============================================================================

/// Errors while retrieving the raw CSV over HTTP.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("Request to {0} timed out")]
    Timeout(String),

    /// Transport-level failure (DNS, connection refused, TLS...).
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The server answered with a non-success status.
    #[error("Server returned {status} for {url}")]
    Status { status: u16, url: String },

    /// Local file used in place of the remote dataset could not be read.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

impl FetchError {
    /// Whether a single retry is worth attempting.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout(_) | FetchError::Request(_) => true,
            FetchError::Status { status, .. } => *status >= 500,
            FetchError::IoError(_) => false,
        }
    }
}

// =============================================================================
// CSV Parsing Errors
// =============================================================================

/// Errors during decoding and CSV parsing.
#[derive(Debug, Error)]
pub enum CsvError {
    /// Failed to read file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// Bytes are not valid in the declared encoding.
    #[error("Failed to decode content: {0}")]
    EncodingError(String),

    /// Invalid CSV format.
    #[error("Invalid CSV format at line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Empty input.
    #[error("CSV input is empty")]
    EmptyFile,

    /// No headers found.
    #[error("No headers found in CSV")]
    NoHeaders,
}

// =============================================================================
// Pivot Errors
// =============================================================================

/// Errors while reshaping long rows into the wide table.
#[derive(Debug, Error)]
pub enum PivotError {
    /// The index or column field is not part of the parsed schema.
    #[error("Column '{0}' not found in CSV header")]
    MissingColumn(String),
}

// =============================================================================
// Pipeline Errors (top-level)
// =============================================================================

/// Top-level pipeline errors.
///
/// Any of these aborts the current render; no partial table is produced.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Network error.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// CSV parsing error.
    #[error("CSV error: {0}")]
    Csv(#[from] CsvError),

    /// Pivot error.
    #[error("Pivot error: {0}")]
    Pivot(#[from] PivotError),
}

// =============================================================================
// Server Errors
// =============================================================================

/// HTTP server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Pipeline error.
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Server internal error.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::Pipeline(PipelineError::Fetch(_)) => 502,
            ServerError::Pipeline(_) => 422,
            ServerError::BadRequest(_) => 400,
            ServerError::Internal(_) => 500,
        }
    }
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;

/// Result type for CSV operations.
pub type CsvResult<T> = Result<T, CsvError>;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;
