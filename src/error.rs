//! Error types for unAPI operations.
//!
//! This module provides the [`UnapiError`] type for all hard failures of the
//! library and the [`Result`] convenience type. Missing fields and cardinality
//! mismatches are not errors: they are reported through a
//! [`Reporter`](crate::report::Reporter) and surface as `None`.

use thiserror::Error;

/// Error type for all unAPI library operations.
#[derive(Error, Debug)]
pub enum UnapiError {
    /// A date or timestamp matched none of the accepted formats.
    #[error("Cannot parse date '{value}' with format '{format}'")]
    DateParse {
        /// The raw value taken from the record
        value: String,
        /// The last format that was tried
        format: String,
    },

    /// The JSON data does not have the shape of a record.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// JSON decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML decoding or re-encoding failed.
    #[error("XML error: {0}")]
    Xml(String),

    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The server answered with a status other than 200.
    #[error("HTTP request to {url} failed with status {status}")]
    Status {
        /// Requested URL
        url: String,
        /// HTTP status code
        status: u16,
    },

    /// The requested schema is not offered by the endpoint.
    #[error("Schema '{0}' is unsupported")]
    UnsupportedSchema(String),
}

/// Convenience type alias for [`std::result::Result`] with [`UnapiError`].
pub type Result<T> = std::result::Result<T, UnapiError>;
