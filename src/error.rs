//! Error types for drive-dl
//!
//! This module provides error handling for the library, including:
//! - Domain-specific error types (Auth, Download, Extraction)
//! - Contextual information (file paths, HTTP status, queries)
//!
//! Errors are propagated to the caller typed but unhandled; the library
//! performs no retry or recovery of its own.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for drive-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for drive-dl
///
/// This is the primary error type used throughout the library. Each variant includes
/// contextual information to help diagnose issues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "chunk_size")
        key: Option<String>,
    },

    /// Authentication error (key file, assertion signing, token exchange)
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Remote API returned a non-success status
    #[error("API error: HTTP {status}: {message}")]
    Api {
        /// HTTP status code returned by the remote API
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// No remote file matched the search query
    #[error("no file matching query: {query}")]
    NotFound {
        /// The name query that produced no results
        query: String,
    },

    /// Media download error
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Archive extraction error
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Authentication-related errors
#[derive(Debug, Error)]
pub enum AuthError {
    /// Service-account key file could not be read
    #[error("failed to read key file {path}: {source}")]
    KeyFileRead {
        /// Path to the key file that could not be read
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Service-account key file is not valid key JSON
    #[error("malformed key file {path}: {reason}")]
    MalformedKey {
        /// Path to the key file that failed to parse
        path: PathBuf,
        /// The reason parsing failed
        reason: String,
    },

    /// Assertion could not be built or signed with the key's private key
    #[error("failed to sign assertion: {0}")]
    Assertion(String),

    /// Token endpoint rejected the assertion
    #[error("token exchange failed with HTTP {status}: {body}")]
    TokenExchange {
        /// HTTP status code returned by the token endpoint
        status: u16,
        /// Response body returned by the token endpoint
        body: String,
    },
}

/// Media download errors
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Ranged response carried no usable Content-Range header
    #[error("HTTP {status} response missing a parsable Content-Range header")]
    MissingContentRange {
        /// HTTP status code of the offending response
        status: u16,
    },

    /// Downloaded byte count does not match the size the server reported
    #[error("size mismatch: server reported {expected} bytes, received {actual}")]
    SizeMismatch {
        /// Total size reported by the server
        expected: u64,
        /// Number of bytes actually received
        actual: u64,
    },
}

/// Archive extraction errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Input is not a well-formed zip archive
    #[error("invalid archive {archive}: {reason}")]
    InvalidArchive {
        /// The file that failed to parse as a zip archive
        archive: PathBuf,
        /// The reason parsing failed
        reason: String,
    },

    /// An archive entry could not be read
    #[error("failed to read entry in {archive}: {reason}")]
    EntryRead {
        /// The archive containing the unreadable entry
        archive: PathBuf,
        /// The reason the entry could not be read
        reason: String,
    },
}
