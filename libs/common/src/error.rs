//! Custom error types for the common library
//!
//! This module defines error types shared by the scanner service: coordinate
//! validation and the remote document store.

use thiserror::Error;

/// Error returned when a coordinate pair cannot describe a point on Earth
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinateError {
    /// Latitude is NaN, infinite or outside [-90, 90]
    #[error("Invalid latitude: {0}")]
    Latitude(f64),

    /// Longitude is NaN, infinite or outside [-180, 180]
    #[error("Invalid longitude: {0}")]
    Longitude(f64),
}

/// Type alias for Result with CoordinateError
pub type CoordinateResult<T> = Result<T, CoordinateError>;

/// Custom error type for document store operations
#[derive(Error, Debug)]
pub enum DocumentStoreError {
    /// The request never produced a response (network, TLS, timeout)
    #[error("Document store request error: {0}")]
    Request(#[source] reqwest::Error),

    /// The store answered with a non-success status
    #[error("Document store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The record could not be encoded as a document body
    #[error("Document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Configuration error
    #[error("Document store configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with DocumentStoreError
pub type DocumentStoreResult<T> = Result<T, DocumentStoreError>;
