/*!
 * Error types for the bookwai application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Errors that can occur while extracting pages from a source document.
///
/// These are fatal: without a page store there is nothing to segment
/// or translate.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The source document does not exist or cannot be read
    #[error("Cannot read source document: {0}")]
    Io(#[from] std::io::Error),

    /// The external extraction tool exited with a failure
    #[error("Extraction tool failed (exit code {code:?}): {stderr}")]
    ToolFailed {
        /// Process exit code, if any
        code: Option<i32>,
        /// Captured stderr output
        stderr: String
    },

    /// The extraction tool produced output that is not valid UTF-8
    #[error("Extraction tool produced invalid UTF-8 output")]
    InvalidOutput,
}

/// Errors that can occur during the translation pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Error from page extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A batch id was requested that has no persisted raw source
    #[error("No raw source artifact for batch {0}")]
    UnknownBatch(u32),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from page extraction
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Error from the translation pipeline
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
