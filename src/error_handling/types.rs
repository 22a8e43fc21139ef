//! Error type definitions.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Errors produced while preparing or performing a step's request.
///
/// All variants are fatal to the invocation that raised them and are
/// converted to a FAILURE outcome locally.
#[derive(Error, Debug)]
pub enum StepError {
    /// A dynamic request field referenced a property the store does not hold.
    ///
    /// Raised during rendering, before any network I/O is attempted.
    #[error("property '{0}' is not defined")]
    MissingProperty(String),

    /// A network, connection, or timeout failure. No response was produced.
    #[error("{0}")]
    Transport(String),

    /// The request declaration is invalid: unsupported method, more than one
    /// body-encoding field populated, or an unparseable URL or field value.
    #[error("{0}")]
    Configuration(String),
}

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}
