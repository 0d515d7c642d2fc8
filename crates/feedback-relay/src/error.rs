//! Error types for feedback-relay.
//!
//! This module defines all error types used throughout the feedback-relay
//! crate, providing detailed context for debugging and user-friendly error
//! messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for feedback-relay operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Submission Errors ===
    /// A submission field failed validation. Rejected before any I/O.
    #[error("invalid submission: {field} {message}")]
    Validation {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the validation failure.
        message: String,
    },

    /// The remote sink could not absorb the record.
    ///
    /// This is informational for a single submission: the store converts it
    /// into a local fallback attempt and never propagates it raw.
    #[error("remote sink unavailable: {message}")]
    RemoteUnavailable {
        /// Description of the remote failure.
        message: String,
    },

    /// Both the remote and the local sink failed. The submission is lost.
    #[error("feedback could not be persisted: {message}")]
    PersistenceFailed {
        /// Description of the terminal failure.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    /// Failed to read the service-account credential bundle.
    #[error("failed to read credentials at {path}: {source}")]
    CredentialRead {
        /// Path to the credential file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The service-account credential bundle did not parse.
    #[error("malformed credentials at {path}: {source}")]
    CredentialParse {
        /// Path to the credential file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// CSV serialization/deserialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for feedback-relay operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::RemoteUnavailable {
            message: err.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for Error {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        Self::RemoteUnavailable {
            message: format!("credential signing failed: {err}"),
        }
    }
}

impl Error {
    /// Create a new validation error.
    #[must_use]
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Create a new remote-unavailable error.
    #[must_use]
    pub fn remote_unavailable(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
        }
    }

    /// Create a new persistence-failed error.
    #[must_use]
    pub fn persistence_failed(message: impl Into<String>) -> Self {
        Self::PersistenceFailed {
            message: message.into(),
        }
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Check if this error is a submission validation failure.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Check if this error is the informational remote-unavailable condition.
    #[must_use]
    pub fn is_remote_unavailable(&self) -> bool {
        matches!(self, Self::RemoteUnavailable { .. })
    }

    /// Check if this error means the submission was lost entirely.
    #[must_use]
    pub fn is_persistence_failed(&self) -> bool {
        matches!(self, Self::PersistenceFailed { .. })
    }
}
