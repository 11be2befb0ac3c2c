//! Error types for costctl
//!
//! This module defines the error handling strategy for costctl. There are two
//! error types: `CostctlError` (main error enum) and `ConfigError` (configuration-specific).
//!
//! ## Error Handling Philosophy
//!
//! Library code uses `crate::error::Result<T>` which returns `CostctlError`.
//! CLI code uses `anyhow::Result<T>` for top-level error handling. The conversion
//! happens at the CLI boundary, and `exit_codes` downcasts back to `CostctlError`
//! to choose the process exit code.
//!
//! ## No Retries
//!
//! Every error is terminal for the submission that produced it. A failed
//! optimization call is reported once and the user resubmits explicitly.
//!
//! ## When to Use Which Error
//!
//! - `Validation`: incomplete workload or sizing input, detected before any
//!   remote call. The `reason` is the single user-facing message.
//!
//! - `Transport`: the optimization service could not be reached, answered
//!   with a non-2xx status, or returned a body that does not decode. The
//!   `message` is the server-provided one when present, otherwise
//!   [`FALLBACK_TRANSPORT_MESSAGE`].
//!
//! - `SubmissionInProgress`: a second submission was attempted while one is
//!   still in flight on the same submitter.
//!
//! - An empty result list is NOT an error; see `interpret::ResultSet`.

use thiserror::Error;

/// Shown when a failed response carries no `message` of its own.
pub const FALLBACK_TRANSPORT_MESSAGE: &str = "An error occurred. Please try again.";

/// Main error type for costctl
#[derive(Error, Debug)]
pub enum CostctlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Validation error: {field} - {reason}")]
    Validation { field: String, reason: String },

    #[error("Optimization service error at {endpoint}: {message}")]
    Transport {
        endpoint: String,
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("A submission is already in flight; wait for it to finish")]
    SubmissionInProgress,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CostctlError {
    /// The message a user should see, without the variant prefix.
    pub fn user_message(&self) -> String {
        match self {
            CostctlError::Validation { reason, .. } => reason.clone(),
            CostctlError::Transport { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Failed to parse config: {0}")]
    ParseError(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CostctlError>;
