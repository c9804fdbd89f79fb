// SPDX-FileCopyrightText: 2026 Schediora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Schediora client.

use std::time::Duration;

use thiserror::Error;

/// The primary error type used across the Schediora crates.
///
/// Variants whose `Display` output is shown to the user verbatim (API errors,
/// validation and AI flow failures) carry plain sentences rather than a
/// category prefix.
#[derive(Debug, Error)]
pub enum SchedioraError {
    /// Configuration errors (invalid TOML, bad base URL, out-of-range intervals).
    #[error("configuration error: {0}")]
    Config(String),

    /// Local storage errors (database open, query failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The request never produced an HTTP response (DNS, connect, TLS, reset).
    #[error("network error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request did not complete within the configured timeout.
    #[error("request timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// A success response body could not be decoded into the expected type.
    #[error("failed to decode response: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Local input validation failed before any network call.
    #[error("{0}")]
    Validation(String),

    /// An operation that needs an access token was invoked without one.
    #[error("Session is invalid. Please sign in again.")]
    NotAuthenticated,

    /// AI generation refused because a weekly plan already exists.
    #[error("Weekly planner already set. You can generate a new AI plan next week.")]
    PlanAlreadyExists,

    /// The backend reported the AI job as failed.
    #[error("AI generation failed. Check worker/backend logs.")]
    JobFailed { job_id: String },

    /// The AI job did not reach a terminal status within the attempt budget.
    #[error("AI job timeout. Please retry and verify worker/Ollama are running.")]
    JobTimeout { job_id: String, attempts: u32 },

    /// The operation was cancelled through its cancellation token.
    #[error("operation cancelled")]
    Cancelled,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl SchedioraError {
    /// HTTP status code for backend errors, `None` for everything else.
    pub fn status(&self) -> Option<u16> {
        match self {
            SchedioraError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Wraps any storage-layer error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        SchedioraError::Storage {
            source: Box::new(err),
        }
    }
}
