//! Shared error types for the services crate.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors emitted by card sources.
///
/// The card server collapses connectivity failures, validation failures, and
/// server-side faults into one shape: a non-success status with an optional
/// `error` string in the body. This type mirrors that: every failure carries
/// a single user-facing message and nothing is ever retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Non-success HTTP status; `message` comes from the body's `error`
    /// field when present, otherwise it is derived from the status.
    #[error("{message}")]
    Server { status: StatusCode, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl ApiError {
    /// Build the error for a non-success response.
    #[must_use]
    pub fn from_status(status: StatusCode, body_error: Option<String>) -> Self {
        let message = body_error
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("request failed: {status}"));
        Self::Server { status, message }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
