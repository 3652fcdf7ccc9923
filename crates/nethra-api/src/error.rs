//! # Client Error Types
//!
//! Error types for backend calls and PDF file handling.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Client Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Transport     │  │    Protocol     │  │     Local               │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Http           │  │  Status         │  │  Io                     │ │
//! │  │  InvalidUrl     │  │  Rejected       │  │  Launch                 │ │
//! │  │                 │  │  Malformed      │  │  Validation             │ │
//! │  │                 │  │  BillNotFound   │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant ends up as one "Failed to ..." toast in the CLI; the detail
//! here is for the logs.

use nethra_core::{BillId, ValidationErrors};
use thiserror::Error;

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Everything that can go wrong talking to the billing backend.
#[derive(Debug, Error)]
pub enum ClientError {
    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Connection refused, timeout, TLS failure, body read failure.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// Non-2xx HTTP status.
    #[error("Server returned {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx response carrying `"success": false`.
    #[error("Server rejected the request: {0}")]
    Rejected(String),

    /// Body was not the JSON shape expected.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// No bill with this id exists.
    #[error("Bill not found: {0}")]
    BillNotFound(BillId),

    // =========================================================================
    // Local Errors
    // =========================================================================
    /// Writing or removing a PDF file failed.
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    /// The opener / printer / share command could not be run or failed.
    #[error("Failed to run `{command}`: {reason}")]
    Launch { command: String, reason: String },

    /// Input failed validation before any request was sent.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
}

impl ClientError {
    /// True for a 404 from the server.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Status { status: 404, .. })
            || matches!(self, ClientError::BillNotFound(_))
    }

    /// True when the request never left the machine because input was invalid.
    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

impl From<url::ParseError> for ClientError {
    fn from(e: url::ParseError) -> Self {
        ClientError::InvalidUrl(e.to_string())
    }
}
