//! # Command Error Type
//!
//! Unified error type for CLI commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Nethra Billing                         │
//! │                                                                         │
//! │  nethra items add ...                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, CommandError>                                         │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Validation Error? ── ValidationErrors ─────────────┐            │  │
//! │  │         │             (message shown as-is)         │            │  │
//! │  │         ▼                                           ▼            │  │
//! │  │  Transport Error? ─── ClientError ──► "Failed to add product" ──►│  │
//! │  │         │             (detail logged)                            │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Every failure ends up as exactly one error toast on stderr.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration problems are reported before any command runs and use
//! [`ConfigError`].

use std::process::ExitCode;

use nethra_api::ClientError;
use nethra_core::{CoreError, ValidationErrors};
use thiserror::Error;

/// Result type alias for commands.
pub type CommandResult<T> = Result<T, CommandError>;

// =============================================================================
// Command Error
// =============================================================================

/// What the user sees when a command fails.
///
/// `message` is the toast text. The underlying cause, when there is one,
/// has already been logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CommandError {
    /// Machine-readable category, drives the exit code
    pub code: ErrorCode,

    /// Human-readable message for the toast
    pub message: String,
}

/// Error categories for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Bill, product or line does not exist
    NotFound,

    /// Input rejected before any request was sent
    Validation,

    /// Server answered `success: false`
    Rejected,

    /// Network failure, bad status or unreadable response
    Server,

    /// Could not write a PDF or run the opener / printer
    Local,

    /// Configuration is unusable
    Config,

    /// User declined a confirmation prompt
    Cancelled,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CommandError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        CommandError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::Validation, message)
    }

    pub fn cancelled() -> Self {
        CommandError::new(ErrorCode::Cancelled, "Cancelled")
    }

    /// Converts a client error, substituting `failure` for transport detail.
    ///
    /// ## Message Selection
    /// ```text
    /// ClientError::Validation(errs)  → errs as-is ("Phone is required")
    /// ClientError::BillNotFound(7)   → "Bill not found: 7"
    /// ClientError::Rejected("...")   → failure (server text logged)
    /// anything else                  → failure, detail logged at error!
    /// ```
    pub fn client(err: ClientError, failure: &str) -> Self {
        match err {
            ClientError::Validation(errors) => errors.into(),
            ClientError::BillNotFound(id) => CommandError::not_found("Bill", id),
            ClientError::Rejected(reason) => {
                tracing::error!(reason = %reason, "{}", failure);
                CommandError::new(ErrorCode::Rejected, failure)
            }
            ClientError::Status { status: 404, ref body } => {
                tracing::error!(status = 404, body = %body, "{}", failure);
                CommandError::new(ErrorCode::NotFound, failure)
            }
            ClientError::Io(ref e) => {
                tracing::error!(error = %e, "{}", failure);
                CommandError::new(ErrorCode::Local, failure)
            }
            ClientError::Launch {
                ref command,
                ref reason,
            } => {
                tracing::error!(command = %command, reason = %reason, "{}", failure);
                CommandError::new(ErrorCode::Local, failure)
            }
            other => {
                tracing::error!(error = %other, "{}", failure);
                CommandError::new(ErrorCode::Server, failure)
            }
        }
    }

    /// Process exit status for this failure.
    pub fn exit_status(&self) -> u8 {
        match self.code {
            ErrorCode::Validation | ErrorCode::Config => 2,
            ErrorCode::Cancelled => 130,
            _ => 1,
        }
    }

    #[inline]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }
}

/// Attaches a command's own failure message to a client result.
pub trait OrFailed<T> {
    fn or_failed(self, failure: &str) -> CommandResult<T>;
}

impl<T> OrFailed<T> for Result<T, ClientError> {
    fn or_failed(self, failure: &str) -> CommandResult<T> {
        self.map_err(|e| CommandError::client(e, failure))
    }
}

/// Validation failures keep their aggregated message.
impl From<ValidationErrors> for CommandError {
    fn from(errors: ValidationErrors) -> Self {
        CommandError::validation(errors.to_string())
    }
}

/// Converts draft-editing errors.
impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LineNotFound(id) => CommandError::not_found("Bill line", id),
            CoreError::Validation(e) => CommandError::validation(e.to_string()),
            other => CommandError::validation(other.to_string()),
        }
    }
}

// =============================================================================
// Config Error
// =============================================================================

/// Errors loading or saving `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("No config path available")]
    NoConfigPath,
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::new(ErrorCode::Config, err.to_string())
    }
}
