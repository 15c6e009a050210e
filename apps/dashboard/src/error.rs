//! # Command Error Type
//!
//! Unified error type for dashboard commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in MediDash                               │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<T, CommandError>                                                │
//! │         │                                                               │
//! │         ├─ ValidationError ─── before any network call ──┐              │
//! │         ├─ CoreError ───────── local state rules ────────┤              │
//! │         ├─ DbError ─────────── snapshot persistence ─────┼─► CommandError│
//! │         └─ ClientError ─────── REST backend ─────────────┘              │
//! │                                                                         │
//! │  { "code": "INSUFFICIENT_BALANCE",                                      │
//! │    "message": "Insufficient balance: available 80.00, requested 120.00" }│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use medidash_api::{ClientError, ConfigError};
use medidash_core::{CoreError, ValidationError};
use medidash_db::DbError;

pub type CommandResult<T> = Result<T, CommandError>;

/// What the UI receives when a command fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    DatabaseError,
    ConfigError,
    /// A local rule was broken (closed register, empty cart, ...).
    BusinessLogic,
    InsufficientStock,
    InsufficientBalance,
    NoActiveBranch,
    Unauthorized,
    Forbidden,
    /// The server answered with a non-2xx status or `success: false`.
    ServerError,
    /// The server could not be reached.
    NetworkError,
    Internal,
}

impl CommandError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CommandError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        CommandError::new(ErrorCode::NotFound, format!("{resource} not found: {id}"))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CommandError::new(ErrorCode::ValidationError, message)
    }

    pub fn no_active_branch() -> Self {
        CommandError::new(ErrorCode::NoActiveBranch, "Select a branch first")
    }
}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        CommandError::validation(err.to_string())
    }
}

impl From<CoreError> for CommandError {
    fn from(err: CoreError) -> Self {
        let code = match &err {
            CoreError::RecordNotFound { .. } => ErrorCode::NotFound,
            CoreError::InsufficientStock { .. } => ErrorCode::InsufficientStock,
            CoreError::InsufficientBalance { .. } => ErrorCode::InsufficientBalance,
            CoreError::Validation(_) => ErrorCode::ValidationError,
            CoreError::RegisterClosed { .. }
            | CoreError::RegisterClosing { .. }
            | CoreError::NoOpenRegister
            | CoreError::RegisterAlreadyOpen { .. }
            | CoreError::EmptyCart => ErrorCode::BusinessLogic,
        };
        let message = match err {
            CoreError::Validation(e) => e.to_string(),
            other => other.to_string(),
        };
        CommandError::new(code, message)
    }
}

impl From<DbError> for CommandError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CommandError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => CommandError::new(
                ErrorCode::ValidationError,
                format!("{field} '{value}' already exists"),
            ),
            DbError::ConnectionFailed(_) => {
                CommandError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                CommandError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::PoolExhausted => {
                CommandError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            other => {
                tracing::error!(error = %other, "Snapshot persistence failed");
                CommandError::new(ErrorCode::DatabaseError, "Saving local data failed")
            }
        }
    }
}

impl From<ClientError> for CommandError {
    fn from(err: ClientError) -> Self {
        let code = match &err {
            ClientError::Unauthorized => ErrorCode::Unauthorized,
            ClientError::Forbidden { .. } => ErrorCode::Forbidden,
            ClientError::Network(_) | ClientError::Timeout => ErrorCode::NetworkError,
            ClientError::Http { .. } | ClientError::Rejected { .. } | ClientError::Decode(_) => {
                ErrorCode::ServerError
            }
            ClientError::InvalidUrl(_) => ErrorCode::ConfigError,
        };
        let message = match err {
            ClientError::Forbidden { message }
            | ClientError::Http { message, .. }
            | ClientError::Rejected { message } => message,
            other => other.to_string(),
        };
        CommandError::new(code, message)
    }
}

impl From<ConfigError> for CommandError {
    fn from(err: ConfigError) -> Self {
        CommandError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for CommandError {}
