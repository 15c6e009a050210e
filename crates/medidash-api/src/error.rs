//! # Gateway Error Types
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Gateway Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────┐  ┌─────────────────┐ │
//! │  │  HTTP status        │  │  Transport          │  │  Configuration  │ │
//! │  │                     │  │                     │  │  (ConfigError)  │ │
//! │  │  Unauthorized (401) │  │  Network            │  │                 │ │
//! │  │  Forbidden (403)    │  │  Timeout            │  │  InvalidConfig  │ │
//! │  │  Http {status, msg} │  │  Decode             │  │  InvalidUrl     │ │
//! │  │  Rejected (2xx but  │  │  InvalidUrl         │  │  LoadFailed     │ │
//! │  │   success = false)  │  │                     │  │  SaveFailed     │ │
//! │  └─────────────────────┘  └─────────────────────┘  └─────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is retried. Interpreting a failure is the call site's job.

use thiserror::Error;

pub type ApiResult<T> = Result<T, ClientError>;

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Client Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ClientError {
    /// 401. Stored credentials have already been cleared.
    #[error("Session expired, please sign in again")]
    Unauthorized,

    /// 403. A notification has already been emitted.
    #[error("Permission denied: {message}")]
    Forbidden { message: String },

    /// Any other non-2xx status.
    #[error("Request failed with status {status}: {message}")]
    Http { status: u16, message: String },

    /// 2xx response whose envelope reported `success: false`.
    #[error("Request rejected: {message}")]
    Rejected { message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    /// Response body did not match the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ClientError {
    /// HTTP status behind this error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized => Some(401),
            ClientError::Forbidden { .. } => Some(403),
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the request never got an HTTP answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Network(_) | ClientError::Timeout)
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<url::ParseError> for ClientError {
    fn from(err: url::ParseError) -> Self {
        ClientError::InvalidUrl(err.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to load config: {0}")]
    LoadFailed(String),

    #[error("Failed to save config: {0}")]
    SaveFailed(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::LoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::SaveFailed(err.to_string())
    }
}

impl From<url::ParseError> for ConfigError {
    fn from(err: url::ParseError) -> Self {
        ConfigError::InvalidUrl(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ClientError::Unauthorized.status(), Some(401));
        assert_eq!(
            ClientError::Forbidden {
                message: "no".into()
            }
            .status(),
            Some(403)
        );
        assert_eq!(
            ClientError::Http {
                status: 422,
                message: "bad".into()
            }
            .status(),
            Some(422)
        );
        assert_eq!(ClientError::Timeout.status(), None);
        assert!(ClientError::Network("refused".into()).is_transport());
    }

    #[test]
    fn test_error_display() {
        let err = ClientError::Http {
            status: 409,
            message: "Register already open".into(),
        };
        assert!(err.to_string().contains("409"));
        assert!(err.to_string().contains("Register already open"));
    }
}
