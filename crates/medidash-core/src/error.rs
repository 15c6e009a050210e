//! # Error Types
//!
//! Domain-specific error types for medidash-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  medidash-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input pre-checks (before any network call)     │
//! │                                                                         │
//! │  medidash-db errors (separate crate)                                   │
//! │  └── DbError          - Snapshot persistence failures                  │
//! │                                                                         │
//! │  medidash-api errors (separate crate)                                  │
//! │  └── ClientError      - HTTP gateway failures (401, 403, ...)          │
//! │                                                                         │
//! │  Dashboard command errors (in app)                                     │
//! │  └── CommandError     - What the frontend sees (serialized)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, amounts, quantities)
//! 3. Every client-side pre-check aborts BEFORE state is mutated

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// All of these are advisory: the server remains the source of truth for
/// financial and inventory invariants.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The register session was closed and accepts no further mutation.
    ///
    /// ## User Workflow
    /// ```text
    /// close_register(actual: 140.00)
    ///      │
    ///      ▼
    /// status = Closed ──► record_sale(...) ──► RegisterClosed
    /// ```
    #[error("Register session {session_id} is closed")]
    RegisterClosed { session_id: String },

    /// A close for this session was sent to the server and has not been
    /// answered yet. Sales and expenses wait until it settles.
    #[error("Register session {session_id} is being closed")]
    RegisterClosing { session_id: String },

    /// An operation needed an open register session and none exists.
    #[error("No open register session")]
    NoOpenRegister,

    /// A register session is already open for the branch.
    #[error("A register session is already open for branch {store_id}")]
    RegisterAlreadyOpen { store_id: String },

    /// Not enough stock on a batch for a transfer or negative adjustment.
    #[error("Insufficient stock for {item} (batch {batch}): available {available}, requested {requested}")]
    InsufficientStock {
        item: String,
        batch: String,
        available: i64,
        requested: i64,
    },

    /// Withdrawal exceeds the account's current balance.
    #[error("Insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance { available: Money, requested: Money },

    /// A record in one of the domain stores was not found.
    #[error("{entity} not found: {id}")]
    RecordNotFound { entity: String, id: String },

    /// The cart has no lines to check out.
    #[error("Cart is empty")]
    EmptyCart,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates a RecordNotFound error.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        CoreError::RecordNotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the advisory pre-checks that run before any network call.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid email, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Password and its confirmation differ.
    #[error("Passwords do not match")]
    PasswordMismatch,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InsufficientStock {
            item: "Amoxicillin 500mg".to_string(),
            batch: "AMX-2401".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Amoxicillin 500mg (batch AMX-2401): available 3, requested 5"
        );

        let err = CoreError::InsufficientBalance {
            available: Money::from_cents(10_000),
            requested: Money::from_cents(12_550),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient balance: available 100.00, requested 125.50"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::PasswordMismatch.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert_eq!(
            core_err.to_string(),
            "Validation error: Passwords do not match"
        );
    }
}
