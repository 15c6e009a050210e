//! # Validation Module
//!
//! Advisory client-side pre-checks.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (client)                                         │
//! │  ├── Runs before any network call                                      │
//! │  ├── Failure aborts the operation with no state mutation               │
//! │  └── Surfaced to the operator as a toast                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: REST backend (authoritative)                                 │
//! │  ├── Stock ledger, register settlement, account balances               │
//! │  └── May still reject what passed here                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Rejects empty or whitespace-only values.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Minimal shape check for an email address.
///
/// ```rust
/// use medidash_core::validation::validate_email;
///
/// assert!(validate_email("pharmacist@clinic.test").is_ok());
/// assert!(validate_email("pharmacist").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    validate_required("email", email)?;

    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.ends_with('.'),
        None => false,
    };

    if !valid {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }
    Ok(())
}

/// Password confirmation must match exactly.
pub fn validate_password_confirmation(password: &str, confirmation: &str) -> ValidationResult<()> {
    validate_required("password", password)?;
    if password != confirmation {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

pub fn validate_non_negative(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive(field: &str, amount: Money) -> ValidationResult<()> {
    if !amount.is_positive() {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Tax rates are 0% to 100%.
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10_000,
        });
    }
    Ok(())
}

// =============================================================================
// Balance & Stock Guards
// =============================================================================

/// Withdrawal must be positive and not exceed the current balance.
///
/// ## User Workflow
/// ```text
/// Withdraw 250.00 from "Main drawer" (balance 200.00)
///      │
///      ▼
/// validate_withdrawal ── amount > balance ──► InsufficientBalance (no request sent)
/// ```
pub fn validate_withdrawal(amount: Money, current_balance: Money) -> CoreResult<()> {
    validate_positive("withdrawal amount", amount)?;
    if amount > current_balance {
        return Err(CoreError::InsufficientBalance {
            available: current_balance,
            requested: amount,
        });
    }
    Ok(())
}

/// Transfer/adjustment quantity must be positive and not exceed what the
/// batch holds.
pub fn validate_stock_quantity(
    item: &str,
    batch: &str,
    requested: i64,
    available: i64,
) -> CoreResult<()> {
    if requested <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }
    if requested > available {
        return Err(CoreError::InsufficientStock {
            item: item.to_string(),
            batch: batch.to_string(),
            available,
            requested,
        });
    }
    Ok(())
}
