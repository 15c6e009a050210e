//! # Commands Module
//!
//! Everything the UI can ask the dashboard to do.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs         ◄─── You are here (exports, failure reporting)
//! ├── auth.rs        ◄─── login, logout, setup flag
//! ├── branch.rs      ◄─── branch list and selection
//! ├── cart.rs        ◄─── cart manipulation
//! ├── checkout.rs    ◄─── interaction check, sale, server submission
//! ├── register.rs    ◄─── open/close register, expenses, refresh
//! ├── accounts.rs    ◄─── cash accounts, withdrawals
//! ├── users.rs       ◄─── users, roles
//! ├── records.rs     ◄─── claims, inventory, prescriptions, reminders, patients
//! └── navigation.rs  ◄─── route guard, locale
//! ```
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  UI action                                                              │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  command(&Dashboard, input)                                             │
//! │     ├─ validate locally ───────────── fail: CommandError, no request    │
//! │     ├─ lock state, read, unlock                                         │
//! │     ├─ await server (if server-backed) ─ fail: toast + CommandError     │
//! │     ├─ lock state, apply result, unlock                                 │
//! │     └─ persist snapshot                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Failed server calls are never retried.

pub mod accounts;
pub mod auth;
pub mod branch;
pub mod cart;
pub mod checkout;
pub mod navigation;
pub mod records;
pub mod register;
pub mod users;

use medidash_api::{ClientError, Notifier};
use tracing::warn;

use crate::error::CommandError;

/// Turns a failed server call into a command error, showing a toast with
/// `context` unless the gateway already handled it (401 is silent, 403 has
/// its own toast).
pub(crate) fn report_failure(notifier: &Notifier, context: &str, err: ClientError) -> CommandError {
    warn!(context, error = %err, "Server call failed");
    let already_handled = matches!(err, ClientError::Unauthorized | ClientError::Forbidden { .. });
    let err = CommandError::from(err);
    if !already_handled {
        notifier.error(format!("{context}: {}", err.message));
    }
    err
}
