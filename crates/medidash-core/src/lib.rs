//! # medidash-core: Pure Client Logic for the MediDash Dashboard
//!
//! Everything the dashboard decides locally lives here as plain functions
//! over plain data. No I/O happens in this crate.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        MediDash Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser frontend                             │   │
//! │  │    POS page ──► Register dialog ──► Records pages ──► Guard    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/dashboard commands                      │   │
//! │  │    add_to_cart, checkout, open_register, withdraw, ...         │   │
//! │  └───────────────┬─────────────────────────────┬───────────────────┘   │
//! │                  │                             │                        │
//! │  ┌───────────────▼─────────────────┐  ┌────────▼───────────────────┐   │
//! │  │  ★ medidash-core (THIS CRATE) ★ │  │ medidash-api (REST client) │   │
//! │  │                                 │  │ medidash-db  (snapshots)   │   │
//! │  │  cart   register   history      │  └────────────────────────────┘   │
//! │  │  interactions   records         │                                   │
//! │  │  navigation   validation        │                                   │
//! │  │                                 │                                   │
//! │  │  NO I/O • NO DATABASE • NO NET  │                                   │
//! │  └─────────────────────────────────┘                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`cart`] - POS cart keyed by (item id, batch number)
//! - [`history`] - Completed transactions and refunds
//! - [`register`] - Cash register session state machine
//! - [`interactions`] - Drug-drug interaction checker
//! - [`records`] - Claims, inventory, prescriptions, reminders
//! - [`navigation`] - Route guard decisions
//! - [`money`] - Integer-cent money type
//! - [`validation`] - Pre-checks run before any network call
//!
//! ## Example Usage
//!
//! ```rust
//! use medidash_core::cart::{Cart, CartItemInput};
//! use medidash_core::{Money, TaxRate};
//!
//! let mut cart = Cart::new();
//! let aspirin = CartItemInput::new("drug-1", "Aspirin", Money::from_cents(550));
//! cart.add_to_cart(aspirin.clone());
//! cart.add_to_cart(aspirin);
//!
//! let totals = cart.totals(TaxRate::zero(), Money::zero());
//! assert_eq!(totals.line_count, 1);
//! assert_eq!(totals.total.cents(), 1100);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod history;
pub mod interactions;
pub mod money;
pub mod navigation;
pub mod records;
pub mod register;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Days ahead the inventory page looks for expiring batches.
pub const EXPIRY_WARNING_DAYS: i64 = 90;

/// Transactions shown in the POS "recent sales" panel.
pub const RECENT_SALES_LIMIT: usize = 10;
