//! # medidash-db: Local Persistence for the MediDash Dashboard
//!
//! Client stores are written to SQLite as JSON snapshots so they survive a
//! restart. Nothing here understands the stores' contents.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Dashboard command (add_to_cart, select_branch, ...)                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  medidash-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │    │ SnapshotRepository │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │◄───│  (snapshot.rs)     │  │ (embedded) │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file under the platform data dir (medidash.db)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use medidash_db::{Database, DbConfig, SnapshotKey};
//!
//! let db = Database::new(DbConfig::new("medidash.db")).await?;
//! db.snapshots().save(SnapshotKey::Insurance, &claims).await?;
//! let claims: Option<RecordStore<Claim>> = db.snapshots().load(SnapshotKey::Insurance).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::snapshot::{SnapshotKey, SnapshotRepository};
