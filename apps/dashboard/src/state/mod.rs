//! # State Module
//!
//! One state type per concern, each cheap to clone and shared between
//! commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐ ┌──────────────┐ ┌──────────────┐ ┌───────────────┐  │
//! │  │ SessionState │ │ BranchState  │ │  PosState    │ │ RecordsState  │  │
//! │  │ user, setup  │ │ branches,    │ │ cart, tx     │ │ claims, stock │  │
//! │  │ flag         │ │ active one   │ │ history,     │ │ prescriptions │  │
//! │  │              │ │              │ │ register     │ │ reminders     │  │
//! │  └──────┬───────┘ └──────┬───────┘ └──────┬───────┘ └───────┬───────┘  │
//! │         └────────────────┴────────┬───────┴─────────────────┘          │
//! │                                   ▼                                     │
//! │                        DbState (snapshots table)                        │
//! │   auth · store-context · pos · insurance · inventory · prescriptions ·  │
//! │   reminders                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation is a short synchronous critical section.

mod branch;
mod db;
mod pos;
mod records;
mod session;

pub use branch::{BranchContext, BranchState};
pub use db::DbState;
pub use pos::{PosState, PosStore};
pub use records::{RecordsState, SharedStore, StoredRecord};
pub use session::{AuthSnapshot, Session, SessionState};
