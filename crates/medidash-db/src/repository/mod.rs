//! # Repository Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Dashboard state object                                                 │
//! │       │                                                                 │
//! │       │  db.snapshots().save(SnapshotKey::Pos, &snapshot)               │
//! │       ▼                                                                 │
//! │  SnapshotRepository                                                     │
//! │  ├── save / save_raw                                                    │
//! │  ├── load / load_raw / load_or_default                                  │
//! │  ├── delete                                                             │
//! │  └── keys / updated_at                                                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite `snapshots` table                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod snapshot;
