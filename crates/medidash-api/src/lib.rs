//! # MediDash API
//!
//! REST gateway client for the hospital/pharmacy dashboard.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          medidash-api                                   │
//! │                                                                         │
//! │   DashboardConfig ──► ApiClient ◄── CredentialStore (cookie jar)        │
//! │                          │                                              │
//! │                          ├──► Notifier (403 toasts)                     │
//! │                          ├──► endpoints::* (typed routes + DTOs)        │
//! │                          └──► poller (active register session)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use medidash_api::{ApiClient, CredentialStore, DashboardConfig, Notifier};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DashboardConfig::load(None)?;
//! let client = ApiClient::new(&config.api, CredentialStore::new(), Notifier::new())?;
//! let branches = client.list_branches().await?;
//! # let _ = branches;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod credentials;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod notify;
pub mod poller;

pub use client::ApiClient;
pub use config::DashboardConfig;
pub use credentials::{CredentialSnapshot, CredentialStore};
pub use envelope::{ApiEnvelope, PageMeta, PageQuery, Paginated};
pub use error::{ApiResult, ClientError, ConfigError, ConfigResult};
pub use notify::{Notification, NotificationLevel, Notifier};
pub use poller::{spawn_poller, spawn_session_poller, PollerHandle};
