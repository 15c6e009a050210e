//! # MediDash Dashboard
//!
//! Orchestration layer of the hospital/pharmacy dashboard: state objects,
//! commands and startup.
//!
//! ## Module Organization
//! ```text
//! medidash_dashboard/
//! ├── lib.rs          ◄─── You are here (Dashboard context, startup)
//! ├── state/
//! │   ├── session.rs  ◄─── Signed-in user, setup flag
//! │   ├── branch.rs   ◄─── Branch list and active branch
//! │   ├── pos.rs      ◄─── Cart, history, register session
//! │   ├── records.rs  ◄─── Claims, inventory, prescriptions, reminders
//! │   └── db.rs       ◄─── Snapshot persistence
//! ├── commands/
//! │   ├── auth.rs, branch.rs, cart.rs, checkout.rs, register.rs,
//! │   └── accounts.rs, users.rs, records.rs, navigation.rs
//! └── error.rs        ◄─── CommandError for every command
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. init_tracing()            RUST_LOG or info,medidash=debug,sqlx=warn │
//! │  2. DashboardConfig::load()   defaults ► dashboard.toml ► MEDIDASH_*    │
//! │  3. Database::new()           SQLite, WAL, migrations                   │
//! │  4. restore snapshots         auth, store-context, pos                  │
//! │     seed record stores        insurance, inventory, prescriptions,      │
//! │                               reminders (first run only)                │
//! │  5. ApiClient::new()          base URL, timeout, restored cookies       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod commands;
pub mod error;
pub mod state;

use tracing::info;
use tracing_subscriber::EnvFilter;

use medidash_api::{ApiClient, CredentialStore, DashboardConfig, Notifier};
use medidash_core::records::{claims, inventory, prescriptions, reminders, RecordStore};
use medidash_core::TaxRate;
use medidash_db::{Database, DbConfig, SnapshotKey};

use error::{CommandError, CommandResult, ErrorCode};
use state::{
    AuthSnapshot, BranchContext, BranchState, DbState, PosState, PosStore, RecordsState,
    SessionState, StoredRecord,
};

/// Everything a command may need, cheap to clone.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub config: DashboardConfig,
    pub api: ApiClient,
    pub db: DbState,
    pub session: SessionState,
    pub branch: BranchState,
    pub pos: PosState,
    pub records: RecordsState,
}

impl Dashboard {
    /// Opens the database at the configured path and restores state.
    pub async fn open(config: DashboardConfig) -> CommandResult<Self> {
        let path = config.database_path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                CommandError::new(
                    ErrorCode::DatabaseError,
                    format!("Cannot create data directory {}: {e}", parent.display()),
                )
            })?;
        }
        info!(?path, "Database path determined");

        let db = Database::new(DbConfig::new(path)).await?;
        Self::with_database(config, db).await
    }

    /// Restores state from an already opened database.
    pub async fn with_database(config: DashboardConfig, db: Database) -> CommandResult<Self> {
        let db = DbState::new(db);

        let auth: AuthSnapshot = db.load(SnapshotKey::Auth).await?.unwrap_or_default();
        let credentials = CredentialStore::from_snapshot(auth.cookies);
        let api = ApiClient::new(&config.api, credentials, Notifier::new())?;

        let branch: BranchContext = db.load(SnapshotKey::StoreContext).await?.unwrap_or_default();
        let pos: PosStore = db.load(SnapshotKey::Pos).await?.unwrap_or_default();

        let records = RecordsState::new(
            load_or_seed(&db, claims::seed).await?,
            load_or_seed(&db, inventory::seed).await?,
            load_or_seed(&db, prescriptions::seed).await?,
            load_or_seed(&db, reminders::seed).await?,
        );

        info!(
            signed_in = auth.session.user.is_some(),
            branch = ?branch.active_branch_id,
            cart_lines = pos.cart.line_count(),
            "Dashboard state restored"
        );

        Ok(Dashboard {
            config,
            api,
            db,
            session: SessionState::from_session(auth.session),
            branch: BranchState::from_context(branch),
            pos: PosState::from_store(pos),
            records,
        })
    }

    pub fn notifier(&self) -> &Notifier {
        self.api.notifier()
    }

    pub fn credentials(&self) -> &CredentialStore {
        self.api.credentials()
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.config.tax_rate()
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    pub async fn persist_auth(&self) -> CommandResult<()> {
        let snapshot = AuthSnapshot {
            session: self.session.get(),
            cookies: self.credentials().snapshot(),
        };
        Ok(self.db.save(SnapshotKey::Auth, &snapshot).await?)
    }

    pub async fn persist_branch(&self) -> CommandResult<()> {
        Ok(self
            .db
            .save(SnapshotKey::StoreContext, &self.branch.snapshot())
            .await?)
    }

    pub async fn persist_pos(&self) -> CommandResult<()> {
        Ok(self.db.save(SnapshotKey::Pos, &self.pos.snapshot()).await?)
    }

    /// Saves the record store `T` lives in.
    pub async fn persist_store<T: StoredRecord>(&self) -> CommandResult<()> {
        let snapshot = T::store(&self.records).snapshot();
        Ok(self.db.save(T::KEY, &snapshot).await?)
    }
}

async fn load_or_seed<T: StoredRecord>(
    db: &DbState,
    seed: fn() -> Vec<T>,
) -> CommandResult<RecordStore<T>> {
    let key = T::KEY;
    if let Some(store) = db.load(key).await? {
        return Ok(store);
    }
    let store = RecordStore::with_records(seed());
    db.save(key, &store).await?;
    info!(key = %key, records = store.len(), "Seeded record store");
    Ok(store)
}

/// Initializes the tracing subscriber.
///
/// `RUST_LOG` wins when set. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,medidash=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
