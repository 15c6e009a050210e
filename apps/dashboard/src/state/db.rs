//! # Snapshot Database State
//!
//! Wraps [`Database`] and exposes typed snapshot save/load for the state
//! objects. Connection pooling is handled by sqlx.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use medidash_db::{Database, DbResult, SnapshotKey};

#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    pub fn inner(&self) -> &Database {
        &self.db
    }

    pub async fn save<T: Serialize>(&self, key: SnapshotKey, value: &T) -> DbResult<()> {
        self.db.snapshots().save(key, value).await?;
        debug!(key = %key, "Snapshot saved");
        Ok(())
    }

    /// Missing or undecodable snapshots come back as `None`.
    pub async fn load<T: DeserializeOwned>(&self, key: SnapshotKey) -> DbResult<Option<T>> {
        self.db.snapshots().load(key).await
    }
}
