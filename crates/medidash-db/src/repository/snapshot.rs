//! # Snapshot Repository
//!
//! Key/value persistence for client stores.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  snapshots                                                              │
//! │  ┌────────────────┬──────────────────────────────┬─────────────────┐   │
//! │  │ key            │ payload (JSON)               │ updated_at      │   │
//! │  ├────────────────┼──────────────────────────────┼─────────────────┤   │
//! │  │ auth           │ {"user":{...},"setup...}     │ 2024-03-05T...  │   │
//! │  │ pos            │ {"cart":{...},"session":...} │ 2024-03-05T...  │   │
//! │  │ store-context  │ {"activeBranchId":"..."}     │ ...             │   │
//! │  │ insurance      │ [{"id":"CLM-1001",...}]      │ ...             │   │
//! │  └────────────────┴──────────────────────────────┴─────────────────┘   │
//! │                                                                         │
//! │  save  ──► upsert, last write wins                                     │
//! │  load  ──► None if missing; None + warning if it no longer decodes     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;

/// Names of the persisted stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SnapshotKey {
    Auth,
    Pos,
    StoreContext,
    Insurance,
    Inventory,
    Prescriptions,
    Reminders,
}

impl SnapshotKey {
    pub const ALL: [SnapshotKey; 7] = [
        SnapshotKey::Auth,
        SnapshotKey::Pos,
        SnapshotKey::StoreContext,
        SnapshotKey::Insurance,
        SnapshotKey::Inventory,
        SnapshotKey::Prescriptions,
        SnapshotKey::Reminders,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotKey::Auth => "auth",
            SnapshotKey::Pos => "pos",
            SnapshotKey::StoreContext => "store-context",
            SnapshotKey::Insurance => "insurance",
            SnapshotKey::Inventory => "inventory",
            SnapshotKey::Prescriptions => "prescriptions",
            SnapshotKey::Reminders => "reminders",
        }
    }
}

impl fmt::Display for SnapshotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotRepository {
    pool: SqlitePool,
}

impl SnapshotRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SnapshotRepository { pool }
    }

    /// Stores a raw JSON payload, replacing any previous one.
    pub async fn save_raw(&self, key: SnapshotKey, payload: &str) -> DbResult<()> {
        let now = Utc::now();
        debug!(key = %key, bytes = payload.len(), "Saving snapshot");

        sqlx::query(
            r#"
            INSERT INTO snapshots (key, payload, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key.as_str())
        .bind(payload)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn load_raw(&self, key: SnapshotKey) -> DbResult<Option<String>> {
        let payload: Option<String> =
            sqlx::query_scalar("SELECT payload FROM snapshots WHERE key = ?1")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await?;
        Ok(payload)
    }

    /// Serializes `value` as JSON and stores it under `key`.
    pub async fn save<T: Serialize>(&self, key: SnapshotKey, value: &T) -> DbResult<()> {
        let payload = serde_json::to_string(value)?;
        self.save_raw(key, &payload).await
    }

    /// Loads and decodes a snapshot.
    ///
    /// Snapshots are not versioned, so a payload written by an older build
    /// may no longer fit `T`. That case is logged and treated as missing;
    /// the caller falls back to defaults and the next save overwrites it.
    pub async fn load<T: DeserializeOwned>(&self, key: SnapshotKey) -> DbResult<Option<T>> {
        let Some(payload) = self.load_raw(key).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&payload) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding undecodable snapshot");
                Ok(None)
            }
        }
    }

    /// Like [`load`](Self::load) but falls back to `T::default()`.
    pub async fn load_or_default<T: DeserializeOwned + Default>(
        &self,
        key: SnapshotKey,
    ) -> DbResult<T> {
        Ok(self.load(key).await?.unwrap_or_default())
    }

    /// Returns whether a snapshot was removed.
    pub async fn delete(&self, key: SnapshotKey) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM snapshots WHERE key = ?1")
            .bind(key.as_str())
            .execute(&self.pool)
            .await?;
        debug!(key = %key, removed = result.rows_affected(), "Deleted snapshot");
        Ok(result.rows_affected() > 0)
    }

    /// Keys currently stored, in key order.
    pub async fn keys(&self) -> DbResult<Vec<String>> {
        let keys: Vec<String> = sqlx::query_scalar("SELECT key FROM snapshots ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }

    pub async fn updated_at(&self, key: SnapshotKey) -> DbResult<Option<DateTime<Utc>>> {
        let ts: Option<DateTime<Utc>> =
            sqlx::query_scalar("SELECT updated_at FROM snapshots WHERE key = ?1")
                .bind(key.as_str())
                .fetch_optional(&self.pool)
                .await?;
        Ok(ts)
    }
}
