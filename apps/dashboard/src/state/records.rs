//! # Record Store State
//!
//! The four locally kept collections. Each is seeded from fixtures the first
//! time the dashboard starts and persisted under its own snapshot key after
//! every change.

use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::Serialize;

use medidash_core::records::{
    claims, inventory, prescriptions, reminders, Claim, InventoryItem, Prescription, Record,
    RecordStore, Reminder,
};
use medidash_db::SnapshotKey;

/// A record type with a home in [`RecordsState`] and a snapshot key.
pub trait StoredRecord: Record + Serialize + DeserializeOwned + Send + 'static {
    const KEY: SnapshotKey;

    fn store(records: &RecordsState) -> &SharedStore<Self>;
}

impl StoredRecord for Claim {
    const KEY: SnapshotKey = SnapshotKey::Insurance;

    fn store(records: &RecordsState) -> &SharedStore<Self> {
        &records.claims
    }
}

impl StoredRecord for InventoryItem {
    const KEY: SnapshotKey = SnapshotKey::Inventory;

    fn store(records: &RecordsState) -> &SharedStore<Self> {
        &records.inventory
    }
}

impl StoredRecord for Prescription {
    const KEY: SnapshotKey = SnapshotKey::Prescriptions;

    fn store(records: &RecordsState) -> &SharedStore<Self> {
        &records.prescriptions
    }
}

impl StoredRecord for Reminder {
    const KEY: SnapshotKey = SnapshotKey::Reminders;

    fn store(records: &RecordsState) -> &SharedStore<Self> {
        &records.reminders
    }
}

/// One shared, lock-protected record store.
#[derive(Debug)]
pub struct SharedStore<T> {
    inner: Arc<Mutex<RecordStore<T>>>,
}

impl<T> Clone for SharedStore<T> {
    fn clone(&self) -> Self {
        SharedStore {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Record> SharedStore<T> {
    pub fn new(store: RecordStore<T>) -> Self {
        SharedStore {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&RecordStore<T>) -> R,
    {
        let store = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&store)
    }

    pub fn with_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut RecordStore<T>) -> R,
    {
        let mut store = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    pub fn snapshot(&self) -> RecordStore<T> {
        self.with(Clone::clone)
    }
}

#[derive(Debug, Clone)]
pub struct RecordsState {
    pub claims: SharedStore<Claim>,
    pub inventory: SharedStore<InventoryItem>,
    pub prescriptions: SharedStore<Prescription>,
    pub reminders: SharedStore<Reminder>,
}

impl RecordsState {
    pub fn new(
        claims: RecordStore<Claim>,
        inventory: RecordStore<InventoryItem>,
        prescriptions: RecordStore<Prescription>,
        reminders: RecordStore<Reminder>,
    ) -> Self {
        RecordsState {
            claims: SharedStore::new(claims),
            inventory: SharedStore::new(inventory),
            prescriptions: SharedStore::new(prescriptions),
            reminders: SharedStore::new(reminders),
        }
    }

    /// All four stores filled with fixture data.
    pub fn seeded() -> Self {
        RecordsState::new(
            RecordStore::with_records(claims::seed()),
            RecordStore::with_records(inventory::seed()),
            RecordStore::with_records(prescriptions::seed()),
            RecordStore::with_records(reminders::seed()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_same_store() {
        let records = RecordsState::seeded();
        let other = records.clone();

        other.claims.with_mut(|store| store.delete("CLM-1001")).unwrap();

        assert!(records.claims.with(|store| store.get("CLM-1001").is_none()));
        assert_eq!(records.claims.snapshot().len(), other.claims.snapshot().len());
    }

    #[test]
    fn test_stored_record_routes_to_its_store() {
        let records = RecordsState::seeded();
        let seeded = inventory::seed().len();
        assert_eq!(InventoryItem::store(&records).with(|s| s.len()), seeded);
        assert_eq!(<Claim as StoredRecord>::KEY, SnapshotKey::Insurance);
    }
}
