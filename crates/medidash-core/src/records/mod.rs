//! # Domain Record Stores
//!
//! Client-held collections for claims, inventory, prescriptions and
//! reminders. They are seeded with fixture data and persisted as snapshots;
//! no server round-trip happens for these entities.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     RecordStore<T: Record>                              │
//! │                                                                         │
//! │   add(record)                 ──► push, id must be unique               │
//! │   update_status(id, status)   ──► plain reassignment, no transition    │
//! │                                   rules (Rejected → Approved is fine)   │
//! │   delete(id)                  ──► remove and return                     │
//! │                                                                         │
//! │   Claim         Pending → Approved | Rejected → Paid                    │
//! │   Prescription  Pending → Verified | Filled | Rejected                  │
//! │   Reminder      Active ⇄ Paused → Completed                             │
//! │   InventoryItem Active ⇄ Discontinued; batches + stock movements       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod claims;
pub mod inventory;
pub mod prescriptions;
pub mod reminders;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};

pub use claims::{Claim, ClaimStatus};
pub use inventory::{Batch, InventoryItem, ItemStatus, StockTransfer};
pub use prescriptions::{Prescription, PrescriptionStatus};
pub use reminders::{Reminder, ReminderStatus};

/// A record kept in a [`RecordStore`].
pub trait Record: Clone {
    /// Entity name used in error messages ("Claim", "Prescription", ...).
    const ENTITY: &'static str;

    type Status: Copy + PartialEq;

    fn id(&self) -> &str;

    fn status(&self) -> Self::Status;

    fn set_status(&mut self, status: Self::Status);
}

/// A persisted, seeded collection of records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore<T> {
    items: Vec<T>,
}

impl<T> Default for RecordStore<T> {
    fn default() -> Self {
        RecordStore { items: Vec::new() }
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(items: Vec<T>) -> Self {
        RecordStore { items }
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: &str) -> CoreResult<&mut T> {
        self.items
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| CoreError::not_found(T::ENTITY, id))
    }

    /// Appends a record. Ids must be unique within the store.
    pub fn add(&mut self, record: T) -> CoreResult<&T> {
        if record.id().trim().is_empty() {
            return Err(ValidationError::Required {
                field: "id".to_string(),
            }
            .into());
        }
        if self.get(record.id()).is_some() {
            return Err(ValidationError::InvalidFormat {
                field: "id".to_string(),
                reason: format!("{} '{}' already exists", T::ENTITY, record.id()),
            }
            .into());
        }
        self.items.push(record);
        Ok(&self.items[self.items.len() - 1])
    }

    /// Reassigns the status. Any status may follow any other.
    pub fn update_status(&mut self, id: &str, status: T::Status) -> CoreResult<&T> {
        let record = self.get_mut(id)?;
        record.set_status(status);
        Ok(record)
    }

    pub fn delete(&mut self, id: &str) -> CoreResult<T> {
        let index = self
            .items
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| CoreError::not_found(T::ENTITY, id))?;
        Ok(self.items.remove(index))
    }

    /// Records currently in the given status.
    pub fn with_status(&self, status: T::Status) -> Vec<&T> {
        self.items.iter().filter(|r| r.status() == status).collect()
    }
}
