//! # Record Commands
//!
//! Claims, inventory, prescriptions and reminders are kept locally and never
//! round-trip to the server. Patients are the exception: they are listed
//! straight from the backend.
//!
//! ```text
//! ┌──────────────────┬────────────────────────────────────────────────────┐
//! │  generic         │  list_records, add_record, set_record_status,      │
//! │  (any record)    │  delete_record                                     │
//! ├──────────────────┼────────────────────────────────────────────────────┤
//! │  claims          │  claim_totals                                      │
//! │  inventory       │  adjust_stock, transfer_stock, low_stock,          │
//! │                  │  expiring_soon                                     │
//! │  prescriptions   │  prescription_interactions                         │
//! │  reminders       │  reminders_due                                     │
//! │  patients        │  list_patients (server)                            │
//! └──────────────────┴────────────────────────────────────────────────────┘
//! ```
//!
//! Status changes are not validated: any status may follow any other.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use medidash_api::{PageQuery, Paginated};
use medidash_core::interactions::{check_interactions, Interaction};
use medidash_core::records::claims::{self, ClaimTotals};
use medidash_core::records::inventory::{self, ExpiringBatch};
use medidash_core::records::reminders;
use medidash_core::records::{InventoryItem, Reminder, StockTransfer};
use medidash_core::{CoreError, Patient, EXPIRY_WARNING_DAYS};

use crate::error::CommandResult;
use crate::state::StoredRecord;
use crate::Dashboard;

use super::report_failure;

/// `PREFIX-1A2B3C4D` style id for records created on this device.
pub fn new_record_id(prefix: &str) -> String {
    let simple = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", simple[..8].to_uppercase())
}

// =============================================================================
// Generic
// =============================================================================

pub fn list_records<T: StoredRecord>(dash: &Dashboard) -> Vec<T> {
    T::store(&dash.records).with(|store| store.list().to_vec())
}

pub async fn add_record<T: StoredRecord>(dash: &Dashboard, record: T) -> CommandResult<T> {
    let added = T::store(&dash.records).with_mut(|store| store.add(record).cloned())?;
    dash.persist_store::<T>().await?;
    info!(entity = T::ENTITY, id = added.id(), "Record added");
    Ok(added)
}

pub async fn set_record_status<T: StoredRecord>(
    dash: &Dashboard,
    id: &str,
    status: T::Status,
) -> CommandResult<T> {
    let updated =
        T::store(&dash.records).with_mut(|store| store.update_status(id, status).cloned())?;
    dash.persist_store::<T>().await?;
    Ok(updated)
}

pub async fn delete_record<T: StoredRecord>(dash: &Dashboard, id: &str) -> CommandResult<T> {
    let removed = T::store(&dash.records).with_mut(|store| store.delete(id))?;
    dash.persist_store::<T>().await?;
    info!(entity = T::ENTITY, id, "Record deleted");
    Ok(removed)
}

// =============================================================================
// Claims
// =============================================================================

pub fn claim_totals(dash: &Dashboard) -> ClaimTotals {
    dash.records.claims.with(claims::totals)
}

// =============================================================================
// Inventory
// =============================================================================

/// Signed correction to one batch at the active branch. Returns the new
/// batch quantity.
pub async fn adjust_stock(
    dash: &Dashboard,
    item_id: &str,
    batch_number: &str,
    delta: i64,
) -> CommandResult<i64> {
    let branch = dash.branch.require_active()?;
    let quantity = dash.records.inventory.with_mut(|store| {
        inventory::adjust_stock(store, item_id, batch_number, &branch.id, delta)
    })?;
    dash.persist_store::<InventoryItem>().await?;
    info!(item_id, batch_number, delta, quantity, "Stock adjusted");
    Ok(quantity)
}

/// Moves stock from the active branch to `to_store`.
pub async fn transfer_stock(
    dash: &Dashboard,
    item_id: &str,
    batch_number: &str,
    to_store: &str,
    quantity: i64,
) -> CommandResult<()> {
    let branch = dash.branch.require_active()?;
    let transfer = StockTransfer {
        item_id: item_id.to_string(),
        batch_number: batch_number.to_string(),
        from_store: branch.id,
        to_store: to_store.to_string(),
        quantity,
    };
    dash.records
        .inventory
        .with_mut(|store| inventory::transfer_stock(store, &transfer))?;
    dash.persist_store::<InventoryItem>().await?;
    info!(
        item_id,
        batch_number,
        from = %transfer.from_store,
        to = to_store,
        quantity,
        "Stock transferred"
    );
    Ok(())
}

pub fn low_stock(dash: &Dashboard) -> Vec<InventoryItem> {
    dash.records
        .inventory
        .with(|store| inventory::low_stock(store).into_iter().cloned().collect())
}

pub fn expiring_soon(dash: &Dashboard, today: NaiveDate) -> Vec<ExpiringBatch> {
    dash.records
        .inventory
        .with(|store| inventory::expiring_within(store, EXPIRY_WARNING_DAYS, today))
}

// =============================================================================
// Prescriptions
// =============================================================================

pub fn prescription_interactions(dash: &Dashboard, id: &str) -> CommandResult<Vec<Interaction>> {
    let interactions = dash.records.prescriptions.with(|store| {
        store
            .get(id)
            .map(|rx| check_interactions(&rx.drug_names()))
            .ok_or_else(|| CoreError::not_found("Prescription", id))
    })?;
    Ok(interactions)
}

// =============================================================================
// Reminders
// =============================================================================

pub fn reminders_due(dash: &Dashboard, date: NaiveDate) -> Vec<Reminder> {
    dash.records
        .reminders
        .with(|store| reminders::due_on(store, date).into_iter().cloned().collect())
}

// =============================================================================
// Patients
// =============================================================================

pub async fn list_patients(
    dash: &Dashboard,
    page: PageQuery,
    search: Option<&str>,
) -> CommandResult<Paginated<Patient>> {
    dash.api
        .list_patients(page, search)
        .await
        .map_err(|e| report_failure(dash.notifier(), "Could not load patients", e))
}
