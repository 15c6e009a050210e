//! # Pharmacy Inventory
//!
//! Items carry their stock as batches, one row per (batch number, branch).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Amoxicillin 500mg                          reorder level 100           │
//! │  ├── AMX-2301  qty 120  exp 2024-09-30  branch main                     │
//! │  └── AMX-2302  qty  40  exp 2025-01-31  branch main                     │
//! │                                                                         │
//! │  transfer_stock(AMX-2301, main ──► north, 30)                           │
//! │  ├── AMX-2301  qty  90  branch main                                     │
//! │  ├── AMX-2301  qty  30  branch north   (created on first transfer)      │
//! │  └── AMX-2302  qty  40  branch main                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Quantities are checked against the batch before anything changes; the
//! backend ledger is still authoritative.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{Record, RecordStore};
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::validation::validate_stock_quantity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ItemStatus {
    #[default]
    Active,
    Discontinued,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub batch_number: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub expiry_date: NaiveDate,
    pub store_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub unit_price: Money,
    pub reorder_level: i64,
    pub batches: Vec<Batch>,
    #[serde(default)]
    pub status: ItemStatus,
}

impl InventoryItem {
    /// Total quantity across batches, optionally limited to one branch.
    pub fn total_quantity(&self, store_id: Option<&str>) -> i64 {
        self.batches
            .iter()
            .filter(|b| store_id.map_or(true, |s| b.store_id == s))
            .map(|b| b.quantity)
            .sum()
    }

    pub fn is_low_stock(&self) -> bool {
        self.status == ItemStatus::Active && self.total_quantity(None) <= self.reorder_level
    }

    fn batch_mut(&mut self, batch_number: &str, store_id: &str) -> CoreResult<&mut Batch> {
        let item = self.id.clone();
        self.batches
            .iter_mut()
            .find(|b| b.batch_number == batch_number && b.store_id == store_id)
            .ok_or_else(|| CoreError::not_found("Batch", format!("{item}/{batch_number}@{store_id}")))
    }
}

impl Record for InventoryItem {
    const ENTITY: &'static str = "InventoryItem";
    type Status = ItemStatus;

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> ItemStatus {
        self.status
    }

    fn set_status(&mut self, status: ItemStatus) {
        self.status = status;
    }
}

/// Moves stock of one batch between branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockTransfer {
    pub item_id: String,
    pub batch_number: String,
    pub from_store: String,
    pub to_store: String,
    pub quantity: i64,
}

// =============================================================================
// Stock Movements
// =============================================================================

/// Applies a signed correction to one batch. A negative delta may not take
/// the batch below zero.
pub fn adjust_stock(
    store: &mut RecordStore<InventoryItem>,
    item_id: &str,
    batch_number: &str,
    store_id: &str,
    delta: i64,
) -> CoreResult<i64> {
    if delta == 0 {
        return Err(ValidationError::MustBePositive {
            field: "adjustment".to_string(),
        }
        .into());
    }
    let item = store.get_mut(item_id)?;
    let name = item.name.clone();
    let batch = item.batch_mut(batch_number, store_id)?;
    if delta < 0 {
        validate_stock_quantity(&name, batch_number, -delta, batch.quantity)?;
    }
    batch.quantity += delta;
    Ok(batch.quantity)
}

/// Moves `quantity` units of a batch to another branch, creating the
/// destination batch row if the branch has none yet.
pub fn transfer_stock(
    store: &mut RecordStore<InventoryItem>,
    transfer: &StockTransfer,
) -> CoreResult<()> {
    if transfer.from_store == transfer.to_store {
        return Err(ValidationError::InvalidFormat {
            field: "toStore".to_string(),
            reason: "destination must differ from source".to_string(),
        }
        .into());
    }
    let item = store.get_mut(&transfer.item_id)?;
    let name = item.name.clone();
    let source = item.batch_mut(&transfer.batch_number, &transfer.from_store)?;
    validate_stock_quantity(&name, &transfer.batch_number, transfer.quantity, source.quantity)?;
    source.quantity -= transfer.quantity;
    let expiry_date = source.expiry_date;

    match item.batch_mut(&transfer.batch_number, &transfer.to_store) {
        Ok(dest) => dest.quantity += transfer.quantity,
        Err(_) => item.batches.push(Batch {
            batch_number: transfer.batch_number.clone(),
            quantity: transfer.quantity,
            expiry_date,
            store_id: transfer.to_store.clone(),
        }),
    }
    Ok(())
}

// =============================================================================
// Queries
// =============================================================================

/// Active items at or below their reorder level.
pub fn low_stock(store: &RecordStore<InventoryItem>) -> Vec<&InventoryItem> {
    store.list().iter().filter(|i| i.is_low_stock()).collect()
}

/// A batch with stock that expires within the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ExpiringBatch {
    pub item_id: String,
    pub item_name: String,
    pub batch: Batch,
}

/// Non-empty batches expiring on or before `today + days`, soonest first.
/// Already expired batches are included.
pub fn expiring_within(
    store: &RecordStore<InventoryItem>,
    days: i64,
    today: NaiveDate,
) -> Vec<ExpiringBatch> {
    let cutoff = today + Duration::days(days);
    let mut found: Vec<ExpiringBatch> = store
        .list()
        .iter()
        .flat_map(|item| {
            item.batches
                .iter()
                .filter(move |b| b.quantity > 0 && b.expiry_date <= cutoff)
                .map(move |b| ExpiringBatch {
                    item_id: item.id.clone(),
                    item_name: item.name.clone(),
                    batch: b.clone(),
                })
        })
        .collect();
    found.sort_by_key(|e| e.batch.expiry_date);
    found
}

// =============================================================================
// Fixtures
// =============================================================================

fn batch(number: &str, quantity: i64, expiry: (i32, u32, u32), store_id: &str) -> Batch {
    Batch {
        batch_number: number.to_string(),
        quantity,
        expiry_date: NaiveDate::from_ymd_opt(expiry.0, expiry.1, expiry.2).unwrap_or_default(),
        store_id: store_id.to_string(),
    }
}

/// Fixture inventory for the main branch.
pub fn seed() -> Vec<InventoryItem> {
    vec![
        InventoryItem {
            id: "INV-001".into(),
            name: "Amoxicillin 500mg".into(),
            category: "Antibiotics".into(),
            unit_price: Money::from_cents(1_250),
            reorder_level: 100,
            batches: vec![
                batch("AMX-2301", 120, (2024, 9, 30), "store-main"),
                batch("AMX-2302", 40, (2025, 1, 31), "store-main"),
            ],
            status: ItemStatus::Active,
        },
        InventoryItem {
            id: "INV-002".into(),
            name: "Warfarin 5mg".into(),
            category: "Anticoagulants".into(),
            unit_price: Money::from_cents(890),
            reorder_level: 50,
            batches: vec![batch("WRF-1187", 35, (2024, 4, 15), "store-main")],
            status: ItemStatus::Active,
        },
        InventoryItem {
            id: "INV-003".into(),
            name: "Paracetamol 1g".into(),
            category: "Analgesics".into(),
            unit_price: Money::from_cents(450),
            reorder_level: 200,
            batches: vec![batch("PCM-0412", 640, (2026, 6, 30), "store-main")],
            status: ItemStatus::Active,
        },
        InventoryItem {
            id: "INV-004".into(),
            name: "Ranitidine 150mg".into(),
            category: "Gastro".into(),
            unit_price: Money::from_cents(600),
            reorder_level: 30,
            batches: vec![batch("RAN-0099", 0, (2024, 2, 1), "store-main")],
            status: ItemStatus::Discontinued,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecordStore<InventoryItem> {
        RecordStore::with_records(seed())
    }

    fn transfer(qty: i64) -> StockTransfer {
        StockTransfer {
            item_id: "INV-001".into(),
            batch_number: "AMX-2301".into(),
            from_store: "store-main".into(),
            to_store: "store-north".into(),
            quantity: qty,
        }
    }

    #[test]
    fn test_transfer_creates_then_tops_up_destination() {
        let mut store = store();
        transfer_stock(&mut store, &transfer(30)).unwrap();
        transfer_stock(&mut store, &transfer(10)).unwrap();

        let item = store.get("INV-001").unwrap();
        assert_eq!(item.total_quantity(Some("store-main")), 80);
        assert_eq!(item.total_quantity(Some("store-north")), 40);
        assert_eq!(item.total_quantity(None), 160);
        assert_eq!(item.batches.len(), 3);
    }

    #[test]
    fn test_transfer_more_than_available_is_rejected_without_change() {
        let mut store = store();
        let before = store.clone();
        let err = transfer_stock(&mut store, &transfer(121)).unwrap_err();
        assert!(matches!(err, CoreError::InsufficientStock { available: 120, requested: 121, .. }));
        assert_eq!(store, before);

        assert!(transfer_stock(&mut store, &transfer(0)).is_err());
        let mut same = transfer(1);
        same.to_store = same.from_store.clone();
        assert!(transfer_stock(&mut store, &same).is_err());
    }

    #[test]
    fn test_adjust_stock() {
        let mut store = store();
        assert_eq!(adjust_stock(&mut store, "INV-002", "WRF-1187", "store-main", 15).unwrap(), 50);
        assert_eq!(adjust_stock(&mut store, "INV-002", "WRF-1187", "store-main", -50).unwrap(), 0);
        assert!(matches!(
            adjust_stock(&mut store, "INV-002", "WRF-1187", "store-main", -1),
            Err(CoreError::InsufficientStock { .. })
        ));
        assert!(adjust_stock(&mut store, "INV-002", "NOPE", "store-main", 1).is_err());
        assert!(adjust_stock(&mut store, "INV-999", "WRF-1187", "store-main", 1).is_err());
    }

    #[test]
    fn test_low_stock_skips_discontinued() {
        let store = store();
        let ids: Vec<&str> = low_stock(&store).iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["INV-002"]);
    }

    #[test]
    fn test_expiring_within_sorted_and_skips_empty_batches() {
        let store = store();
        let today = NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
        let found = expiring_within(&store, 200, today);
        let batches: Vec<&str> = found.iter().map(|e| e.batch.batch_number.as_str()).collect();
        assert_eq!(batches, vec!["WRF-1187", "AMX-2301"]);
    }
}
