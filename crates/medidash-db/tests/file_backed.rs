use medidash_core::records::{inventory, InventoryItem, RecordStore};
use medidash_db::{Database, DbConfig, SnapshotKey};

#[tokio::test]
async fn test_snapshots_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("medidash.db");

    let store = RecordStore::with_records(inventory::seed());
    {
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        db.snapshots().save(SnapshotKey::Inventory, &store).await.unwrap();
        db.close().await;
    }

    let db = Database::new(DbConfig::new(&path)).await.unwrap();
    let loaded: RecordStore<InventoryItem> = db
        .snapshots()
        .load(SnapshotKey::Inventory)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(loaded, store);
}
