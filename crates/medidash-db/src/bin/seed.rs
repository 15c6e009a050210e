//! # Fixture Seeder
//!
//! Writes the fixture claims, inventory, prescriptions and reminders into a
//! snapshot database so the records pages have something to show in
//! development.
//!
//! ## Usage
//! ```bash
//! cargo run -p medidash-db --bin seed
//! cargo run -p medidash-db --bin seed -- --db ./data/medidash.db --force
//! ```

use std::env;

use medidash_core::records::{claims, inventory, prescriptions, reminders, RecordStore};
use medidash_db::{Database, DbConfig, SnapshotKey};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./medidash_dev.db");
    let mut force = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--force" | "-f" => force = true,
            "--help" | "-h" => {
                println!("MediDash Fixture Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./medidash_dev.db)");
                println!("  -f, --force        Overwrite record snapshots that already exist");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("MediDash Fixture Seeder");
    println!("=======================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let snapshots = db.snapshots();
    println!("✓ Connected, migrations applied");

    let existing = snapshots.keys().await?;
    let mut written = 0;

    for key in [
        SnapshotKey::Insurance,
        SnapshotKey::Inventory,
        SnapshotKey::Prescriptions,
        SnapshotKey::Reminders,
    ] {
        if !force && existing.iter().any(|k| k == key.as_str()) {
            println!("  skip  {:<14} (exists, use --force)", key);
            continue;
        }
        let count = match key {
            SnapshotKey::Insurance => {
                let store = RecordStore::with_records(claims::seed());
                snapshots.save(key, &store).await?;
                store.len()
            }
            SnapshotKey::Inventory => {
                let store = RecordStore::with_records(inventory::seed());
                snapshots.save(key, &store).await?;
                store.len()
            }
            SnapshotKey::Prescriptions => {
                let store = RecordStore::with_records(prescriptions::seed());
                snapshots.save(key, &store).await?;
                store.len()
            }
            _ => {
                let store = RecordStore::with_records(reminders::seed());
                snapshots.save(key, &store).await?;
                store.len()
            }
        };
        written += 1;
        println!("  wrote {:<14} {} records", key, count);
    }

    println!();
    println!("✓ Seed complete ({} snapshots written)", written);
    db.close().await;
    Ok(())
}
