//! # MediDash Entry Point
//!
//! Boots the dashboard core (config, snapshot database, API client) and runs
//! one maintenance command against it. The browser frontend drives the same
//! commands through the library.
//!
//! ## Usage
//! ```bash
//! medidash status
//! medidash guard /en/pharmacy/inventory
//! medidash stock
//! medidash reminders 2024-03-06
//! medidash --config ./dashboard.toml status
//! ```

use std::env;
use std::path::PathBuf;

use chrono::{NaiveDate, Utc};
use tracing::info;

use medidash_api::DashboardConfig;
use medidash_dashboard::commands::{navigation, records, register};
use medidash_dashboard::{init_tracing, Dashboard};

fn print_help() {
    println!("MediDash Dashboard");
    println!();
    println!("Usage: medidash [OPTIONS] <COMMAND> [ARG]");
    println!();
    println!("Commands:");
    println!("  status               Session, branch and register state");
    println!("  guard <PATH>         Route guard decision for a path");
    println!("  stock                Low stock and soon-expiring batches");
    println!("  reminders [DATE]     Reminders due on DATE (default: today)");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  Config file (default: platform config dir)");
    println!("  -h, --help           Show this help message");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = env::args().skip(1).collect();
    let mut config_path: Option<PathBuf> = None;
    let mut positional: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if let Some(path) = args.get(i + 1) {
                    config_path = Some(PathBuf::from(path));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            other => positional.push(other.to_string()),
        }
        i += 1;
    }

    let config = DashboardConfig::load(config_path)?;
    info!(api = %config.api.base_url, "Starting MediDash");
    let dash = Dashboard::open(config).await?;

    let today = Utc::now().date_naive();
    match positional.first().map(String::as_str) {
        None | Some("status") => {
            let session = dash.session.get();
            let status = register::register_status(&dash);
            println!(
                "User:      {}",
                session.user.map(|u| u.name).unwrap_or_else(|| "(signed out)".into())
            );
            println!(
                "Branch:    {}",
                dash.branch.active().map(|b| b.name).unwrap_or_else(|| "(none)".into())
            );
            println!("Register:  {:?}", status.phase);
            if let Some(expected) = status.expected_balance {
                println!("Expected:  {expected}");
            }
            if status.must_open_register {
                println!("The register must be opened before selling.");
            }
        }
        Some("guard") => {
            let path = positional.get(1).map(String::as_str).unwrap_or("/");
            println!("{}", serde_json::to_string(&navigation::guard_navigation(&dash, path))?);
        }
        Some("stock") => {
            for item in records::low_stock(&dash) {
                println!("LOW      {} ({} left)", item.name, item.total_quantity(None));
            }
            for exp in records::expiring_soon(&dash, today) {
                println!(
                    "EXPIRES  {} batch {} on {} ({} units)",
                    exp.item_name, exp.batch.batch_number, exp.batch.expiry_date, exp.batch.quantity
                );
            }
        }
        Some("reminders") => {
            let date = match positional.get(1) {
                Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")?,
                None => today,
            };
            for reminder in records::reminders_due(&dash, date) {
                let times: Vec<String> = reminder
                    .times
                    .iter()
                    .map(|t| t.format("%H:%M").to_string())
                    .collect();
                println!(
                    "{}  {} {} for {}",
                    times.join(","),
                    reminder.medication,
                    reminder.dosage,
                    reminder.patient_name
                );
            }
        }
        Some(other) => {
            eprintln!("Unknown command: {other}");
            print_help();
        }
    }

    dash.db.inner().close().await;
    Ok(())
}
