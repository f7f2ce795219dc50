//! Sync commands for garmin-sync

use rusqlite::OptionalExtension;

use crate::client::{ApiClient, OAuth2Token};
use crate::config;
use crate::db::Database;
use crate::error::{Result, SyncError};
use crate::sync::{self, SyncEngine};

/// Garmin Connect domain served by the public API
const GARMIN_DOMAIN: &str = "garmin.com";

/// Run a sync for one date
pub fn run(date: Option<String>, db_path: Option<String>) -> Result<()> {
    // Reject a malformed date before anything talks to the network
    let target = match date {
        Some(s) => sync::parse_target_date(&s)?,
        None => sync::default_target_date(),
    };

    println!("Syncing Garmin data for: {}", target);

    let token = OAuth2Token::load(&config::token_store_dir()?)?;
    let mut api = ApiClient::new(GARMIN_DOMAIN, token)?;

    println!("Authenticating with Garmin Connect...");
    api.resolve_profile()?;
    println!("Authenticated.");

    let db_path = match db_path {
        Some(path) => path,
        None => config::default_db_path()?,
    };
    println!("Using database: {}\n", db_path);
    let mut db = Database::open(&db_path)?;

    let report = SyncEngine::new(&api, &mut db).sync_date(target)?;

    println!("[Data Sources]");
    println!("  daily_summary  {}", report.daily_summary);
    println!("  hydration      {}", report.hydration);
    println!("  sleep          {}", report.sleep);
    println!("  hrv            {}", report.hrv);
    println!(
        "  activities     {} ({} activities, {} splits)",
        report.activities, report.activity_count, report.split_count
    );

    if report.nothing_persisted() {
        println!("\nNothing to save.");
    } else {
        println!("\nAll changes committed for {}.", report.date);
    }

    Ok(())
}

/// Show row counts for synced tables
pub fn status(db_path: Option<String>) -> Result<()> {
    let db_path = match db_path {
        Some(path) => path,
        None => config::default_db_path()?,
    };

    if !std::path::Path::new(&db_path).exists() {
        println!("No database found at: {}", db_path);
        println!("Run 'garmin-sync sync' to create one.");
        return Ok(());
    }

    let db = Database::open(&db_path)?;
    let conn = db.connection();

    let tables = [
        "daily_summary",
        "daily_sleep",
        "daily_hrv",
        "activities",
        "activity_split_summaries",
    ];

    println!("Database: {}\n", db_path);
    for table in tables {
        let count: i64 = conn
            .query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
                row.get(0)
            })
            .map_err(|e| SyncError::Database(format!("Failed to count {}: {}", table, e)))?;
        println!("  {:<26} {:>6} rows", table, count);
    }

    let last_synced: Option<String> = conn
        .query_row(
            "SELECT MAX(calendar_date) FROM daily_summary",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| SyncError::Database(format!("Failed to read last synced date: {}", e)))?
        .flatten();

    if let Some(date) = last_synced {
        println!("\nLast synced daily summary: {}", date);
    }

    Ok(())
}
