//! Shared test fixtures for the trades SDK integration tests.
//!
//! Provides `setup_sample_db()` which creates an in-memory DuckDB connection
//! populated with small `members` and `trades` tables via NDJSON temp files,
//! and `seed_offline_cache()` which writes the same rows as cached snapshots.

#![allow(dead_code)]

use chrono::NaiveDate;
use congress_trades_sdk::cache::write_ndjson_gz;
use congress_trades_sdk::{CacheManager, Connection};
use serde_json::{json, Value};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::NamedTempFile;

/// The fixed "today" used by date-sensitive tests.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 20).unwrap()
}

pub fn sample_members() -> Vec<Value> {
    vec![
        json!({"id": "m1", "name": "Nancy Pelosi", "party": "D", "state": "CA", "chamber": "House"}),
        json!({"id": "m2", "name": "Dan Crenshaw", "party": "R", "state": "TX", "chamber": "House"}),
        json!({"id": "m3", "name": "Tommy Tuberville", "party": "R", "state": "AL", "chamber": "Senate"}),
    ]
}

/// Four trades: one dated exactly Jan 1 of the fixture year, one dated the
/// day before, one with an amount label outside the bracket table, and two
/// with null ROI.
pub fn sample_trades() -> Vec<Value> {
    vec![
        json!({
            "id": "t1",
            "ticker": "NVDA",
            "action": "Purchase",
            "amount_range": "$1M-$5M",
            "trade_date": "2024-06-15",
            "disclosure_date": "2024-06-17",
            "roi_percentage": 10.0,
            "status": "verified",
            "pdf_url": "https://disclosures.example/ptr/1.pdf",
            "member_id": "m1"
        }),
        json!({
            "id": "t2",
            "ticker": "NVDA",
            "action": "Sale",
            "amount_range": "$100K-$250K",
            "trade_date": "2024-01-01",
            "disclosure_date": "2024-01-20",
            "roi_percentage": null,
            "status": "processing",
            "pdf_url": null,
            "member_id": "m2"
        }),
        json!({
            "id": "t3",
            "ticker": "AAPL",
            "action": "Sale",
            "amount_range": "$50K-$100K",
            "trade_date": "2023-12-31",
            "disclosure_date": "2024-01-10",
            "roi_percentage": -2.0,
            "status": "verified",
            "pdf_url": null,
            "member_id": "m3"
        }),
        json!({
            "id": "t4",
            "ticker": "XOM",
            "action": "Exchange",
            "amount_range": "Over $50M",
            "trade_date": "2024-03-02",
            "disclosure_date": "2024-03-20",
            "roi_percentage": null,
            "status": "pending",
            "pdf_url": null,
            "member_id": "m2"
        }),
    ]
}

/// Create a `Connection` backed by a temporary offline cache with the
/// sample rows loaded into DuckDB tables.
///
/// The caller must keep the `TempDir` alive for the duration of the test.
pub fn setup_sample_db() -> (Connection, tempfile::TempDir) {
    setup_db_with(&sample_members(), &sample_trades())
}

pub fn setup_db_with(members: &[Value], trades: &[Value]) -> (Connection, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(
        Some(tmp_dir.path().to_path_buf()),
        true,
        None,
        Duration::from_secs(900),
    )
    .unwrap();
    let conn = Connection::new(cache).unwrap();

    write_ndjson_and_register(&conn, "members", members);
    write_ndjson_and_register(&conn, "trades", trades);

    (conn, tmp_dir)
}

/// Write the sample rows as gzip snapshots into `cache_dir`, as a sync would.
pub fn seed_offline_cache(cache_dir: &Path) {
    let snapshots = cache_dir.join("snapshots");
    std::fs::create_dir_all(&snapshots).unwrap();
    write_ndjson_gz(&snapshots.join("members.ndjson.gz"), &sample_members()).unwrap();
    write_ndjson_gz(&snapshots.join("trades.ndjson.gz"), &sample_trades()).unwrap();
}

/// Write a slice of JSON values as NDJSON to a temp file and register it
/// as a DuckDB table via `Connection::register_table_from_ndjson`.
fn write_ndjson_and_register(conn: &Connection, table_name: &str, rows: &[Value]) {
    let mut file = NamedTempFile::new().unwrap();
    for row in rows {
        writeln!(file, "{}", serde_json::to_string(row).unwrap()).unwrap();
    }
    file.flush().unwrap();

    let path = file.path().to_str().unwrap();
    conn.register_table_from_ndjson(table_name, path).unwrap();
    // DuckDB has copied the rows into an in-memory table, so the temp file
    // can go away.
}
