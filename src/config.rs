use std::path::PathBuf;
use std::time::Duration;

/// Path of the PostgREST API below the project base URL.
pub const REST_PATH: &str = "rest/v1";

pub const ENV_BASE_URL: &str = "CONGRESS_TRADES_URL";
pub const ENV_API_KEY: &str = "CONGRESS_TRADES_API_KEY";

pub const TRADES_TABLE: &str = "trades";
pub const MEMBERS_TABLE: &str = "members";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Rows requested per store page. Stays under PostgREST's usual `max-rows`.
pub const DEFAULT_PAGE_SIZE: usize = 1000;
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(15 * 60);

/// Tables mirrored into the local snapshot cache.
pub fn snapshot_tables() -> [&'static str; 2] {
    [TRADES_TABLE, MEMBERS_TABLE]
}

/// Snapshot file name (relative to the cache dir) for a table.
pub fn snapshot_file(table: &str) -> Option<String> {
    if snapshot_tables().contains(&table) {
        Some(format!("snapshots/{}.ndjson.gz", table))
    } else {
        None
    }
}

/// Fixed DuckDB column schema for a snapshot table.
///
/// Dates stay VARCHAR (ISO `YYYY-MM-DD`) and are cast in SQL where compared,
/// so a snapshot with no rows still yields a typed, empty table.
pub fn table_columns(table: &str) -> Option<&'static [(&'static str, &'static str)]> {
    match table {
        TRADES_TABLE => Some(&[
            ("id", "VARCHAR"),
            ("ticker", "VARCHAR"),
            ("action", "VARCHAR"),
            ("amount_range", "VARCHAR"),
            ("trade_date", "VARCHAR"),
            ("disclosure_date", "VARCHAR"),
            ("roi_percentage", "DOUBLE"),
            ("status", "VARCHAR"),
            ("pdf_url", "VARCHAR"),
            ("member_id", "VARCHAR"),
        ]),
        MEMBERS_TABLE => Some(&[
            ("id", "VARCHAR"),
            ("name", "VARCHAR"),
            ("party", "VARCHAR"),
            ("state", "VARCHAR"),
            ("chamber", "VARCHAR"),
        ]),
        _ => None,
    }
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("congress-trades-sdk")
    } else {
        PathBuf::from(".congress-trades-sdk-cache")
    }
}
