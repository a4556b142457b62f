//! DuckDB connection wrapper with lazy table loading and query execution.
//!
//! Snapshot tables are loaded on first use with a fixed column schema, so
//! queries see the same types whether a snapshot has rows or not.

use crate::cache::CacheManager;
use crate::config;
use crate::error::{Result, TradesError};
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};

/// Wraps an in-memory DuckDB connection and loads cached snapshots as tables.
pub struct Connection {
    conn: DuckDbConnection,
    /// The cache manager used to download/locate snapshots.
    pub cache: RefCell<CacheManager>,
    registered_tables: RefCell<HashSet<String>>,
}

impl Connection {
    /// Create a connection backed by the given cache.
    ///
    /// Opens an in-memory DuckDB database.
    pub fn new(cache: CacheManager) -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            cache: RefCell::new(cache),
            registered_tables: RefCell::new(HashSet::new()),
        })
    }

    /// Ensure one or more tables are loaded, downloading snapshots if needed.
    pub fn ensure_tables(&self, tables: &[&str]) -> Result<()> {
        for name in tables {
            if !self.registered_tables.borrow().contains(*name) {
                self.ensure_table(name)?;
            }
        }
        Ok(())
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows_result = stmt.query(param_values.as_slice())?;

        // Column metadata is only available once the query has run
        let column_names: Vec<String> = rows_result
            .as_ref()
            .map(|s| {
                s.column_names()
                    .into_iter()
                    .map(|c| c.to_string())
                    .collect()
            })
            .unwrap_or_default();

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows_result.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> = params
            .iter()
            .map(|p| p as &dyn duckdb::ToSql)
            .collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Create a DuckDB table from a newline-delimited JSON file
    /// (plain or `.gz`).
    ///
    /// Known snapshot tables are read with their fixed column schema from
    /// [`config::table_columns`]; anything else is schema-sniffed.
    pub fn register_table_from_ndjson(&self, table_name: &str, ndjson_path: &str) -> Result<()> {
        let path_fwd = ndjson_path.replace('\\', "/").replace('\'', "''");
        let source = match config::table_columns(table_name) {
            Some(cols) => {
                let columns = cols
                    .iter()
                    .map(|(name, ty)| format!("'{}': '{}'", name, ty))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "read_json('{}', format='newline_delimited', columns={{{}}})",
                    path_fwd, columns
                )
            }
            None => format!("read_json_auto('{}', format='newline_delimited')", path_fwd),
        };

        self.conn.execute_batch(&format!(
            "DROP TABLE IF EXISTS {}; CREATE TABLE {} AS SELECT * FROM {}",
            table_name, table_name, source
        ))?;
        self.registered_tables
            .borrow_mut()
            .insert(table_name.to_string());
        Ok(())
    }

    /// Check whether a table has been loaded.
    pub fn has_table(&self, name: &str) -> bool {
        self.registered_tables.borrow().contains(name)
    }

    /// Return a sorted list of loaded table names.
    pub fn tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.registered_tables.borrow().iter().cloned().collect();
        names.sort();
        names
    }

    /// Forget loaded tables so they are reloaded from the cache on next access.
    pub fn reset_tables(&self) {
        self.registered_tables.borrow_mut().clear();
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }

    fn ensure_table(&self, table_name: &str) -> Result<()> {
        let path = self.cache.borrow().ensure_snapshot(table_name)?;
        let path_str = path.to_string_lossy();
        if let Err(e) = self.register_table_from_ndjson(table_name, &path_str) {
            tracing::warn!(path = %path_str, error = %e, "corrupt snapshot, removing");
            let _ = std::fs::remove_file(&path);
            return Err(TradesError::NotFound(format!(
                "Snapshot for {} was corrupt and has been removed. \
                 Retry to re-download. Original error: {}",
                table_name, e
            )));
        }
        tracing::debug!(table = table_name, path = %path_str, "loaded snapshot table");
        Ok(())
    }
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::UBigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => {
            // HugeInt may not fit in i64; fall back to string
            if let Ok(i) = i64::try_from(n) {
                serde_json::Value::Number(i.into())
            } else {
                serde_json::Value::String(n.to_string())
            }
        }
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        ValueRef::Date32(days) => chrono::NaiveDate::from_ymd_opt(1970, 1, 1)
            .and_then(|epoch| epoch.checked_add_signed(chrono::Duration::days(days as i64)))
            .map(|d| serde_json::Value::String(d.to_string()))
            .unwrap_or(serde_json::Value::Null),
        _ => serde_json::Value::Null,
    }
}
