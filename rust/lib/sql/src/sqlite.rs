use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::types::ValueRef;
use rusqlite::{Connection, ErrorCode, ffi};

use crate::error::SQLError;
use crate::traits::{Row, SQLStore, Value};

/// SqliteStore is a SQLStore implementation backed by rusqlite (bundled SQLite).
///
/// Foreign keys are enforced on every connection; cascades are part of the
/// data model.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a SQLite database at the given path.
    pub fn open(path: &Path) -> Result<Self, SQLError> {
        let conn = Connection::open(path)
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        // WAL for concurrent readers; FK enforcement is per-connection.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;

        tracing::debug!("opened sqlite database at {}", path.display());
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite database (useful for tests).
    pub fn open_in_memory() -> Result<Self, SQLError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")
            .map_err(|e| SQLError::Connection(e.to_string()))?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SQLError> {
        self.conn
            .lock()
            .map_err(|e| SQLError::Connection(format!("connection mutex poisoned: {}", e)))
    }
}

/// Convert our Value enum to rusqlite's ToSql.
fn bind_params(params: &[Value]) -> Vec<Box<dyn rusqlite::types::ToSql + '_>> {
    params
        .iter()
        .map(|v| -> Box<dyn rusqlite::types::ToSql + '_> {
            match v {
                Value::Null => Box::new(rusqlite::types::Null),
                Value::Integer(i) => Box::new(*i),
                Value::Real(f) => Box::new(*f),
                Value::Text(s) => Box::new(s.as_str()),
                Value::Blob(b) => Box::new(b.as_slice()),
            }
        })
        .collect()
}

/// Map a rusqlite failure, separating constraint violations so services can
/// turn duplicates into client errors.
fn classify(e: rusqlite::Error) -> SQLError {
    if let rusqlite::Error::SqliteFailure(ref err, ref msg) = e {
        if err.code == ErrorCode::ConstraintViolation {
            let text = msg.clone().unwrap_or_else(|| e.to_string());
            return match err.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    SQLError::Unique(text)
                }
                _ => SQLError::Constraint(text),
            };
        }
    }
    SQLError::Execution(e.to_string())
}

impl SQLStore for SqliteStore {
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError> {
        let conn = self.lock()?;

        let bound = bind_params(params);
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();

        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let column_names: Vec<String> = stmt
            .column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let mut columns = Vec::with_capacity(column_names.len());
                for (i, name) in column_names.iter().enumerate() {
                    columns.push((name.clone(), row_value_at(row, i)?));
                }
                Ok(Row { columns })
            })
            .map_err(|e| SQLError::Query(e.to_string()))?;

        let mut result = Vec::new();
        for row in rows {
            result.push(row.map_err(|e| SQLError::Query(e.to_string()))?);
        }
        Ok(result)
    }

    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError> {
        let conn = self.lock()?;

        let bound = bind_params(params);
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();

        let affected = conn.execute(sql, param_refs.as_slice()).map_err(classify)?;

        Ok(affected as u64)
    }

    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, SQLError> {
        // Same lock for execute + last_insert_rowid so concurrent inserts
        // cannot interleave.
        let conn = self.lock()?;

        let bound = bind_params(params);
        let param_refs: Vec<&dyn rusqlite::types::ToSql> =
            bound.iter().map(|b| b.as_ref()).collect();

        conn.execute(sql, param_refs.as_slice()).map_err(classify)?;
        Ok(conn.last_insert_rowid())
    }

    fn exec_batch(&self, sql: &str) -> Result<(), SQLError> {
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(classify)
    }
}

/// Extract a Value from a rusqlite row at a given column index.
fn row_value_at(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Value> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Blob(b.to_vec()),
    })
}
