use crate::error::SQLError;

/// A dynamically-typed SQL parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Integer(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Integer(if v { 1 } else { 0 })
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

/// A row returned from a SQL query: column name to value.
#[derive(Debug, Clone)]
pub struct Row {
    pub columns: Vec<(String, Value)>,
}

impl Row {
    /// Get a column value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.columns.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Get a text column value by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Get an integer column value by name.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name) {
            Some(Value::Integer(i)) => Some(*i),
            _ => None,
        }
    }

    /// Required text column.
    pub fn text(&self, name: &str) -> Result<String, SQLError> {
        self.get_str(name)
            .map(str::to_string)
            .ok_or_else(|| SQLError::Column(name.to_string()))
    }

    /// Required integer column.
    pub fn int(&self, name: &str) -> Result<i64, SQLError> {
        self.get_i64(name)
            .ok_or_else(|| SQLError::Column(name.to_string()))
    }

    /// Nullable text column.
    pub fn opt_text(&self, name: &str) -> Option<String> {
        self.get_str(name).map(str::to_string)
    }

    /// Nullable integer column.
    pub fn opt_int(&self, name: &str) -> Option<i64> {
        self.get_i64(name)
    }

    /// Integer column read as a boolean flag.
    pub fn flag(&self, name: &str) -> bool {
        self.get_i64(name).unwrap_or(0) != 0
    }
}

/// SQLStore provides a SQL execution interface backed by an embedded database.
pub trait SQLStore: Send + Sync {
    /// Execute a query and return rows.
    fn query(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, SQLError>;

    /// Execute a statement (UPDATE/DELETE/DDL) and return affected row count.
    fn exec(&self, sql: &str, params: &[Value]) -> Result<u64, SQLError>;

    /// Execute an INSERT and return the new row's rowid.
    fn insert(&self, sql: &str, params: &[Value]) -> Result<i64, SQLError>;

    /// Run several parameterless statements in one go (schema setup).
    fn exec_batch(&self, sql: &str) -> Result<(), SQLError>;

    /// Convenience: first row of a query, if any.
    fn query_one(&self, sql: &str, params: &[Value]) -> Result<Option<Row>, SQLError> {
        Ok(self.query(sql, params)?.into_iter().next())
    }

    /// Convenience: single integer from `SELECT COUNT(*) AS n ...`-style queries.
    fn count(&self, sql: &str, params: &[Value]) -> Result<i64, SQLError> {
        Ok(self
            .query_one(sql, params)?
            .and_then(|r| r.get_i64("n"))
            .unwrap_or(0))
    }
}
