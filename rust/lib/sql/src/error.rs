use thiserror::Error;

#[derive(Error, Debug)]
pub enum SQLError {
    #[error("query error: {0}")]
    Query(String),

    #[error("execution error: {0}")]
    Execution(String),

    #[error("connection error: {0}")]
    Connection(String),

    /// UNIQUE or PRIMARY KEY constraint violated.
    #[error("unique constraint: {0}")]
    Unique(String),

    /// Any other constraint (FOREIGN KEY, CHECK, NOT NULL).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// A column was missing or had an unexpected type.
    #[error("column '{0}' missing or mistyped")]
    Column(String),
}
