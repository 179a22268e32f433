use std::fmt;

use thiserror::Error;

/// Catalog query issued by a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Tables,
    Columns,
    ForeignKeys,
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKind::Tables => write!(f, "table"),
            QueryKind::Columns => write!(f, "column"),
            QueryKind::ForeignKeys => write!(f, "foreign key"),
        }
    }
}

/// A foreign key that could not be resolved against the loaded tables.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("foreign key {constraint} on {table} references missing table {target_table}")]
    MissingTargetTable {
        constraint: String,
        table: String,
        target_table: String,
    },
    #[error(
        "foreign key {constraint} on {table} references missing column {target_table}.{target_column}"
    )]
    MissingTargetColumn {
        constraint: String,
        table: String,
        target_table: String,
        target_column: String,
    },
    #[error("foreign key {constraint} uses missing source column {table}.{column}")]
    MissingSourceColumn {
        constraint: String,
        table: String,
        column: String,
    },
    #[error("table {table} appears more than once")]
    DuplicateTable { table: String },
    #[error("column {table}.{column} appears more than once")]
    DuplicateColumn { table: String, column: String },
}

/// Error type shared across planter crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog could not be reached.
    #[error("failed to connect to {engine} database {target}: {message}")]
    Connection {
        engine: String,
        /// Connection string with credentials redacted.
        target: String,
        message: String,
    },
    /// The catalog query ran but the driver reported a failure.
    #[error("failed to load {kind} definitions of {target}: {message}\n{query}")]
    Query {
        kind: QueryKind,
        target: String,
        query: String,
        message: String,
    },
    /// A returned row does not decode into the expected shape.
    #[error("failed to scan {kind} row of {target}: {message}")]
    Scan {
        kind: QueryKind,
        target: String,
        message: String,
    },
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error("failed to filter tables: {0}")]
    Filter(String),
    #[error("unsupported engine: {0}")]
    UnsupportedEngine(String),
    #[error("failed to render diagram: {0}")]
    Render(String),
    /// A loader task panicked or could not be scheduled.
    #[error("loader task failed: {0}")]
    Task(String),
}

/// Convenience alias for results returned by planter crates.
pub type Result<T> = std::result::Result<T, Error>;
