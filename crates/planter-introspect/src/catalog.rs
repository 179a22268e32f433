use async_trait::async_trait;

use planter_core::{Error, QueryKind, Result};

/// Table row: `(table_name, description?)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub name: String,
    pub comment: Option<String>,
}

/// Column row, ordered by `ordinal` ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawColumn {
    pub ordinal: i32,
    pub name: String,
    pub comment: Option<String>,
    pub data_type: String,
    pub not_null: bool,
    pub is_primary_key: bool,
    pub ddl_type: String,
}

/// Foreign key row, one per column pair of a constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawForeignKey {
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    pub constraint_name: String,
    pub is_target_primary_key: bool,
    pub is_source_primary_key: bool,
}

/// Catalog queries for one database dialect.
///
/// Implementations return flat rows; linking them into a graph is the
/// loader's job.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Base tables of `schema`, ordered by name.
    async fn list_tables(&self, schema: &str) -> Result<Vec<RawTable>>;

    /// Columns of `schema.table`, ordered by ordinal position.
    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<RawColumn>>;

    /// Outbound foreign key column pairs of `schema.table`.
    async fn list_foreign_keys(&self, schema: &str, table: &str) -> Result<Vec<RawForeignKey>>;
}

/// Split driver failures into decode problems and query failures.
pub(crate) fn sqlx_error(kind: QueryKind, target: &str, query: &str, err: sqlx::Error) -> Error {
    match &err {
        sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::TypeNotFound { .. } => Error::Scan {
            kind,
            target: target.to_string(),
            message: err.to_string(),
        },
        _ => Error::Query {
            kind,
            target: target.to_string(),
            query: query.trim().to_string(),
            message: err.to_string(),
        },
    }
}

/// `schema.table` label used in error messages.
pub(crate) fn qualified(schema: &str, table: &str) -> String {
    format!("{schema}.{table}")
}
