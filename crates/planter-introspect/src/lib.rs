//! Catalog introspection and schema loading.

pub mod catalog;
pub mod dialect;
pub mod loader;
pub mod mapper;
pub mod mysql;
pub mod options;
pub mod postgres;

pub use catalog::{Catalog, RawColumn, RawForeignKey, RawTable};
pub use dialect::{connect, Dialect};
pub use loader::{load_columns, load_foreign_keys, load_schema};
pub use mysql::MysqlCatalog;
pub use options::LoadOptions;
pub use postgres::PostgresCatalog;

pub use planter_core::SchemaGraph;

/// Connect to `conn` and load `schema` into a graph.
pub async fn introspect(
    conn: &str,
    schema: &str,
    opts: &LoadOptions,
) -> planter_core::Result<SchemaGraph> {
    let catalog = connect(conn, opts).await?;
    load_schema(catalog, schema, opts).await
}
