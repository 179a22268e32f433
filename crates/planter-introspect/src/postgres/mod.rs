use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use planter_core::{redact_connection_string, Error, Result};

use crate::catalog::{Catalog, RawColumn, RawForeignKey, RawTable};
use crate::dialect::connection_error;
use crate::options::LoadOptions;

mod dsn;
mod queries;

pub use dsn::connect_options;
pub use queries::{COLUMNS, FOREIGN_KEYS, TABLES};

/// Catalog queries against PostgreSQL system tables.
#[derive(Debug, Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Create a catalog using a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool sized to the load concurrency.
    ///
    /// `conn` is a `postgres://` URL or a libpq `key=value` string.
    pub async fn connect(conn: &str, opts: &LoadOptions) -> Result<Self> {
        let options = connect_options(conn).map_err(|message| Error::Connection {
            engine: "postgres".to_string(),
            target: redact_connection_string(conn).redacted,
            message,
        })?;
        let pool = PgPoolOptions::new()
            .max_connections(opts.pool_size())
            .acquire_timeout(opts.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|err| connection_error("postgres", conn, err))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Catalog for PostgresCatalog {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<RawTable>> {
        queries::list_tables(&self.pool, schema).await
    }

    async fn list_columns(&self, schema: &str, table: &str) -> Result<Vec<RawColumn>> {
        queries::list_columns(&self.pool, schema, table).await
    }

    async fn list_foreign_keys(&self, schema: &str, table: &str) -> Result<Vec<RawForeignKey>> {
        queries::list_foreign_keys(&self.pool, schema, table).await
    }
}
