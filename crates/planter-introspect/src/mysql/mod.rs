use async_trait::async_trait;
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use planter_core::Result;

use crate::catalog::{Catalog, RawColumn, RawForeignKey, RawTable};
use crate::dialect::connection_error;
use crate::options::LoadOptions;

mod queries;

pub use queries::{COLUMNS, FOREIGN_KEYS, TABLES};

/// Catalog queries against MySQL / MariaDB `information_schema`.
///
/// The schema name is the MySQL database name.
#[derive(Debug, Clone)]
pub struct MysqlCatalog {
    pool: MySqlPool,
}

impl MysqlCatalog {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn connect(conn: &str, opts: &LoadOptions) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(opts.pool_size())
            .acquire_timeout(opts.acquire_timeout)
            .connect(conn)
            .await
            .map_err(|err| connection_error("mysql", conn, err))?;
        Ok(Self::new(pool))
    }
}

#[async_trait]
impl Catalog for MysqlCatalog {
    fn engine(&self) -> &'static str {
        "mysql"
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
