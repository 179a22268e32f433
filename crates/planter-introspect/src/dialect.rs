use std::fmt;
use std::sync::Arc;

use planter_core::{redact_connection_string, Error, Result};

use crate::catalog::Catalog;
use crate::mysql::MysqlCatalog;
use crate::options::LoadOptions;
use crate::postgres::PostgresCatalog;

const ORACLE_UNSUPPORTED: &str =
    "Oracle catalogs need the native OCI client, which planter does not link";

/// Supported catalog dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Mysql,
}

impl Dialect {
    /// Pick the dialect from the connection string scheme.
    ///
    /// Strings without a scheme are libpq `key=value` strings for PostgreSQL.
    pub fn detect(conn: &str) -> Result<Self> {
        let Some((scheme, _)) = conn.split_once("://") else {
            return Ok(Dialect::Postgres);
        };

        match scheme.to_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" | "mariadb" => Ok(Dialect::Mysql),
            "oracle" | "goracle" => {
                Err(Error::UnsupportedEngine(format!("{scheme} ({ORACLE_UNSUPPORTED})")))
            }
            _ => Err(Error::UnsupportedEngine(scheme.to_string())),
        }
    }

    pub fn engine(self) -> &'static str {
        match self {
            Dialect::Postgres => "postgres",
            Dialect::Mysql => "mysql",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.engine())
    }
}

/// Connect to the database named by `conn` and return its catalog.
pub async fn connect(conn: &str, opts: &LoadOptions) -> Result<Arc<dyn Catalog>> {
    let dialect = Dialect::detect(conn)?;
    tracing::debug!(
        event = "connecting",
        engine = dialect.engine(),
        target = %redact_connection_string(conn)
    );

    let catalog: Arc<dyn Catalog> = match dialect {
        Dialect::Postgres => Arc::new(PostgresCatalog::connect(conn, opts).await?),
        Dialect::Mysql => {
            let conn = match conn.split_once("://") {
                Some((_, rest)) => format!("mysql://{rest}"),
                None => conn.to_string(),
            };
            Arc::new(MysqlCatalog::connect(&conn, opts).await?)
        }
    };
    Ok(catalog)
}

pub(crate) fn connection_error(engine: &str, conn: &str, err: sqlx::Error) -> Error {
    Error::Connection {
        engine: engine.to_string(),
        target: redact_connection_string(conn).redacted,
        message: err.to_string(),
    }
}
