//! Two-phase schema loading.
//!
//! Phase one lists the tables and loads every table's columns, fanned out
//! over a bounded set of tasks. Phase two starts only after all of those
//! tasks have finished and loads foreign keys table by table, resolving each
//! one against the complete set of loaded columns. The graph is then built,
//! which marks foreign-key source columns.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use planter_core::{Column, Error, ForeignKey, Result, SchemaGraph, Table, TableIndex};

use crate::catalog::Catalog;
use crate::mapper;
use crate::options::LoadOptions;

/// Load the columns of `schema.table` in ordinal order.
pub async fn load_columns(
    catalog: &dyn Catalog,
    schema: &str,
    table: &str,
) -> Result<Vec<Column>> {
    let raw = catalog.list_columns(schema, table).await?;
    let columns = mapper::map_columns(raw);
    tracing::trace!(
        event = "columns_loaded",
        schema,
        table,
        count = columns.len()
    );
    Ok(columns)
}

/// Load the outbound foreign keys of `schema.table` and resolve each one
/// against `tables`.
pub async fn load_foreign_keys(
    catalog: &dyn Catalog,
    schema: &str,
    table: &str,
    tables: &TableIndex<'_>,
) -> Result<Vec<ForeignKey>> {
    let raw = catalog.list_foreign_keys(schema, table).await?;
    let foreign_keys = mapper::map_foreign_keys(table, raw);
    for fk in &foreign_keys {
        tables.resolve(fk)?;
    }
    tracing::trace!(
        event = "foreign_keys_loaded",
        schema,
        table,
        count = foreign_keys.len()
    );
    Ok(foreign_keys)
}

/// Load every table of `schema` with its columns and linked foreign keys.
///
/// The first error from either phase aborts the load; no partial graph is
/// returned.
pub async fn load_schema(
    catalog: Arc<dyn Catalog>,
    schema: &str,
    opts: &LoadOptions,
) -> Result<SchemaGraph> {
    let raw = catalog.list_tables(schema).await?;
    let mut tables = mapper::map_tables(schema, raw);
    tracing::debug!(
        event = "tables_listed",
        engine = catalog.engine(),
        schema,
        count = tables.len()
    );

    load_all_columns(&catalog, schema, &mut tables, opts).await?;
    tracing::debug!(event = "columns_phase_finished", schema);

    let mut foreign_keys = Vec::with_capacity(tables.len());
    {
        let index = TableIndex::new(&tables)?;
        for table in &tables {
            foreign_keys
                .push(load_foreign_keys(catalog.as_ref(), schema, &table.name, &index).await?);
        }
    }
    for (table, fks) in tables.iter_mut().zip(foreign_keys) {
        table.foreign_keys = fks;
    }

    let graph = SchemaGraph::from_tables(schema, tables)?;
    tracing::debug!(
        event = "foreign_keys_linked",
        schema,
        count = graph.foreign_keys().count()
    );
    Ok(graph)
}

/// Phase one: at most `opts.concurrency()` column loads in flight.
///
/// On the first failure the remaining tasks are aborted and every task is
/// joined before the error is returned.
async fn load_all_columns(
    catalog: &Arc<dyn Catalog>,
    schema: &str,
    tables: &mut [Table],
    opts: &LoadOptions,
) -> Result<()> {
    let permits = Arc::new(Semaphore::new(opts.concurrency()));
    let mut tasks = JoinSet::new();

    for (position, table) in tables.iter().enumerate() {
        let catalog = Arc::clone(catalog);
        let permits = Arc::clone(&permits);
        let schema = schema.to_string();
        let name = table.name.clone();

        tasks.spawn(async move {
            let columns = match permits.acquire_owned().await {
                Ok(_permit) => load_columns(catalog.as_ref(), &schema, &name).await,
                Err(err) => Err(Error::Task(err.to_string())),
            };
            (position, columns)
        });
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let err = match joined {
            Ok((position, Ok(columns))) => {
                tables[position].columns = columns;
                continue;
            }
            Ok((_, Err(err))) => err,
            Err(join_err) if join_err.is_cancelled() => continue,
            Err(join_err) => Error::Task(join_err.to_string()),
        };
        if first_error.is_none() {
            tasks.abort_all();
            first_error = Some(err);
        }
    }

    match first_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
