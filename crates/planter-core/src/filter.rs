use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::SchemaGraph;

/// Keep the tables whose membership in `names` equals `keep_if_matches`.
///
/// Names are compared exactly and case-sensitively; they are not patterns.
/// Foreign keys of retained tables that point at a dropped table are removed.
/// An empty `names` list returns the graph unchanged.
pub fn filter_tables(
    graph: SchemaGraph,
    names: &[String],
    keep_if_matches: bool,
) -> Result<SchemaGraph> {
    if names.is_empty() {
        return Ok(graph);
    }

    let names: BTreeSet<&str> = names.iter().map(String::as_str).collect();
    let keep = |name: &str| names.contains(name) == keep_if_matches;

    let schema = graph.schema().to_string();
    let tables = graph
        .into_tables()
        .into_iter()
        .filter(|table| keep(&table.name))
        .map(|mut table| {
            table.foreign_keys.retain(|fk| keep(fk.target_table()));
            table
        })
        .collect();

    SchemaGraph::from_tables(schema, tables).map_err(|err| Error::Filter(err.to_string()))
}
