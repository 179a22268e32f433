//! JSON output of the graph and its classified relationships.

use schemars::JsonSchema;
use serde::Serialize;

use crate::cardinality::Cardinality;
use crate::error::{Error, Result};
use crate::schema::{SchemaGraph, Table};

/// JSON document emitted for a schema graph.
#[derive(Debug, Serialize, JsonSchema)]
pub struct DiagramJson {
    pub schema: String,
    pub tables: Vec<Table>,
    pub relationships: Vec<RelationshipJson>,
}

/// One foreign key column pair with its cardinality.
#[derive(Debug, Serialize, JsonSchema)]
pub struct RelationshipJson {
    pub constraint_name: String,
    pub source_table: String,
    pub source_column: String,
    pub target_table: String,
    pub target_column: String,
    pub cardinality: Cardinality,
}

impl DiagramJson {
    pub fn from_graph(graph: &SchemaGraph) -> Self {
        let relationships = graph
            .foreign_keys()
            .map(|fk| RelationshipJson {
                constraint_name: fk.constraint_name.clone(),
                source_table: fk.source.table.clone(),
                source_column: fk.source.column.clone(),
                target_table: fk.target.table.clone(),
                target_column: fk.target.column.clone(),
                cardinality: graph.cardinality(fk),
            })
            .collect();

        Self {
            schema: graph.schema().to_string(),
            tables: graph.tables().to_vec(),
            relationships,
        }
    }
}

/// Generate pretty-printed JSON for a schema graph.
pub fn to_json(graph: &SchemaGraph) -> Result<String> {
    let mut json = serde_json::to_string_pretty(&DiagramJson::from_graph(graph))
        .map_err(|err| Error::Render(err.to_string()))?;
    json.push('\n');
    Ok(json)
}
