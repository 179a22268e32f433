use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Name-based reference to a column of a table in the same graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ColumnRef {
    pub table: String,
    pub column: String,
}

impl ColumnRef {
    pub fn new(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
        }
    }
}

/// One column pair of a foreign key constraint.
///
/// Multi-column constraints are stored as one `ForeignKey` per column pair
/// sharing the same `constraint_name`. Source and target are resolved by
/// name through [`crate::SchemaGraph`]; entities hold no references to each
/// other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ForeignKey {
    pub constraint_name: String,
    pub source: ColumnRef,
    pub target: ColumnRef,
    /// Catalog-reported: the source column is part of the source table's key.
    pub is_source_primary_key: bool,
    /// Catalog-reported: the target column is part of the target table's key.
    pub is_target_primary_key: bool,
}

impl ForeignKey {
    pub fn source_table(&self) -> &str {
        &self.source.table
    }

    pub fn target_table(&self) -> &str {
        &self.target.table
    }
}
