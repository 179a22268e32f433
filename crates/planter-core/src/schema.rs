use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constraints::{ColumnRef, ForeignKey};
use crate::error::LinkError;
use crate::link::{annotate_foreign_key_columns, resolve_with, ResolvedForeignKey, TableIndex};

/// Entity-relationship graph of one schema, produced by a single load.
///
/// Construction validates that every foreign key resolves against the
/// contained tables, so lookups through the graph never dangle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SchemaGraph {
    schema: String,
    tables: Vec<Table>,
    #[serde(skip)]
    #[schemars(skip)]
    index: BTreeMap<String, usize>,
}

impl SchemaGraph {
    /// Link `tables` into a graph and annotate foreign-key columns.
    ///
    /// Every `Column::is_foreign_key` flag is recomputed from the foreign keys
    /// present in `tables`.
    pub fn from_tables(
        schema: impl Into<String>,
        mut tables: Vec<Table>,
    ) -> Result<Self, LinkError> {
        {
            let index = TableIndex::new(&tables)?;
            for table in &tables {
                for fk in &table.foreign_keys {
                    index.resolve(fk)?;
                }
            }
        }
        annotate_foreign_key_columns(&mut tables);

        let index = tables
            .iter()
            .enumerate()
            .map(|(position, table)| (table.name.clone(), position))
            .collect();

        Ok(Self {
            schema: schema.into(),
            tables,
            index,
        })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn into_tables(self) -> Vec<Table> {
        self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.index
            .get(name)
            .and_then(|position| self.tables.get(*position))
    }

    pub fn column(&self, reference: &ColumnRef) -> Option<&Column> {
        self.table(&reference.table)
            .and_then(|table| table.column(&reference.column))
    }

    /// All foreign keys of the graph in table order.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.tables.iter().flat_map(|table| table.foreign_keys.iter())
    }

    pub fn resolve(&self, fk: &ForeignKey) -> Result<ResolvedForeignKey<'_>, LinkError> {
        resolve_with(fk, |name| self.table(name))
    }
}

/// A base table with its columns and outbound foreign keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    pub schema: String,
    pub name: String,
    pub comment: Option<String>,
    /// Columns in catalog ordinal order.
    pub columns: Vec<Column>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            comment: None,
            columns: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }

    pub fn primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|column| column.is_primary_key)
    }

    pub fn non_primary_key_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|column| !column.is_primary_key)
    }
}

/// Column metadata for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    /// 1-based catalog declaration order.
    pub ordinal: i32,
    pub name: String,
    pub comment: Option<String>,
    /// Formatted catalog type (e.g. `bigint`).
    pub data_type: String,
    /// Type as written in DDL (e.g. `bigserial`).
    pub ddl_type: String,
    pub not_null: bool,
    pub is_primary_key: bool,
    /// Set by linking: some foreign key in the graph uses this column as its source.
    pub is_foreign_key: bool,
}
