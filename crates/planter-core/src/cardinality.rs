//! Composite-key detection and foreign-key cardinality.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constraints::ForeignKey;
use crate::link::ResolvedForeignKey;
use crate::schema::{SchemaGraph, Table};

/// Relationship cardinality of a foreign key, seen from the target table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Cardinality {
    OneToOne,
    OneToMany,
}

impl Cardinality {
    pub fn is_one_to_one(self) -> bool {
        matches!(self, Cardinality::OneToOne)
    }
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cardinality::OneToOne => write!(f, "one-to-one"),
            Cardinality::OneToMany => write!(f, "one-to-many"),
        }
    }
}

impl Table {
    /// Whether the primary key spans two or more columns.
    pub fn has_composite_primary_key(&self) -> bool {
        let mut count = 0;
        for _ in self.primary_key_columns() {
            count += 1;
            if count >= 2 {
                return true;
            }
        }
        false
    }
}

impl SchemaGraph {
    /// Classify `fk` as one-to-one or one-to-many.
    ///
    /// Foreign keys that do not resolve against this graph are reported as
    /// one-to-many.
    pub fn cardinality(&self, fk: &ForeignKey) -> Cardinality {
        match self.resolve(fk) {
            Ok(link) => classify(self, &link),
            Err(_) => Cardinality::OneToMany,
        }
    }
}

fn classify(graph: &SchemaGraph, link: &ResolvedForeignKey<'_>) -> Cardinality {
    let source_composite = link.source_table.has_composite_primary_key();
    let target_composite = link.target_table.has_composite_primary_key();

    let one_to_one = match (source_composite, target_composite) {
        (false, false) => link.source_column.is_primary_key && link.target_column.is_primary_key,
        // Every column pair from the source table to the target table must
        // line up key-to-key, the key itself included.
        (true, true) => link
            .source_table
            .foreign_keys
            .iter()
            .filter(|sibling| sibling.target.table == link.target_table.name)
            .all(|sibling| match graph.resolve(sibling) {
                Ok(pair) => pair.source_column.is_primary_key && pair.target_column.is_primary_key,
                Err(_) => false,
            }),
        _ => false,
    };

    if one_to_one {
        Cardinality::OneToOne
    } else {
        Cardinality::OneToMany
    }
}
