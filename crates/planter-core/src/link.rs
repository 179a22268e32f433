//! Resolution of foreign keys against loaded tables.
//!
//! Loading happens in two phases: every table's columns first, then every
//! table's foreign keys. Foreign keys may point at any table of the schema,
//! so they can only be resolved once all columns exist. Marking source
//! columns as foreign-key columns is a separate pass over the whole graph
//! after both phases.

use std::collections::{BTreeSet, HashMap};

use crate::constraints::ForeignKey;
use crate::error::LinkError;
use crate::schema::{Column, Table};

/// The tables and columns a foreign key refers to.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedForeignKey<'a> {
    pub source_table: &'a Table,
    pub source_column: &'a Column,
    pub target_table: &'a Table,
    pub target_column: &'a Column,
}

/// Borrowed name index over a slice of tables.
#[derive(Debug)]
pub struct TableIndex<'a> {
    tables: &'a [Table],
    by_name: HashMap<&'a str, usize>,
}

impl<'a> TableIndex<'a> {
    /// Build the index, rejecting duplicate table or column names.
    pub fn new(tables: &'a [Table]) -> Result<Self, LinkError> {
        let mut by_name = HashMap::with_capacity(tables.len());

        for (position, table) in tables.iter().enumerate() {
            if by_name.insert(table.name.as_str(), position).is_some() {
                return Err(LinkError::DuplicateTable {
                    table: table.name.clone(),
                });
            }

            let mut columns = BTreeSet::new();
            for column in &table.columns {
                if !columns.insert(column.name.as_str()) {
                    return Err(LinkError::DuplicateColumn {
                        table: table.name.clone(),
                        column: column.name.clone(),
                    });
                }
            }
        }

        Ok(Self { tables, by_name })
    }

    pub fn table(&self, name: &str) -> Option<&'a Table> {
        self.by_name
            .get(name)
            .and_then(|position| self.tables.get(*position))
    }

    pub fn resolve(&self, fk: &ForeignKey) -> Result<ResolvedForeignKey<'a>, LinkError> {
        resolve_with(fk, |name| self.table(name))
    }
}

/// Resolve `fk` using `lookup` to find tables by name.
///
/// Checks the target table, then the target column, then the source column.
pub(crate) fn resolve_with<'a>(
    fk: &ForeignKey,
    lookup: impl Fn(&str) -> Option<&'a Table>,
) -> Result<ResolvedForeignKey<'a>, LinkError> {
    let target_table =
        lookup(&fk.target.table).ok_or_else(|| LinkError::MissingTargetTable {
            constraint: fk.constraint_name.clone(),
            table: fk.source.table.clone(),
            target_table: fk.target.table.clone(),
        })?;

    let target_column =
        target_table
            .column(&fk.target.column)
            .ok_or_else(|| LinkError::MissingTargetColumn {
                constraint: fk.constraint_name.clone(),
                table: fk.source.table.clone(),
                target_table: fk.target.table.clone(),
                target_column: fk.target.column.clone(),
            })?;

    let missing_source = || LinkError::MissingSourceColumn {
        constraint: fk.constraint_name.clone(),
        table: fk.source.table.clone(),
        column: fk.source.column.clone(),
    };
    let source_table = lookup(&fk.source.table).ok_or_else(missing_source)?;
    let source_column = source_table
        .column(&fk.source.column)
        .ok_or_else(missing_source)?;

    Ok(ResolvedForeignKey {
        source_table,
        source_column,
        target_table,
        target_column,
    })
}

/// Set `is_foreign_key` on exactly the columns used as a foreign-key source.
pub fn annotate_foreign_key_columns(tables: &mut [Table]) {
    let sources: BTreeSet<(String, String)> = tables
        .iter()
        .flat_map(|table| table.foreign_keys.iter())
        .map(|fk| (fk.source.table.clone(), fk.source.column.clone()))
        .collect();

    for table in tables.iter_mut() {
        for column in table.columns.iter_mut() {
            column.is_foreign_key = sources.contains(&(table.name.clone(), column.name.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ColumnRef;

    fn column(name: &str, is_primary_key: bool) -> Column {
        Column {
            ordinal: 1,
            name: name.to_string(),
            comment: None,
            data_type: "integer".to_string(),
            ddl_type: "integer".to_string(),
            not_null: true,
            is_primary_key,
            is_foreign_key: false,
        }
    }

    fn fk(source: (&str, &str), target: (&str, &str)) -> ForeignKey {
        ForeignKey {
            constraint_name: format!("{}_{}_fkey", source.0, source.1),
            source: ColumnRef::new(source.0, source.1),
            target: ColumnRef::new(target.0, target.1),
            is_source_primary_key: false,
            is_target_primary_key: true,
        }
    }

    fn tables() -> Vec<Table> {
        let mut users = Table::new("public", "users");
        users.columns = vec![column("id", true)];

        let mut orders = Table::new("public", "orders");
        orders.columns = vec![column("id", true), column("user_id", false)];

        vec![users, orders]
    }

    #[test]
    fn resolves_existing_target() {
        let tables = tables();
        let index = TableIndex::new(&tables).unwrap();
        let resolved = index
            .resolve(&fk(("orders", "user_id"), ("users", "id")))
            .unwrap();

        assert_eq!(resolved.source_table.name, "orders");
        assert_eq!(resolved.source_column.name, "user_id");
        assert_eq!(resolved.target_table.name, "users");
        assert_eq!(resolved.target_column.name, "id");
    }

    #[test]
    fn missing_target_table_is_named() {
        let tables = tables();
        let index = TableIndex::new(&tables).unwrap();
        let err = index
            .resolve(&fk(("orders", "user_id"), ("accounts", "id")))
            .unwrap_err();

        assert_eq!(
            err,
            LinkError::MissingTargetTable {
                constraint: "orders_user_id_fkey".to_string(),
                table: "orders".to_string(),
                target_table: "accounts".to_string(),
            }
        );
        assert!(err.to_string().contains("accounts"));
    }

    #[test]
    fn missing_target_column_is_reported() {
        let tables = tables();
        let index = TableIndex::new(&tables).unwrap();
        let err = index
            .resolve(&fk(("orders", "user_id"), ("users", "uuid")))
            .unwrap_err();

        assert!(matches!(
            err,
            LinkError::MissingTargetColumn { ref target_column, .. } if target_column == "uuid"
        ));
    }

    #[test]
    fn missing_source_column_is_reported() {
        let tables = tables();
        let index = TableIndex::new(&tables).unwrap();
        let err = index
            .resolve(&fk(("orders", "customer_id"), ("users", "id")))
            .unwrap_err();

        assert!(matches!(err, LinkError::MissingSourceColumn { .. }));
    }

    #[test]
    fn duplicate_table_names_are_rejected() {
        let tables = vec![Table::new("public", "users"), Table::new("public", "users")];
        let err = TableIndex::new(&tables).unwrap_err();
        assert_eq!(
            err,
            LinkError::DuplicateTable {
                table: "users".to_string()
            }
        );
    }

    #[test]
    fn annotate_marks_only_source_columns() {
        let mut tables = tables();
        tables[1]
            .foreign_keys
            .push(fk(("orders", "user_id"), ("users", "id")));
        tables[0].columns[0].is_foreign_key = true;

        annotate_foreign_key_columns(&mut tables);

        assert!(!tables[0].columns[0].is_foreign_key);
        assert!(!tables[1].columns[0].is_foreign_key);
        assert!(tables[1].columns[1].is_foreign_key);
    }
}
