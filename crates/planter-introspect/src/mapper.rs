use planter_core::{strip_comment_suffix, Column, ColumnRef, ForeignKey, Table};

use crate::catalog::{RawColumn, RawForeignKey, RawTable};

pub fn map_tables(schema: &str, raw: Vec<RawTable>) -> Vec<Table> {
    raw.into_iter()
        .map(|table| Table {
            comment: table.comment,
            ..Table::new(schema, table.name)
        })
        .collect()
}

pub fn map_columns(raw: Vec<RawColumn>) -> Vec<Column> {
    raw.into_iter()
        .map(|col| Column {
            ordinal: col.ordinal,
            name: col.name,
            comment: col.comment.as_deref().and_then(clean_comment),
            data_type: col.data_type,
            ddl_type: col.ddl_type,
            not_null: col.not_null,
            is_primary_key: col.is_primary_key,
            is_foreign_key: false,
        })
        .collect()
}

pub fn map_foreign_keys(table: &str, raw: Vec<RawForeignKey>) -> Vec<ForeignKey> {
    raw.into_iter()
        .map(|fk| ForeignKey {
            constraint_name: fk.constraint_name,
            source: ColumnRef::new(table, fk.source_column),
            target: ColumnRef::new(fk.target_table, fk.target_column),
            is_source_primary_key: fk.is_source_primary_key,
            is_target_primary_key: fk.is_target_primary_key,
        })
        .collect()
}

/// Strip the annotation suffix; nothing left means no comment.
fn clean_comment(comment: &str) -> Option<String> {
    let comment = strip_comment_suffix(comment);
    (!comment.is_empty()).then(|| comment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_column(comment: Option<&str>) -> RawColumn {
        RawColumn {
            ordinal: 2,
            name: "name".to_string(),
            comment: comment.map(str::to_string),
            data_type: "text".to_string(),
            not_null: true,
            is_primary_key: false,
            ddl_type: "text".to_string(),
        }
    }

    #[test]
    fn strips_comment_annotations() {
        let columns = map_columns(vec![
            raw_column(Some("Customer Name\tINTERNAL")),
            raw_column(Some("Customer Name")),
            raw_column(Some("\tINTERNAL")),
            raw_column(None),
        ]);

        assert_eq!(columns[0].comment.as_deref(), Some("Customer Name"));
        assert_eq!(columns[1].comment.as_deref(), Some("Customer Name"));
        assert_eq!(columns[2].comment, None);
        assert_eq!(columns[3].comment, None);
        assert!(columns.iter().all(|col| !col.is_foreign_key));
    }

    #[test]
    fn foreign_keys_are_owned_by_the_loaded_table() {
        let fks = map_foreign_keys(
            "order_detail",
            vec![RawForeignKey {
                source_column: "sku_id".to_string(),
                target_table: "sku".to_string(),
                target_column: "id".to_string(),
                constraint_name: "order_detail_sku_id_fkey".to_string(),
                is_target_primary_key: true,
                is_source_primary_key: false,
            }],
        );

        assert_eq!(fks[0].source, ColumnRef::new("order_detail", "sku_id"));
        assert_eq!(fks[0].target, ColumnRef::new("sku", "id"));
        assert!(fks[0].is_target_primary_key);
        assert!(!fks[0].is_source_primary_key);
    }

    #[test]
    fn tables_start_empty() {
        let tables = map_tables(
            "public",
            vec![RawTable {
                name: "customer".to_string(),
                comment: Some("Customers".to_string()),
            }],
        );

        assert_eq!(tables[0].schema, "public");
        assert_eq!(tables[0].comment.as_deref(), Some("Customers"));
        assert!(tables[0].columns.is_empty());
        assert!(tables[0].foreign_keys.is_empty());
    }
}
