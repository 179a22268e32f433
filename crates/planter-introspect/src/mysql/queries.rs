use sqlx::MySqlPool;

use planter_core::{Error, QueryKind, Result};

use crate::catalog::{qualified, sqlx_error, RawColumn, RawForeignKey, RawTable};

// information_schema columns are cast to CHAR / SIGNED so they decode the
// same way on MySQL 5.7, 8.x and MariaDB.

pub const TABLES: &str = r#"
select
  cast(t.TABLE_NAME as char) as table_name,
  cast(nullif(t.TABLE_COMMENT, '') as char) as description
from information_schema.TABLES t
where t.TABLE_SCHEMA = ?
  and t.TABLE_TYPE = 'BASE TABLE'
order by t.TABLE_NAME
"#;

pub const COLUMNS: &str = r#"
select
  cast(c.ORDINAL_POSITION as signed) as field_ordinal,
  cast(c.COLUMN_NAME as char) as column_name,
  cast(nullif(c.COLUMN_COMMENT, '') as char) as description,
  cast(c.COLUMN_TYPE as char) as data_type,
  cast(c.IS_NULLABLE = 'NO' as signed) as not_null,
  cast(c.COLUMN_KEY in ('PRI', 'UNI') as signed) as is_primary_key,
  cast(
    case
      when c.EXTRA like '%auto_increment%' then concat(c.COLUMN_TYPE, ' auto_increment')
      else c.COLUMN_TYPE
    end as char
  ) as ddl_type
from information_schema.COLUMNS c
where c.TABLE_SCHEMA = ?
  and c.TABLE_NAME = ?
order by c.ORDINAL_POSITION
"#;

pub const FOREIGN_KEYS: &str = r#"
select
  cast(k.COLUMN_NAME as char) as source_column,
  cast(k.REFERENCED_TABLE_NAME as char) as target_table,
  cast(k.REFERENCED_COLUMN_NAME as char) as target_column,
  cast(k.CONSTRAINT_NAME as char) as constraint_name,
  cast(exists (
    select 1
    from information_schema.KEY_COLUMN_USAGE p
    where p.TABLE_SCHEMA = k.REFERENCED_TABLE_SCHEMA
      and p.TABLE_NAME = k.REFERENCED_TABLE_NAME
      and p.COLUMN_NAME = k.REFERENCED_COLUMN_NAME
      and p.CONSTRAINT_NAME = 'PRIMARY'
  ) as signed) as is_target_pk,
  cast(exists (
    select 1
    from information_schema.KEY_COLUMN_USAGE p
    where p.TABLE_SCHEMA = k.TABLE_SCHEMA
      and p.TABLE_NAME = k.TABLE_NAME
      and p.COLUMN_NAME = k.COLUMN_NAME
      and p.CONSTRAINT_NAME = 'PRIMARY'
  ) as signed) as is_source_pk
from information_schema.KEY_COLUMN_USAGE k
where k.TABLE_SCHEMA = ?
  and k.TABLE_NAME = ?
  and k.REFERENCED_TABLE_NAME is not null
order by k.CONSTRAINT_NAME, k.ORDINAL_POSITION
"#;

pub async fn list_tables(pool: &MySqlPool, schema: &str) -> Result<Vec<RawTable>> {
    let rows = sqlx::query_as::<_, (String, Option<String>)>(TABLES)
        .bind(schema)
        .fetch_all(pool)
        .await
        .map_err(|err| sqlx_error(QueryKind::Tables, schema, TABLES, err))?;

    Ok(rows
        .into_iter()
        .map(|(name, comment)| RawTable { name, comment })
        .collect())
}

pub async fn list_columns(pool: &MySqlPool, schema: &str, table: &str) -> Result<Vec<RawColumn>> {
    let target = qualified(schema, table);
    let rows = sqlx::query_as::<_, (i64, String, Option<String>, String, i64, i64, String)>(
        COLUMNS,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|err| sqlx_error(QueryKind::Columns, &target, COLUMNS, err))?;

    rows.into_iter()
        .map(
            |(ordinal, name, comment, data_type, not_null, is_primary_key, ddl_type)| {
                let ordinal = i32::try_from(ordinal).map_err(|err| Error::Scan {
                    kind: QueryKind::Columns,
                    target: target.clone(),
                    message: format!("ordinal {ordinal} of column {name}: {err}"),
                })?;
                Ok(RawColumn {
                    ordinal,
                    name,
                    comment,
                    data_type,
                    not_null: not_null != 0,
                    is_primary_key: is_primary_key != 0,
                    ddl_type,
                })
            },
        )
        .collect()
}

pub async fn list_foreign_keys(
    pool: &MySqlPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawForeignKey>> {
    let rows = sqlx::query_as::<_, (String, String, String, String, i64, i64)>(FOREIGN_KEYS)
        .bind(schema)
        .bind(table)
        .fetch_all(pool)
        .await
        .map_err(|err| {
            sqlx_error(
                QueryKind::ForeignKeys,
                &qualified(schema, table),
                FOREIGN_KEYS,
                err,
            )
        })?;

    Ok(rows
        .into_iter()
        .map(
            |(
                source_column,
                target_table,
                target_column,
                constraint_name,
                is_target_pk,
                is_source_pk,
            )| RawForeignKey {
                source_column,
                target_table,
                target_column,
                constraint_name,
                is_target_primary_key: is_target_pk != 0,
                is_source_primary_key: is_source_pk != 0,
            },
        )
        .collect())
}
