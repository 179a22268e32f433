use sqlx::PgPool;

use planter_core::{QueryKind, Result};

use crate::catalog::{qualified, sqlx_error, RawColumn, RawForeignKey, RawTable};

pub const TABLES: &str = r#"
select
  c.relname::text as table_name,
  pd.description as description
from pg_catalog.pg_class c
join pg_catalog.pg_namespace n on n.oid = c.relnamespace
left join pg_catalog.pg_description pd
  on pd.objoid = c.oid
  and pd.classoid = 'pg_catalog.pg_class'::regclass
  and pd.objsubid = 0
where n.nspname = $1
  and c.relkind = 'r'
order by c.relname
"#;

/// A column counts as a key column when it belongs to a primary key or
/// unique constraint. Integer columns defaulting to their owned sequence
/// report the serial pseudo-type as DDL type.
pub const COLUMNS: &str = r#"
select
  a.attnum::int4 as field_ordinal,
  a.attname::text as column_name,
  pd.description as description,
  pg_catalog.format_type(a.atttypid, a.atttypmod) as data_type,
  a.attnotnull as not_null,
  exists (
    select 1
    from pg_catalog.pg_constraint ct
    where ct.conrelid = a.attrelid
      and ct.contype in ('p', 'u')
      and a.attnum = any(ct.conkey)
  ) as is_primary_key,
  case
    when a.atttypid in ('int2'::regtype, 'int4'::regtype, 'int8'::regtype)
      and pg_catalog.pg_get_expr(ad.adbin, ad.adrelid) = 'nextval('''
        || pg_catalog.pg_get_serial_sequence(
             quote_ident(n.nspname) || '.' || quote_ident(c.relname), a.attname
           )::regclass::text
        || '''::regclass)'
    then case a.atttypid
      when 'int4'::regtype then 'serial'
      when 'int8'::regtype then 'bigserial'
      else 'smallserial'
    end
    else pg_catalog.format_type(a.atttypid, a.atttypmod)
  end as ddl_type
from pg_catalog.pg_attribute a
join pg_catalog.pg_class c on c.oid = a.attrelid
join pg_catalog.pg_namespace n on n.oid = c.relnamespace
left join pg_catalog.pg_attrdef ad on ad.adrelid = a.attrelid and ad.adnum = a.attnum
left join pg_catalog.pg_description pd
  on pd.objoid = a.attrelid
  and pd.classoid = 'pg_catalog.pg_class'::regclass
  and pd.objsubid = a.attnum
where n.nspname = $1
  and c.relname = $2
  and a.attnum > 0
  and not a.attisdropped
order by a.attnum
"#;

pub const FOREIGN_KEYS: &str = r#"
select
  src.attname::text as source_column,
  tgt_class.relname::text as target_table,
  tgt.attname::text as target_column,
  con.conname::text as constraint_name,
  exists (
    select 1
    from pg_catalog.pg_constraint pk
    where pk.conrelid = con.confrelid
      and pk.contype = 'p'
      and tgt.attnum = any(pk.conkey)
  ) as is_target_pk,
  exists (
    select 1
    from pg_catalog.pg_constraint pk
    where pk.conrelid = con.conrelid
      and pk.contype = 'p'
      and src.attnum = any(pk.conkey)
  ) as is_source_pk
from pg_catalog.pg_constraint con
join pg_catalog.pg_class cl on cl.oid = con.conrelid
join pg_catalog.pg_namespace ns on ns.oid = cl.relnamespace
cross join lateral unnest(con.conkey, con.confkey)
  with ordinality as k(source_attnum, target_attnum, position)
join pg_catalog.pg_attribute src
  on src.attrelid = con.conrelid and src.attnum = k.source_attnum
join pg_catalog.pg_attribute tgt
  on tgt.attrelid = con.confrelid and tgt.attnum = k.target_attnum
join pg_catalog.pg_class tgt_class on tgt_class.oid = con.confrelid
where ns.nspname = $1
  and cl.relname = $2
  and con.contype = 'f'
order by con.conname, k.position
"#;

pub async fn list_tables(pool: &PgPool, schema: &str) -> Result<Vec<RawTable>> {
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

pub async fn list_columns(pool: &PgPool, schema: &str, table: &str) -> Result<Vec<RawColumn>> {
    let rows = sqlx::query_as::<_, (i32, String, Option<String>, String, bool, bool, String)>(
        COLUMNS,
    )
    .bind(schema)
    .bind(table)
    .fetch_all(pool)
    .await
    .map_err(|err| sqlx_error(QueryKind::Columns, &qualified(schema, table), COLUMNS, err))?;

    Ok(rows
        .into_iter()
        .map(
            |(ordinal, name, comment, data_type, not_null, is_primary_key, ddl_type)| RawColumn {
                ordinal,
                name,
                comment,
                data_type,
                not_null,
                is_primary_key,
                ddl_type,
            },
        )
        .collect())
}

pub async fn list_foreign_keys(
    pool: &PgPool,
    schema: &str,
    table: &str,
) -> Result<Vec<RawForeignKey>> {
    let rows = sqlx::query_as::<_, (String, String, String, String, bool, bool)>(FOREIGN_KEYS)
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
                is_target_primary_key,
                is_source_primary_key,
            )| RawForeignKey {
                source_column,
                target_table,
                target_column,
                constraint_name,
                is_target_primary_key,
                is_source_primary_key,
            },
        )
        .collect())
}
