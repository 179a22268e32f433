use std::{env, fs};

use anyhow::{anyhow, Context, Result};
use planter_core::{filter_tables, Cardinality};
use planter_introspect::{load_schema, LoadOptions, PostgresCatalog};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

const FIXTURE_PATH: &str = "fixtures/sql/postgres/001_schema.sql";
const SCHEMA: &str = "planter_fixture";

fn database_url() -> Option<String> {
    env::var("TEST_DATABASE_URL")
        .or_else(|_| env::var("DATABASE_URL"))
        .ok()
}

async fn run_fixture(pool: &PgPool) -> Result<()> {
    let script = fs::read_to_string(FIXTURE_PATH)
        .with_context(|| format!("reading fixture {FIXTURE_PATH}"))?;

    for statement in script.split(';') {
        let sql = statement.trim();
        if sql.is_empty() {
            continue;
        }

        sqlx::query(sql)
            .execute(pool)
            .await
            .with_context(|| format!("executing fixture statement: {sql}"))?;
    }

    Ok(())
}

#[tokio::test]
async fn loads_fixture_schema() -> Result<()> {
    let Some(db_url) = database_url() else {
        eprintln!("skipping: set TEST_DATABASE_URL or DATABASE_URL for integration tests");
        return Ok(());
    };

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(&db_url)
        .await
        .context("connecting to Postgres")?;
    run_fixture(&pool).await?;

    let catalog = Arc::new(PostgresCatalog::new(pool));
    let graph = load_schema(catalog, SCHEMA, &LoadOptions::default()).await?;

    let names: Vec<&str> = graph.tables().iter().map(|table| table.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "customer",
            "customer_order",
            "order_detail",
            "shipment",
            "shipment_item",
            "sku"
        ]
    );

    let customer = graph
        .table("customer")
        .ok_or_else(|| anyhow!("customer table missing"))?;
    assert_eq!(customer.comment.as_deref(), Some("Customers"));

    let id = customer.column("id").ok_or_else(|| anyhow!("id missing"))?;
    assert_eq!(id.ordinal, 1);
    assert_eq!(id.data_type, "bigint");
    assert_eq!(id.ddl_type, "bigserial");
    assert!(id.not_null);
    assert!(id.is_primary_key);

    let name = customer.column("name").ok_or_else(|| anyhow!("name missing"))?;
    assert_eq!(name.comment.as_deref(), Some("Customer Name"));
    assert_eq!(name.ddl_type, "text");
    assert!(!name.is_primary_key);

    let zip = customer.column("zip_code").ok_or_else(|| anyhow!("zip_code missing"))?;
    assert_eq!(zip.comment.as_deref(), Some("Customer Zip Code"));

    let detail = graph
        .table("order_detail")
        .ok_or_else(|| anyhow!("order_detail table missing"))?;
    let constraints: Vec<&str> = detail
        .foreign_keys
        .iter()
        .map(|fk| fk.constraint_name.as_str())
        .collect();
    assert_eq!(
        constraints,
        vec!["order_detail_customer_order_id_fkey", "order_detail_sku_id_fkey"]
    );
    assert!(detail.foreign_keys[0].is_source_primary_key);
    assert!(detail.foreign_keys[0].is_target_primary_key);
    assert!(!detail.foreign_keys[1].is_source_primary_key);
    assert!(detail.column("sku_id").is_some_and(|col| col.is_foreign_key));

    assert_eq!(graph.cardinality(&detail.foreign_keys[0]), Cardinality::OneToOne);
    assert_eq!(graph.cardinality(&detail.foreign_keys[1]), Cardinality::OneToMany);

    let item = graph
        .table("shipment_item")
        .ok_or_else(|| anyhow!("shipment_item table missing"))?;
    assert_eq!(item.foreign_keys.len(), 2);
    assert!(item.has_composite_primary_key());
    for fk in &item.foreign_keys {
        assert_eq!(graph.cardinality(fk), Cardinality::OneToOne);
    }

    let filtered = filter_tables(graph, &["order_detail".to_string(), "sku".to_string()], true)?;
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered.foreign_keys().count(), 1);

    Ok(())
}
