//! PlantUML entity-relationship output.

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::render::{constraint_heads, RenderOptions};
use crate::schema::{Column, SchemaGraph, Table};

/// Generate a PlantUML diagram with one entity per table and one relation
/// per foreign key constraint.
pub fn to_plantuml(graph: &SchemaGraph, options: &RenderOptions) -> Result<String> {
    write_plantuml(graph, options).map_err(|err| Error::Render(err.to_string()))
}

fn write_plantuml(
    graph: &SchemaGraph,
    options: &RenderOptions,
) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();

    writeln!(out, "@startuml")?;
    writeln!(out, "hide circle")?;
    writeln!(out, "skinparam linetype ortho")?;
    if let Some(title) = &options.title {
        writeln!(out, "title {title}")?;
    }

    for table in graph.tables() {
        out.push('\n');
        write_entity(&mut out, table)?;
    }

    let relations = constraint_heads(graph);
    if !relations.is_empty() {
        out.push('\n');
    }
    for fk in relations {
        let symbol = if graph.cardinality(fk).is_one_to_one() {
            "||-||"
        } else {
            "}--"
        };
        writeln!(
            out,
            "{} {} {}",
            entity_ref(fk.source_table()),
            symbol,
            entity_ref(fk.target_table())
        )?;
    }

    writeln!(out, "@enduml")?;
    Ok(out)
}

fn write_entity(out: &mut String, table: &Table) -> std::fmt::Result {
    writeln!(out, "entity {} {{", quoted(&table.name))?;
    if let Some(comment) = &table.comment {
        writeln!(out, "  {comment}")?;
        writeln!(out, "  ..")?;
    }
    for column in table.primary_key_columns() {
        writeln!(out, "  + {} [PK]{}", column.name, comment_suffix(column))?;
    }
    writeln!(out, "  --")?;
    for column in table.non_primary_key_columns() {
        if column.is_foreign_key {
            writeln!(out, "  # {} [FK]{}", column.name, comment_suffix(column))?;
        } else {
            writeln!(out, "  {}{}", column.name, comment_suffix(column))?;
        }
    }
    writeln!(out, "}}")
}

fn comment_suffix(column: &Column) -> String {
    column
        .comment
        .as_deref()
        .map(|comment| format!(" : {comment}"))
        .unwrap_or_default()
}

/// Quote entity names that are not plain identifiers.
fn entity_ref(name: &str) -> String {
    if !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        name.to_string()
    } else {
        quoted(name)
    }
}

/// PlantUML has no escape for `"` inside a quoted name.
fn quoted(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "'"))
}
