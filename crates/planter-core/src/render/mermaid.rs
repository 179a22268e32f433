//! Mermaid erDiagram output.

use std::fmt::Write;

use crate::error::{Error, Result};
use crate::render::{constraint_heads, RenderOptions};
use crate::schema::SchemaGraph;

/// Generate a Mermaid erDiagram from a schema graph.
pub fn to_mermaid(graph: &SchemaGraph, options: &RenderOptions) -> Result<String> {
    write_mermaid(graph, options).map_err(|err| Error::Render(err.to_string()))
}

fn write_mermaid(
    graph: &SchemaGraph,
    options: &RenderOptions,
) -> std::result::Result<String, std::fmt::Error> {
    let mut out = String::new();

    if let Some(title) = &options.title {
        writeln!(out, "---")?;
        writeln!(out, "title: {title}")?;
        writeln!(out, "---")?;
    }
    writeln!(out, "erDiagram")?;

    for table in graph.tables() {
        writeln!(out, "    {} {{", escape_id(&table.name))?;
        for column in &table.columns {
            let key = match (column.is_primary_key, column.is_foreign_key) {
                (true, true) => " PK, FK",
                (true, false) => " PK",
                (false, true) => " FK",
                (false, false) => "",
            };
            write!(
                out,
                "        {} {}{}",
                escape_type(&column.data_type),
                escape_id(&column.name),
                key
            )?;
            if let Some(comment) = &column.comment {
                write!(out, " \"{}\"", comment.replace('"', "'"))?;
            }
            out.push('\n');
        }
        writeln!(out, "    }}")?;
    }

    let relations = constraint_heads(graph);
    if !relations.is_empty() {
        out.push('\n');
    }
    for fk in relations {
        let symbol = if graph.cardinality(fk).is_one_to_one() {
            "||--||"
        } else {
            "}o--||"
        };
        writeln!(
            out,
            "    {} {} {} : \"{}\"",
            escape_id(fk.source_table()),
            symbol,
            escape_id(fk.target_table()),
            fk.constraint_name
        )?;
    }

    Ok(out)
}

/// Mermaid identifiers are alphanumeric with underscores.
fn escape_id(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Drop type modifiers such as `(10,2)` and replace spaces.
fn escape_type(s: &str) -> String {
    let base = s.split('(').next().unwrap_or(s).trim();
    escape_id(base)
}
