//! Diagram output for a loaded schema graph.

mod json;
mod mermaid;
mod plantuml;

pub use json::{DiagramJson, RelationshipJson, to_json};
pub use mermaid::to_mermaid;
pub use plantuml::to_plantuml;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constraints::ForeignKey;
use crate::error::Result;
use crate::schema::SchemaGraph;

/// Diagram language to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// PlantUML entity-relationship diagram
    #[default]
    PlantUml,
    /// Mermaid erDiagram
    Mermaid,
    /// JSON graph for programmatic use
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plantuml" | "puml" | "uml" => Ok(OutputFormat::PlantUml),
            "mermaid" | "mmd" => Ok(OutputFormat::Mermaid),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!(
                "unknown format: {s}. Valid options: plantuml, mermaid, json"
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::PlantUml => write!(f, "plantuml"),
            OutputFormat::Mermaid => write!(f, "mermaid"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl OutputFormat {
    /// Detect format from an output file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "puml" | "pu" | "plantuml" | "uml" => Some(OutputFormat::PlantUml),
            "mmd" | "mermaid" => Some(OutputFormat::Mermaid),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Presentation options shared by all formats.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub title: Option<String>,
}

/// Render `graph` in the requested format.
pub fn render(
    graph: &SchemaGraph,
    format: OutputFormat,
    options: &RenderOptions,
) -> Result<String> {
    match format {
        OutputFormat::PlantUml => to_plantuml(graph, options),
        OutputFormat::Mermaid => to_mermaid(graph, options),
        OutputFormat::Json => to_json(graph),
    }
}

/// The first column pair of every constraint, in table order.
///
/// Diagram formats draw one relation per constraint, not per column pair.
fn constraint_heads(graph: &SchemaGraph) -> Vec<&ForeignKey> {
    let mut seen = std::collections::BTreeSet::new();
    graph
        .foreign_keys()
        .filter(|fk| seen.insert((fk.source_table(), fk.constraint_name.as_str())))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats_and_extensions() {
        assert_eq!("PlantUML".parse::<OutputFormat>(), Ok(OutputFormat::PlantUml));
        assert_eq!("mmd".parse::<OutputFormat>(), Ok(OutputFormat::Mermaid));
        assert!("dot".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::from_extension("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_extension("puml"), Some(OutputFormat::PlantUml));
        assert_eq!(OutputFormat::from_extension("txt"), None);
        assert_eq!(OutputFormat::default().to_string(), "plantuml");
    }

    #[test]
    fn one_relation_per_constraint() {
        let graph = fixtures::shop();
        let heads = constraint_heads(&graph);
        assert_eq!(heads.len(), 3);
    }
}
