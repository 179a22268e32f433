//! Core contracts for planter.
//!
//! This crate defines the entity-relationship graph reconstructed from a
//! database catalog, foreign-key linking, relationship classification,
//! table filtering, and the diagram renderers consumed by the CLI.

pub mod cardinality;
pub mod constraints;
pub mod error;
pub mod filter;
pub mod link;
pub mod redaction;
pub mod render;
pub mod schema;

pub use cardinality::Cardinality;
pub use constraints::{ColumnRef, ForeignKey};
pub use error::{Error, LinkError, QueryKind, Result};
pub use filter::filter_tables;
pub use link::{annotate_foreign_key_columns, ResolvedForeignKey, TableIndex};
pub use redaction::{redact_connection_string, RedactedConnection};
pub use render::{render, OutputFormat, RenderOptions};
pub use schema::{Column, SchemaGraph, Table};

/// Strip the tab-delimited annotation suffix from a catalog comment.
///
/// Only the text before the first tab is kept.
pub fn strip_comment_suffix(comment: &str) -> &str {
    match comment.split_once('\t') {
        Some((head, _)) => head,
        None => comment,
    }
}
