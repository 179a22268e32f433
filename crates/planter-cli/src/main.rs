mod config;
mod logging;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::{ArgAction, Parser};
use planter_core::{
    filter_tables, redact_connection_string, render, Error as CoreError, OutputFormat,
    RenderOptions, SchemaGraph,
};
use planter_introspect::introspect;
use thiserror::Error;

use config::{load_config, ConfigError, FileConfig, Overrides, Settings};
use logging::{init_logging, LogFormat};
use output::write_output;

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to write {target}: {source}")]
    Output {
        target: String,
        source: std::io::Error,
    },
    #[error("logging error: {0}")]
    Logging(String),
}

#[derive(Parser, Debug)]
#[command(
    name = "planter",
    version,
    about = "Generate entity-relationship diagrams from a live database schema"
)]
struct Cli {
    /// Database connection string, e.g. postgres://user@localhost/db.
    #[arg(value_name = "CONNECTION_STRING")]
    conn: String,
    /// Schema to introspect [default: public].
    #[arg(short, long)]
    schema: Option<String>,
    /// Output file; the diagram goes to stdout when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Only draw this table (repeatable).
    #[arg(short = 't', long = "table", value_name = "TABLE")]
    tables: Vec<String>,
    /// Leave this table out (repeatable).
    #[arg(short = 'x', long = "exclude", value_name = "TABLE")]
    exclude: Vec<String>,
    /// Diagram format: plantuml, mermaid or json.
    #[arg(short, long)]
    format: Option<OutputFormat>,
    /// Diagram title.
    #[arg(long)]
    title: Option<String>,
    /// Maximum tables whose columns load at once [default: 16].
    #[arg(long)]
    max_concurrency: Option<usize>,
    /// TOML config file.
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
    /// Log line format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            schema: self.schema.clone(),
            tables: self.tables.clone(),
            exclude: self.exclude.clone(),
            format: self.format,
            title: self.title.clone(),
            max_concurrency: self.max_concurrency,
            output: self.output.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match init_logging(cli.verbose, cli.log_format) {
        Ok(()) => run(cli).await,
        Err(message) => Err(CliError::Logging(message)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let file = match &cli.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(cli.overrides(), file);
    let started = Instant::now();

    tracing::info!(
        event = "run_started",
        target = %redact_connection_string(&cli.conn),
        schema = %settings.schema,
        format = %settings.format
    );

    let graph = introspect(&cli.conn, &settings.schema, &settings.load_options()).await?;
    tracing::info!(
        event = "schema_loaded",
        tables = graph.len(),
        foreign_keys = graph.foreign_keys().count()
    );

    let graph = apply_filters(graph, &settings)?;
    let diagram = render(
        &graph,
        settings.format,
        &RenderOptions {
            title: settings.title.clone(),
        },
    )?;

    write_output(settings.output.as_deref(), diagram.as_bytes()).map_err(|source| {
        CliError::Output {
            target: settings
                .output
                .as_ref()
                .map_or_else(|| "stdout".to_string(), |path| path.display().to_string()),
            source,
        }
    })?;

    tracing::info!(
        event = "run_finished",
        tables = graph.len(),
        duration_ms = started.elapsed().as_millis() as u64
    );
    Ok(())
}

/// Include pass first, then exclude pass.
fn apply_filters(graph: SchemaGraph, settings: &Settings) -> Result<SchemaGraph, CoreError> {
    let before = graph.len();
    let graph = filter_tables(graph, &settings.tables, true)?;
    let graph = filter_tables(graph, &settings.exclude, false)?;

    if graph.len() != before {
        tracing::info!(
            event = "graph_filtered",
            before,
            after = graph.len(),
            include = settings.tables.len(),
            exclude = settings.exclude.len()
        );
    }
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use planter_core::{Column, Table};

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_repeatable_filters_and_format() {
        let cli = Cli::try_parse_from([
            "planter",
            "postgres://planter@localhost/planter",
            "-s",
            "sales",
            "-t",
            "customer",
            "--table",
            "customer_order",
            "-x",
            "audit_log",
            "-f",
            "mermaid",
            "-vv",
        ])
        .unwrap();

        assert_eq!(cli.conn, "postgres://planter@localhost/planter");
        assert_eq!(cli.schema.as_deref(), Some("sales"));
        assert_eq!(cli.tables, vec!["customer", "customer_order"]);
        assert_eq!(cli.exclude, vec!["audit_log"]);
        assert_eq!(cli.format, Some(OutputFormat::Mermaid));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn connection_string_is_required() {
        assert!(Cli::try_parse_from(["planter"]).is_err());
    }

    #[test]
    fn unknown_format_is_rejected() {
        let parsed = Cli::try_parse_from(["planter", "postgres://localhost/db", "-f", "dot"]);
        assert!(parsed.is_err());
    }

    fn table(name: &str) -> Table {
        let mut table = Table::new("public", name);
        table.columns = vec![Column {
            ordinal: 1,
            name: "id".to_string(),
            comment: None,
            data_type: "integer".to_string(),
            ddl_type: "integer".to_string(),
            not_null: true,
            is_primary_key: true,
            is_foreign_key: false,
        }];
        table
    }

    #[test]
    fn filters_apply_include_then_exclude() {
        let graph = SchemaGraph::from_tables(
            "public",
            vec![table("customer"), table("customer_order"), table("audit_log")],
        )
        .unwrap();
        let settings = Settings::resolve(
            Overrides {
                tables: vec!["customer".to_string(), "customer_order".to_string()],
                exclude: vec!["customer_order".to_string()],
                ..Overrides::default()
            },
            FileConfig::default(),
        );

        let filtered = apply_filters(graph, &settings).unwrap();

        let names: Vec<_> = filtered.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["customer"]);
    }
}
