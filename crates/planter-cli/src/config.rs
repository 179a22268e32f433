use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use planter_core::OutputFormat;
use planter_introspect::LoadOptions;

pub const DEFAULT_SCHEMA: &str = "public";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Settings read from a `planter.toml` file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub schema: Option<String>,
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    pub format: Option<OutputFormat>,
    pub title: Option<String>,
    pub max_concurrency: Option<usize>,
}

pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Values given on the command line; unset fields fall back to the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub schema: Option<String>,
    pub tables: Vec<String>,
    pub exclude: Vec<String>,
    pub format: Option<OutputFormat>,
    pub title: Option<String>,
    pub max_concurrency: Option<usize>,
    pub output: Option<PathBuf>,
}

/// Effective settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub schema: String,
    pub tables: Vec<String>,
    pub exclude: Vec<String>,
    pub format: OutputFormat,
    pub title: Option<String>,
    pub max_concurrency: usize,
    pub output: Option<PathBuf>,
}

impl Settings {
    /// Command line first, then the config file, then built-in defaults.
    ///
    /// Without an explicit format the output file extension decides.
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Self {
        let format = overrides
            .format
            .or(file.format)
            .or_else(|| {
                overrides
                    .output
                    .as_deref()
                    .and_then(Path::extension)
                    .and_then(|ext| ext.to_str())
                    .and_then(OutputFormat::from_extension)
            })
            .unwrap_or_default();

        Self {
            schema: overrides
                .schema
                .or(file.schema)
                .unwrap_or_else(|| DEFAULT_SCHEMA.to_string()),
            tables: prefer_non_empty(overrides.tables, file.tables),
            exclude: prefer_non_empty(overrides.exclude, file.exclude),
            format,
            title: overrides.title.or(file.title),
            max_concurrency: overrides
                .max_concurrency
                .or(file.max_concurrency)
                .unwrap_or(LoadOptions::DEFAULT_MAX_CONCURRENCY),
            output: overrides.output,
        }
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::default().with_max_concurrency(self.max_concurrency)
    }
}

fn prefer_non_empty(primary: Vec<String>, fallback: Vec<String>) -> Vec<String> {
    if primary.is_empty() {
        fallback
    } else {
        primary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_overrides_or_file() {
        let settings = Settings::resolve(Overrides::default(), FileConfig::default());

        assert_eq!(settings.schema, "public");
        assert!(settings.tables.is_empty());
        assert!(settings.exclude.is_empty());
        assert_eq!(settings.format, OutputFormat::PlantUml);
        assert_eq!(settings.max_concurrency, 16);
        assert_eq!(settings.output, None);
    }

    #[test]
    fn command_line_wins_over_file() {
        let file: FileConfig = toml::from_str(
            r#"
schema = "sales"
tables = ["customer", "customer_order"]
exclude = ["audit_log"]
format = "mermaid"
title = "Sales"
max_concurrency = 4
"#,
        )
        .unwrap();
        let overrides = Overrides {
            schema: Some("billing".to_string()),
            exclude: vec!["invoice_archive".to_string()],
            ..Overrides::default()
        };

        let settings = Settings::resolve(overrides, file);

        assert_eq!(settings.schema, "billing");
        assert_eq!(settings.tables, vec!["customer", "customer_order"]);
        assert_eq!(settings.exclude, vec!["invoice_archive"]);
        assert_eq!(settings.format, OutputFormat::Mermaid);
        assert_eq!(settings.title.as_deref(), Some("Sales"));
        assert_eq!(settings.load_options().max_concurrency, 4);
    }

    #[test]
    fn output_extension_picks_format() {
        let overrides = Overrides {
            output: Some(PathBuf::from("docs/schema.mmd")),
            ..Overrides::default()
        };
        let settings = Settings::resolve(overrides, FileConfig::default());
        assert_eq!(settings.format, OutputFormat::Mermaid);

        let overrides = Overrides {
            output: Some(PathBuf::from("docs/schema.mmd")),
            format: Some(OutputFormat::Json),
            ..Overrides::default()
        };
        let settings = Settings::resolve(overrides, FileConfig::default());
        assert_eq!(settings.format, OutputFormat::Json);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let parsed: Result<FileConfig, _> = toml::from_str("schemas = [\"public\"]");
        assert!(parsed.is_err());
    }

    #[test]
    fn missing_file_reports_path() {
        let err = load_config(Path::new("does/not/exist/planter.toml")).unwrap_err();
        assert!(err.to_string().contains("does/not/exist/planter.toml"));
    }
}
