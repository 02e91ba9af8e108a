//! Shared helper functions for CLI commands

use console::{style, StyledObject};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::store::{BatchStatus, SqliteStore};
use crate::core::Config;

/// Load the layered config and apply the `--db` override
pub fn load_config(global: &GlobalOpts) -> Config {
    let mut config = Config::load();
    if let Some(ref db) = global.db {
        config.database = Some(db.clone());
    }
    config
}

/// Open the record store named by the config
pub fn open_store(config: &Config) -> Result<SqliteStore> {
    let path = config.database_path();
    tracing::debug!(path = %path.display(), "opening record store");
    SqliteStore::open(&path)
        .map_err(|e| miette::miette!("Failed to open record store {}: {}", path.display(), e))
}

/// Print a value as JSON or YAML
///
/// Returns false for text formats so the caller can fall through to its
/// human-readable rendering.
pub fn print_structured<T: Serialize>(value: &T, format: OutputFormat) -> Result<bool> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(value).into_diagnostic()?);
            Ok(true)
        }
        OutputFormat::Auto | OutputFormat::Text => Ok(false),
    }
}

/// Color a status label for terminal output
pub fn styled_status(status: BatchStatus) -> StyledObject<&'static str> {
    let label = style(status.label());
    match status {
        BatchStatus::Manufactured => label.yellow(),
        BatchStatus::InTransit => label.cyan(),
        BatchStatus::Delivered => label.green(),
    }
}

/// Display an optional value, "-" when absent
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
