pub mod table;

pub use table::TableDisplay;

use crate::error::DisplayError;
use serde_json::Value;
use std::fmt;
use std::io::IsTerminal;
use std::str::FromStr;

/// Output format for payloads printed by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Table,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            other => Err(format!("unknown format '{}', expected json or table", other)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Json => f.write_str("json"),
            OutputFormat::Table => f.write_str("table"),
        }
    }
}

/// Render `value` for stdout. Table colors are only used on a terminal.
pub fn render(value: &Value, format: OutputFormat) -> Result<String, DisplayError> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).map_err(|e| DisplayError::Json(e.to_string()))
        }
        OutputFormat::Table => TableDisplay::new()
            .with_colors(std::io::stdout().is_terminal())
            .render_value(value),
    }
}
