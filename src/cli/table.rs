//! Table output formatting for CLI commands
//!
//! Renders settings and schema entries with comfy-table. Colors follow
//! `NO_COLOR` and dumb terminals.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use super::output::truncate;
use crate::domain::models::SettingSource;

/// One rendered setting row.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SettingRow {
    pub key: String,
    pub value: String,
    pub source: SettingSource,
}

/// One rendered schema row.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SchemaRow {
    pub key: String,
    pub expected: String,
    pub default: Option<String>,
    pub required: bool,
    pub description: String,
}

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    /// Create a new table formatter
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    /// Create a new table formatter with custom settings
    pub const fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self {
            use_colors,
            max_width,
        }
    }

    /// Format loaded settings as a table
    pub fn format_settings(&self, rows: &[SettingRow]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Key").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
        ]);

        for row in rows {
            let source_cell = if self.use_colors {
                Cell::new(row.source.to_string()).fg(source_color(row.source))
            } else {
                Cell::new(row.source.to_string())
            };
            table.add_row(vec![
                Cell::new(&row.key),
                Cell::new(truncate(&row.value, 80)),
                source_cell,
            ]);
        }

        table.to_string()
    }

    /// Format the schema table
    pub fn format_schema(&self, rows: &[SchemaRow]) -> String {
        let mut table = self.create_base_table();

        table.set_header(vec![
            Cell::new("Key").add_attribute(Attribute::Bold),
            Cell::new("Expects").add_attribute(Attribute::Bold),
            Cell::new("Default").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
        ]);

        for row in rows {
            let default = match (&row.default, row.required) {
                (_, true) => "(required)".to_string(),
                (Some(value), false) => truncate(value, 40),
                (None, false) => "-".to_string(),
            };
            table.add_row(vec![
                Cell::new(&row.key),
                Cell::new(&row.expected),
                Cell::new(default),
                Cell::new(&row.description),
            ]);
        }

        table.to_string()
    }

    fn create_base_table(&self) -> Table {
        let mut table = Table::new();

        // Use UTF-8 preset for nice borders
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        if let Some(width) = self.max_width {
            table.set_width(width);
        }

        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn supports_color() -> bool {
    // Respect NO_COLOR environment variable
    if env::var("NO_COLOR").is_ok() {
        return false;
    }

    // Check for dumb terminal
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    true
}

const fn source_color(source: SettingSource) -> Color {
    match source {
        SettingSource::Default => Color::DarkGrey,
        SettingSource::Document => Color::Reset,
        SettingSource::Override => Color::Yellow,
        SettingSource::Environment => Color::Cyan,
    }
}
