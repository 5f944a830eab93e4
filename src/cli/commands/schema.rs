//! Implementation of the `confstore schema` command.

use anyhow::Result;
use clap::Args;

use crate::cli::output::{output, CommandOutput};
use crate::cli::table::{SchemaRow, TableFormatter};
use crate::domain::schema::Schema;

#[derive(Args, Debug)]
pub struct SchemaArgs {}

#[derive(Debug, serde::Serialize)]
pub struct SchemaOutput {
    pub entries: Vec<SchemaRow>,
}

impl From<&Schema> for SchemaOutput {
    fn from(schema: &Schema) -> Self {
        let entries = schema
            .entries()
            .map(|entry| SchemaRow {
                key: entry.key.clone(),
                expected: entry.shape.expected(),
                default: entry.default.as_ref().map(ToString::to_string),
                required: entry.required,
                description: entry.description.clone(),
            })
            .collect();
        Self { entries }
    }
}

impl CommandOutput for SchemaOutput {
    fn to_human(&self) -> String {
        TableFormatter::new().format_schema(&self.entries)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.entries).unwrap_or_default()
    }
}

pub fn execute(_args: SchemaArgs, json_mode: bool) -> Result<()> {
    output(&SchemaOutput::from(&Schema::builtin()), json_mode);
    Ok(())
}
