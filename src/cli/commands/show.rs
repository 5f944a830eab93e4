//! Implementation of the `confstore show` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput, MASK};
use crate::cli::table::{SettingRow, TableFormatter};
use crate::cli::LoadArgs;
use crate::domain::models::ConfigDocument;
use crate::domain::schema::Schema;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Configuration file (YAML or JSON)
    pub config: PathBuf,

    /// Print secret values instead of masking them
    #[arg(long)]
    pub reveal_secrets: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct ShowOutput {
    pub settings: Vec<SettingRow>,
}

impl ShowOutput {
    pub fn from_document(doc: &ConfigDocument, schema: &Schema, reveal_secrets: bool) -> Self {
        let settings = doc
            .iter()
            .map(|setting| SettingRow {
                key: setting.key.clone(),
                value: if !reveal_secrets && schema.is_secret(&setting.key) {
                    MASK.to_string()
                } else {
                    setting.value.to_string()
                },
                source: setting.source,
            })
            .collect();
        Self { settings }
    }
}

impl CommandOutput for ShowOutput {
    fn to_human(&self) -> String {
        TableFormatter::new().format_settings(&self.settings)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.settings).unwrap_or_default()
    }
}

pub fn execute(args: ShowArgs, load: &LoadArgs, json_mode: bool) -> Result<()> {
    let loader = load.loader(&args.config);
    let doc = loader
        .load()
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    let output_data = ShowOutput::from_document(&doc, loader.store().schema(), args.reveal_secrets);
    output(&output_data, json_mode);
    Ok(())
}
