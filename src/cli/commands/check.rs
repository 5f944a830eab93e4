//! Implementation of the `confstore check` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::cli::LoadArgs;
use crate::domain::models::{ConfigDocument, SettingSource};
use crate::domain::schema::Schema;
use crate::services::Strictness;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Configuration file (YAML or JSON)
    pub config: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct CheckOutput {
    pub success: bool,
    pub path: PathBuf,
    pub strictness: Strictness,
    pub settings: usize,
    pub defaulted: usize,
    pub overridden: Vec<String>,
    pub passthrough: Vec<String>,
}

impl CheckOutput {
    pub fn from_document(
        path: PathBuf,
        strictness: Strictness,
        doc: &ConfigDocument,
        schema: &Schema,
    ) -> Self {
        let mut defaulted = 0;
        let mut overridden = Vec::new();

        for setting in doc.iter() {
            match setting.source {
                SettingSource::Default => defaulted += 1,
                SettingSource::Override | SettingSource::Environment => {
                    overridden.push(setting.key.clone());
                }
                SettingSource::Document => {}
            }
        }
        let passthrough = doc.passthrough(schema).map(|s| s.key.clone()).collect();

        Self {
            success: true,
            path,
            strictness,
            settings: doc.len(),
            defaulted,
            overridden,
            passthrough,
        }
    }
}

impl CommandOutput for CheckOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "{} is valid ({} settings, {} from defaults, {} mode)",
            self.path.display(),
            self.settings,
            self.defaulted,
            self.strictness
        )];
        if !self.overridden.is_empty() {
            lines.push(format!("\nOverridden: {}", self.overridden.join(", ")));
        }
        if !self.passthrough.is_empty() {
            lines.push("\nUnrecognized settings kept as-is:".to_string());
            for key in &self.passthrough {
                lines.push(format!("  - {key}"));
            }
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: CheckArgs, load: &LoadArgs, json_mode: bool) -> Result<()> {
    let loader = load.loader(&args.config);
    let doc = loader
        .load()
        .with_context(|| format!("Configuration {} is invalid", args.config.display()))?;

    let output_data = CheckOutput::from_document(
        args.config,
        load.strictness(),
        &doc,
        loader.store().schema(),
    );
    output(&output_data, json_mode);
    Ok(())
}
