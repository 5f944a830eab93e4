//! Implementation of the `confstore export` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::LoadArgs;
use crate::domain::models::ConfigDocument;
use crate::services::SourceFormat;

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Configuration file (YAML or JSON)
    pub config: PathBuf,

    /// Output format: yaml or json
    #[arg(long, default_value = "yaml")]
    pub format: SourceFormat,

    /// Write to this file instead of stdout
    #[arg(long, short, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Serialize the resolved document, defaults included.
pub fn render(doc: &ConfigDocument, format: SourceFormat) -> Result<String> {
    let rendered = match format {
        SourceFormat::Yaml => doc.to_yaml()?,
        SourceFormat::Json => doc.to_json()?,
    };
    Ok(rendered)
}

pub fn execute(args: ExportArgs, load: &LoadArgs, json_mode: bool) -> Result<()> {
    let doc = load
        .loader(&args.config)
        .load()
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    let format = if json_mode { SourceFormat::Json } else { args.format };
    let rendered = render(&doc, format)?;

    match args.output {
        Some(path) => std::fs::write(&path, rendered)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{rendered}"),
    }
    Ok(())
}
