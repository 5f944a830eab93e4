//! Implementation of the `confstore get` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::cli::LoadArgs;
use crate::domain::models::{SettingSource, SettingValue};

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration file (YAML or JSON)
    pub config: PathBuf,

    /// Dotted setting key, e.g. redis.port or memcache.local
    pub key: String,

    /// Value printed when the key is absent (parsed as a YAML scalar)
    #[arg(long, conflicts_with = "required")]
    pub default: Option<String>,

    /// Fail when the key is absent
    #[arg(long)]
    pub required: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct GetOutput {
    pub key: String,
    pub value: SettingValue,
    pub source: Option<SettingSource>,
}

impl CommandOutput for GetOutput {
    fn to_human(&self) -> String {
        self.value.to_string()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// `--default` values are YAML scalars so `-1` is an integer and `true` a boolean.
pub fn parse_default(raw: &str) -> SettingValue {
    serde_yaml::from_str::<serde_yaml::Value>(raw)
        .map_or_else(|_| SettingValue::from(raw), SettingValue::from)
}

pub fn execute(args: GetArgs, load: &LoadArgs, json_mode: bool) -> Result<()> {
    let doc = load
        .loader(&args.config)
        .load()
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    let value = if args.required {
        doc.get_required(&args.key)?.clone()
    } else {
        let default = args.default.as_deref().map_or(SettingValue::Null, parse_default);
        doc.get(&args.key, default)
    };

    let output_data = GetOutput {
        source: doc.source(&args.key),
        key: args.key,
        value,
    };
    output(&output_data, json_mode);
    Ok(())
}
