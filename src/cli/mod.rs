//! Command-line interface for inspecting configuration files.

pub mod commands;
pub mod output;
pub mod table;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::domain::schema::Schema;
use crate::infrastructure::config::{ConfigLoader, DEFAULT_ENV_PREFIX};
use crate::infrastructure::logging::{LogConfig, LogFormat};
use crate::services::{ConfigStore, LoadOptions, Strictness};

use commands::{
    check::CheckArgs, export::ExportArgs, get::GetArgs, schema::SchemaArgs, show::ShowArgs,
    summary::SummaryArgs,
};

#[derive(Parser, Debug)]
#[command(name = "confstore", version, about = "Check, query and export server configuration files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    #[command(flatten)]
    pub load: LoadArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a configuration file
    Check(CheckArgs),
    /// Print the value of one setting
    Get(GetArgs),
    /// List every loaded setting with its source
    Show(ShowArgs),
    /// Write the fully resolved configuration
    Export(ExportArgs),
    /// Print the typed server settings view
    Summary(SummaryArgs),
    /// List recognized settings
    Schema(SchemaArgs),
}

/// How configuration files are layered and validated.
#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    /// Reject settings the schema does not recognize
    #[arg(long, global = true, env = "CONFSTORE_STRICT")]
    pub strict: bool,

    /// Local override file layered on top of the configuration file
    #[arg(long, global = true, env = "CONFSTORE_LOCAL", value_name = "FILE")]
    pub local: Option<PathBuf>,

    /// Prefix of environment variables that override settings
    #[arg(long, global = true, default_value = DEFAULT_ENV_PREFIX)]
    pub env_prefix: String,

    /// Ignore environment variable overrides
    #[arg(long, global = true)]
    pub no_env: bool,
}

impl LoadArgs {
    pub const fn strictness(&self) -> Strictness {
        if self.strict {
            Strictness::Strict
        } else {
            Strictness::Permissive
        }
    }

    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(Schema::builtin(), LoadOptions::default()).with_strictness(self.strictness())
    }

    /// Loader for `config` with the override file and environment layers.
    pub fn loader(&self, config: &Path) -> ConfigLoader {
        let mut loader = ConfigLoader::new(self.store()).base_file(config);
        if let Some(local) = &self.local {
            loader = loader.local_file(local);
        }
        if !self.no_env {
            loader = loader.env_prefix(&self.env_prefix);
        }
        loader
    }
}

#[derive(Args, Debug, Clone)]
pub struct LoggingArgs {
    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true, env = "CONFSTORE_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log format: compact, pretty, json
    #[arg(long, global = true, env = "CONFSTORE_LOG_FORMAT", default_value = "compact")]
    pub log_format: LogFormat,

    /// Also write JSON logs to this directory
    #[arg(long, global = true, env = "CONFSTORE_LOG_DIR", value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

impl LoggingArgs {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: self.log_format,
            log_dir: self.log_dir.clone(),
            ..LogConfig::default()
        }
    }
}

/// Print `err` and exit with status 1.
pub fn handle_error(err: &anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let body = serde_json::json!({
            "success": false,
            "error": format!("{err:#}"),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("Error: {err:#}");
    }
    std::process::exit(1);
}
