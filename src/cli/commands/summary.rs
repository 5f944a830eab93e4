//! Implementation of the `confstore summary` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput, MASK};
use crate::cli::LoadArgs;
use crate::domain::models::{MemcacheBackend, RetentionObligation, ServerSettings};

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Configuration file (YAML or JSON)
    pub config: PathBuf,
}

#[derive(Debug, serde::Serialize)]
#[serde(transparent)]
pub struct SummaryOutput {
    pub settings: ServerSettings,
}

fn backend(b: Option<MemcacheBackend>) -> String {
    b.map_or_else(|| "-".to_string(), |b| b.to_string())
}

fn retention(policy: &RetentionObligation) -> String {
    match policy.days() {
        Some(days) => format!("{policy} (mode {}, {days} days)", policy.mode),
        None => format!("{policy} (mode {})", policy.mode),
    }
}

impl CommandOutput for SummaryOutput {
    fn to_human(&self) -> String {
        let s = &self.settings;
        let mut lines = vec![
            "Cache".to_string(),
            format!("  distributed: {}", backend(s.cache.distributed)),
            format!("  local:       {}", backend(s.cache.local)),
            format!("  locking:     {}", backend(s.cache.locking)),
            "Redis".to_string(),
            format!("  host:        {}", s.redis.host.as_deref().unwrap_or("-")),
            format!("  port:        {}", s.redis.port),
        ];
        if s.redis.password.is_some() {
            lines.push(format!("  password:    {MASK}"));
        }
        lines.push("Previews".to_string());
        lines.push(format!("  enabled:     {}", s.previews.enabled));
        lines.push(format!("  max size:    {}x{}", s.previews.max_x, s.previews.max_y));
        for (rank, provider) in s.previews.providers.iter().enumerate() {
            lines.push(format!("  {:>2}. {provider}", rank + 1));
        }
        lines.push("Retention".to_string());
        lines.push(format!("  trashbin:    {}", retention(&s.trashbin_retention)));
        lines.push(format!("  versions:    {}", retention(&s.versions_retention)));
        lines.push("Maintenance".to_string());
        lines.push(format!("  enabled:     {}", s.maintenance));
        lines.push(format!(
            "  window:      {}",
            s.maintenance_window_start
                .map_or_else(|| "any time".to_string(), |h| format!("{h:02}:00 UTC"))
        ));
        lines.push(format!(
            "Phone region:  {}",
            s.default_phone_region.as_deref().unwrap_or("-")
        ));
        lines.push(format!(
            "Rewrite base:  {}",
            s.rewrite_base.as_deref().unwrap_or("-")
        ));
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: SummaryArgs, load: &LoadArgs, json_mode: bool) -> Result<()> {
    let doc = load
        .loader(&args.config)
        .load()
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    let output_data = SummaryOutput {
        settings: ServerSettings::from_document(&doc)?,
    };
    output(&output_data, json_mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ConfigStore;

    #[test]
    fn test_summary_lists_providers_in_order() {
        let doc = ConfigStore::default()
            .load(b"enabledPreviewProviders: [PNG, JPEG, GIF]\nmaintenance_window_start: 1\nredis:\n  password: s3cret\n")
            .unwrap();
        let out = SummaryOutput {
            settings: ServerSettings::from_document(&doc).unwrap(),
        };
        let human = out.to_human();

        let png = human.find("1. PNG").unwrap();
        let jpeg = human.find("2. JPEG").unwrap();
        let gif = human.find("3. GIF").unwrap();
        assert!(png < jpeg && jpeg < gif);
        assert!(human.contains("01:00 UTC"));
        assert!(!human.contains("s3cret"));
        assert!(!out.to_json().to_string().contains("s3cret"));
    }
}
