//! Command handler modules for the `dcr` CLI.
//!
//! Shared utilities used by multiple command paths live here.
//! Command-specific logic lives in the submodules.

pub mod orders;
pub mod report;
pub mod split;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use dcr_config::{ConfigMode, LoadedConfig, UnusedKeyPolicy};
use std::fs;
use tracing::{info, warn};

/// Env var holding comma-separated config paths when `--config` is absent.
pub const ENV_CONFIG_PATHS: &str = "DCR_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OrderFormat {
    Json,
    Csv,
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// `--config` paths if given, else `DCR_CONFIG`, else none.
pub fn resolve_config_paths(cli_paths: &[String]) -> Vec<String> {
    if !cli_paths.is_empty() {
        return cli_paths.to_vec();
    }
    std::env::var(ENV_CONFIG_PATHS)
        .ok()
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Load layered config and run the unused-key guard for report mode.
pub fn load_config(cli_paths: &[String], strict: bool) -> Result<LoadedConfig> {
    let paths = resolve_config_paths(cli_paths);
    let path_refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
    let loaded = dcr_config::load_layered_yaml(&path_refs)?;

    let policy = if strict {
        UnusedKeyPolicy::Fail
    } else {
        UnusedKeyPolicy::Warn
    };
    let unused = dcr_config::report_unused_keys(ConfigMode::Report, &loaded.config_json, policy)?;
    for ptr in &unused.unused_leaf_pointers {
        warn!(pointer = %ptr, "config key is not read by this command");
    }

    info!(layers = paths.len(), config_hash = %loaded.config_hash, "config loaded");
    Ok(loaded)
}

/// Parse a `YYYY-MM-DD` CLI flag.
pub fn parse_date_flag(flag: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid --{flag} date: {raw}"))
}

/// Print JSON to stdout or write it to `out`.
pub fn emit_json(json: &str, out: Option<&str>) -> Result<()> {
    match out {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("write report failed: {path}"))?;
            info!(path, "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}
