//! `dcr split`: one amount, one split, printed as JSON.

use anyhow::{Context, Result};
use dcr_revenue::{compute_split, Money};
use dcr_schemas::WireSplit;
use tracing::debug;

pub fn run(amount: &str, doctor: bool, broker: bool, config_paths: &[String]) -> Result<()> {
    let loaded = super::load_config(config_paths, false)?;
    let policy = dcr_config::split_policy_from_config(&loaded.config_json)?;

    let amount = Money::parse_decimal(amount).with_context(|| format!("--amount {amount:?}"))?;
    let split = compute_split(amount, doctor, broker, &policy)?;
    debug!(%amount, ?split, "split computed");

    let json = serde_json::to_string_pretty(&WireSplit::new(amount, &split))
        .context("serialize split json failed")?;
    println!("{json}");
    Ok(())
}
