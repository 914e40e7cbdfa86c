//! Typed reads out of the merged config.
//!
//! Every pointer read here must also be listed in
//! [`consumed_pointers_for_mode`](crate::consumed_pointers_for_mode).

use anyhow::{bail, Context, Result};
use dcr_revenue::SplitPolicy;
use serde_json::Value;

const PTR_DOCTOR_BPS: &str = "/revenue/doctor_commission_bps";
const PTR_BROKER_BPS: &str = "/revenue/broker_commission_bps";
const PTR_REDIRECT: &str = "/revenue/redirect_unused_doctor_share";
const PTR_CURRENCY: &str = "/report/currency";
const PTR_SORT: &str = "/report/sort";

/// Currency label attached to reports when the config does not name one.
pub const DEFAULT_CURRENCY: &str = "BDT";

/// Build the split policy. Missing keys keep the 5% / 5% / no-redirect
/// defaults; present keys must have the right type and the resulting policy
/// must not exceed 100%.
pub fn split_policy_from_config(config_json: &Value) -> Result<SplitPolicy> {
    let defaults = SplitPolicy::default();

    let policy = SplitPolicy {
        doctor_bps: read_bps(config_json, PTR_DOCTOR_BPS)?.unwrap_or(defaults.doctor_bps),
        broker_bps: read_bps(config_json, PTR_BROKER_BPS)?.unwrap_or(defaults.broker_bps),
        redirect_unused_doctor_share: match config_json.pointer(PTR_REDIRECT) {
            None | Some(Value::Null) => defaults.redirect_unused_doctor_share,
            Some(Value::Bool(b)) => *b,
            Some(other) => bail!("CONFIG_TYPE {PTR_REDIRECT} must be a boolean, got {other}"),
        },
    };

    policy
        .validate()
        .with_context(|| format!("CONFIG_INVALID_POLICY {PTR_DOCTOR_BPS} + {PTR_BROKER_BPS}"))?;
    Ok(policy)
}

fn read_bps(config_json: &Value, ptr: &str) -> Result<Option<u32>> {
    match config_json.pointer(ptr) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => {
            let n = v
                .as_u64()
                .with_context(|| format!("CONFIG_TYPE {ptr} must be a non-negative integer, got {v}"))?;
            let bps = u32::try_from(n)
                .ok()
                .filter(|b| *b <= 10_000)
                .with_context(|| format!("CONFIG_RANGE {ptr} must be <= 10000, got {n}"))?;
            Ok(Some(bps))
        }
    }
}

/// Presentation settings shared by the CLI and the daemon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSettings {
    pub currency: String,
    /// Raw sort name; parsed by the consumer.
    pub sort: Option<String>,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            currency: DEFAULT_CURRENCY.to_string(),
            sort: None,
        }
    }
}

pub fn report_settings_from_config(config_json: &Value) -> Result<ReportSettings> {
    let currency = match config_json.pointer(PTR_CURRENCY) {
        None | Some(Value::Null) => DEFAULT_CURRENCY.to_string(),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(other) => bail!("CONFIG_TYPE {PTR_CURRENCY} must be a non-empty string, got {other}"),
    };
    let sort = match config_json.pointer(PTR_SORT) {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(other) => bail!("CONFIG_TYPE {PTR_SORT} must be a string, got {other}"),
    };
    Ok(ReportSettings { currency, sort })
}
