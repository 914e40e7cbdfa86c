//! Shared state for dcr-daemon.
//!
//! Everything here is fixed at boot. Handlers receive `State<Arc<AppState>>`
//! from Axum and only read it; every request is computed from its own body.

use anyhow::Result;
use dcr_config::{LoadedConfig, ReportSettings};
use dcr_revenue::SplitPolicy;
use dcr_schemas::SortOrder;

// ---------------------------------------------------------------------------
// BuildInfo
// ---------------------------------------------------------------------------

/// Static build metadata included in health responses.
#[derive(Clone, Debug)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            service: "dcr-daemon",
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct AppState {
    pub build: BuildInfo,
    /// Split rates applied to every request.
    pub policy: SplitPolicy,
    /// Currency label stamped on reports.
    pub currency: String,
    /// Used when a report request carries no `sort`.
    pub default_sort: SortOrder,
    pub config_hash: String,
}

impl Default for AppState {
    fn default() -> Self {
        let settings = ReportSettings::default();
        Self {
            build: BuildInfo::default(),
            policy: SplitPolicy::default(),
            currency: settings.currency,
            default_sort: SortOrder::default(),
            config_hash: String::new(),
        }
    }
}

impl AppState {
    pub fn new(policy: SplitPolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Build state from a loaded config. Fails on a bad policy or sort name
    /// so the daemon never serves with a half-valid config.
    pub fn from_config(loaded: &LoadedConfig) -> Result<Self> {
        let policy = dcr_config::split_policy_from_config(&loaded.config_json)?;
        let settings = dcr_config::report_settings_from_config(&loaded.config_json)?;
        let default_sort = match settings.sort.as_deref() {
            Some(raw) => raw.parse().map_err(anyhow::Error::msg)?,
            None => SortOrder::default(),
        };

        Ok(Self {
            build: BuildInfo::default(),
            policy,
            currency: settings.currency,
            default_sort,
            config_hash: loaded.config_hash.clone(),
        })
    }
}
