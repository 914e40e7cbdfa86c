//! Daemon-only response types.
//!
//! Revenue request/response bodies are shared with the CLI and live in
//! `dcr-schemas`.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// /v1/health
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub ok: bool,
    pub service: String,
    pub version: String,
    /// Hash of the layered config the daemon booted with.
    pub config_hash: String,
}
