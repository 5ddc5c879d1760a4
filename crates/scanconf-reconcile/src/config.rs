//! Configuration for the scanconf reconciler.

use std::time::Duration;

use serde::Deserialize;

use scanconf_api::ApplianceKind;
use scanconf_core::EmptyCategoryPolicy;

use crate::error::{ReconcileError, Result};

/// Environment variable prefix, e.g. `SCANCONF__API__URL`.
pub const ENV_PREFIX: &str = "SCANCONF";

/// Top-level settings.
///
/// Loaded from `scanconf.toml` (`[api]` and `[reconcile]` sections) and
/// `SCANCONF__` environment variables, in that order of precedence (env wins).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

/// Connection settings for the management API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the API service.
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub username: String,

    /// API password; `-` or unset prompts on the terminal.
    pub password: Option<String>,

    /// HTTPS proxy URL.
    pub proxy_url: Option<String>,

    /// Per-request timeout in seconds (default: no timeout).
    pub timeout_secs: Option<u64>,
}

impl ApiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Reconciliation policies.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReconcileConfig {
    /// What to send for an included category with no entries.
    #[serde(default)]
    pub empty_category: EmptyCategoryPolicy,

    /// What to do when an update call fails.
    #[serde(default)]
    pub on_update_failure: UpdateFailurePolicy,

    /// Which update endpoint the appliances are managed through.
    #[serde(default)]
    pub appliance_kind: ApplianceKind,
}

/// Behaviour after a failed update call.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UpdateFailurePolicy {
    /// Stop at the first failure; later appliances are not attempted.
    #[default]
    Abort,
    /// Attempt every appliance, then fail with a summary of the failures.
    Continue,
}

/// Load settings from `<file_prefix>.toml` (optional) and the environment.
pub fn load_settings(file_prefix: &str) -> Result<Settings> {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .map_err(|e| ReconcileError::Config(e.to_string()))?;

    cfg.try_deserialize()
        .map_err(|e| ReconcileError::Config(e.to_string()))
}
