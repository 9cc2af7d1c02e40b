//! CLI settings: defaults, then `slots.toml`, then `SLOTS_*` environment variables.

use std::path::Path;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Upper bound on the external calendar fetch, in milliseconds.
    pub external_timeout_ms: u64,
    /// Requester timezone used when `--tz` is not given.
    pub default_timezone: String,
    /// `tracing` filter used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            external_timeout_ms: 2_000,
            default_timezone: "UTC".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

pub fn load(path: &Path) -> Result<Settings, figment::Error> {
    Figment::from(Serialized::defaults(Settings::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("SLOTS_"))
        .extract()
}
