//! Configuration loading
//!
//! Sources, lowest precedence first:
//! 1. built-in defaults
//! 2. optional file given with `--config` (format from its extension)
//! 3. `TASKDECK_`-prefixed variables, `__` between nesting levels
//!    (e.g. `TASKDECK_STORE__REFRESH_INTERVAL_MS=500`)
//! 4. the bare endpoint variables `REDIS_URL`, `API_BASE_URL`, `WEBSOCKET_URL`

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use std::path::Path;

use taskdeck_core::config::DashboardConfig;

const ENV_PREFIX: &str = "TASKDECK";

const ENDPOINT_VARS: [(&str, &str); 3] = [
    ("REDIS_URL", "endpoints.redis_url"),
    ("API_BASE_URL", "endpoints.api_base_url"),
    ("WEBSOCKET_URL", "endpoints.websocket_url"),
];

pub fn load(path: Option<&Path>) -> Result<DashboardConfig> {
    load_from(path, None, |var| std::env::var(var).ok())
}

/// `env` replaces the process environment for the prefixed variables when set;
/// `lookup` resolves the bare endpoint variables.
fn load_from(
    path: Option<&Path>,
    env: Option<config::Map<String, String>>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<DashboardConfig> {
    let mut builder = Config::builder();

    if let Some(path) = path {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .source(env),
    );

    for (var, key) in ENDPOINT_VARS {
        builder = builder.set_override_option(key, lookup(var))?;
    }

    let config: DashboardConfig = builder
        .build()
        .context("Failed to read configuration")?
        .try_deserialize()
        .context("Invalid configuration")?;

    config.store.validate()?;
    Ok(config)
}
