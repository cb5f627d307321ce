//! Configuration loading.
//!
//! Values are layered, later layers winning:
//! 1. built-in defaults (every field is `serde(default)`)
//! 2. the TOML file
//! 3. `VOIA_`-prefixed environment variables, where `__` descends into a
//!    section: `VOIA_API__BASE_URL`, `VOIA_TRACKER__POLL_INTERVAL_MS`.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Load the SDK configuration from `path`, overridden by `VOIA_*` variables.
///
/// The file must exist even if the environment supplies every value.
/// The result is not validated; pass it through `validate_config`.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    let config: Config = Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed("VOIA_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    Ok(config)
}

/// Parse a TOML document without consulting the environment.
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
