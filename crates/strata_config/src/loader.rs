//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{FloorplanSettings, ObjectiveWeights, StrataConfig};
use std::path::Path;

/// The configuration file name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "strata.toml";

/// Loads and validates `strata.toml` from a directory.
///
/// A directory without a configuration file yields the default configuration.
pub fn load_config(dir: &Path) -> Result<StrataConfig, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        return Ok(StrataConfig::default());
    }
    load_config_file(&config_path)
}

/// Loads and validates a configuration from an explicit file path.
pub fn load_config_file(path: &Path) -> Result<StrataConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    load_config_from_str(&content)
}

/// Parses and validates a `strata.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<StrataConfig, ConfigError> {
    let config: StrataConfig = toml::from_str(content)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates global settings and every per-circuit override.
fn validate_config(config: &StrataConfig) -> Result<(), ConfigError> {
    validate_settings("floorplan", &config.floorplan)?;
    for (name, overlay) in &config.circuits {
        let merged = crate::resolve::apply_override(&config.floorplan, overlay);
        validate_settings(&format!("circuits.{name}"), &merged)?;
    }
    Ok(())
}

/// Checks the value ranges of one settings block.
pub(crate) fn validate_settings(
    section: &str,
    settings: &FloorplanSettings,
) -> Result<(), ConfigError> {
    if settings.resource_per_len <= 0 {
        return Err(ConfigError::invalid(
            format!("{section}.resource_per_len"),
            format!("must be positive, got {}", settings.resource_per_len),
        ));
    }
    if settings.pin_resource <= 0 {
        return Err(ConfigError::invalid(
            format!("{section}.pin_resource"),
            format!("must be positive, got {}", settings.pin_resource),
        ));
    }
    validate_weights(section, &settings.weights)
}

fn validate_weights(section: &str, weights: &ObjectiveWeights) -> Result<(), ConfigError> {
    for (field, value) in [
        ("height", weights.height),
        ("resource", weights.resource),
        ("crossing", weights.crossing),
        ("compaction", weights.compaction),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ConfigError::invalid(
                format!("{section}.weights.{field}"),
                format!("must be finite and non-negative, got {value}"),
            ));
        }
    }
    if weights.height == 0.0 {
        return Err(ConfigError::invalid(
            format!("{section}.weights.height"),
            "must be positive",
        ));
    }
    Ok(())
}
