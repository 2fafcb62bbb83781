//! Error types for configuration loading and validation.

use std::path::PathBuf;

/// Errors from loading or validating a `strata.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    IoError {
        /// File that failed to read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The TOML content is malformed or has fields of the wrong type.
    #[error("failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value is out of range.
    #[error("invalid configuration: {key} {reason}")]
    ValidationError {
        /// Dotted key of the offending value, e.g. `circuits.adc.pin_resource`.
        key: String,
        /// What is wrong with it.
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_names_the_key() {
        let err = ConfigError::invalid("floorplan.pin_resource", "must be positive, got 0");
        assert_eq!(
            err.to_string(),
            "invalid configuration: floorplan.pin_resource must be positive, got 0"
        );
    }

    #[test]
    fn io_error_names_the_file() {
        let err = ConfigError::IoError {
            path: PathBuf::from("/proj/strata.toml"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().starts_with("cannot read /proj/strata.toml"));
    }

    #[test]
    fn parse_error_from_toml() {
        let toml_err = toml::from_str::<toml::Value>("a = ").unwrap_err();
        let err: ConfigError = toml_err.into();
        assert!(err.to_string().starts_with("failed to parse configuration"));
    }
}
