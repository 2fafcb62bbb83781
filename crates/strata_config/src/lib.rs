//! Parsing and validation of `strata.toml` floorplanner configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`StrataConfig`]: global floorplan settings (resource quantization,
//! constraint-graph policy, objective weights) plus optional per-circuit
//! overrides merged by [`resolve_circuit`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::resolve_circuit;
pub use types::*;
