// crates/ingest-gate-cli/src/config.rs
// ============================================================================
// Module: CLI Configuration
// Description: TOML configuration file for the ingest-gate binary.
// Purpose: Resolve and validate the option store location before any command runs.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration resolution follows a fixed chain: an explicit `--config`
//! path wins, then the `INGEST_GATE_CONFIG` environment variable, then
//! `ingest-gate.toml` in the working directory. Only the default path is
//! optional; a path the operator named must exist. Files are size-capped
//! before parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable overriding the default config file path.
pub const CONFIG_ENV_VAR: &str = "INGEST_GATE_CONFIG";

/// Config file consulted when no explicit path or override is given.
const DEFAULT_CONFIG_PATH: &str = "ingest-gate.toml";

/// Option store path used when the config file does not set one.
const DEFAULT_STORE_PATH: &str = "ingest-gate-options.json";

/// Maximum size of a config file accepted for parsing.
const MAX_CONFIG_BYTES: u64 = 64 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while loading the CLI configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("could not read config file {path}: {detail}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O failure.
        detail: String,
    },
    /// The config file is not valid TOML for this schema.
    #[error("could not parse config file {path}: {detail}")]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying parse failure.
        detail: String,
    },
    /// The config file exceeds the accepted size.
    #[error("config file {path} exceeds size limit ({size} > {limit} bytes)")]
    TooLarge {
        /// Path that was rejected.
        path: PathBuf,
        /// Observed file size in bytes.
        size: u64,
        /// Maximum accepted size in bytes.
        limit: u64,
    },
}

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Parsed CLI configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Path of the JSON file backing the option store.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

impl CliConfig {
    /// Loads the configuration from the resolved path.
    ///
    /// An absent file is an error when the path was named explicitly (flag or
    /// environment variable) and the built-in defaults otherwise.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] when a required file is missing, oversized,
    /// or not valid TOML.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = resolve_path(explicit);
        if !required && !path.exists() {
            return Ok(Self::default());
        }
        let size = fs::metadata(&path)
            .map_err(|err| ConfigError::Io {
                path: path.clone(),
                detail: err.to_string(),
            })?
            .len();
        if size > MAX_CONFIG_BYTES {
            return Err(ConfigError::TooLarge {
                path,
                size,
                limit: MAX_CONFIG_BYTES,
            });
        }
        let text = fs::read_to_string(&path).map_err(|err| ConfigError::Io {
            path: path.clone(),
            detail: err.to_string(),
        })?;
        toml::from_str(&text).map_err(|err| ConfigError::Parse {
            path,
            detail: err.to_string(),
        })
    }
}

/// Resolves the config path and whether it must exist.
fn resolve_path(explicit: Option<&Path>) -> (PathBuf, bool) {
    if let Some(path) = explicit {
        return (path.to_path_buf(), true);
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
        return (PathBuf::from(path), true);
    }
    (PathBuf::from(DEFAULT_CONFIG_PATH), false)
}

/// Returns the default option store path.
fn default_store_path() -> PathBuf {
    PathBuf::from(DEFAULT_STORE_PATH)
}
