//! Validator configuration
//!
//! Runtime knobs for the registry layer: how hard referential integrity is
//! enforced, how many times conflicting writes are retried, and whether the
//! advisory enrollment-correlation check is promoted to a hard violation.
//! Deserializable from YAML so deployments can ship a config file instead
//! of recompiling.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// How referential-integrity findings are treated at commit time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrityMode {
    /// Missing references reject the write.
    #[default]
    Strict,
    /// Missing references are logged as warnings; the write proceeds.
    Advisory,
}

/// Configuration for the registry's validation and write paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Strict vs advisory referential-integrity enforcement.
    #[serde(default)]
    pub integrity_mode: IntegrityMode,

    /// Bounded retry count for optimistic-concurrency conflicts before the
    /// conflict is surfaced to the caller.
    #[serde(default = "default_max_write_retries")]
    pub max_write_retries: u32,

    /// Base backoff in milliseconds between conflicting attempts; jitter is
    /// added on top.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Promote the ELIGIBLE_ENROLLED <-> plan_member correlation from an
    /// advisory warning to a hard violation.
    #[serde(default)]
    pub enforce_enrollment_correlation: bool,
}

fn default_max_write_retries() -> u32 {
    4
}

fn default_retry_backoff_ms() -> u64 {
    5
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        ValidatorConfig {
            integrity_mode: IntegrityMode::Strict,
            max_write_retries: default_max_write_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            enforce_enrollment_correlation: false,
        }
    }
}

impl ValidatorConfig {
    /// Parse a config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Advisory-mode convenience constructor.
    pub fn advisory() -> Self {
        ValidatorConfig {
            integrity_mode: IntegrityMode::Advisory,
            ..ValidatorConfig::default()
        }
    }
}
