//! Parley runtime configuration schema.
//!
//! Every section is optional in the file; `defaults` fills in the gaps after
//! loading.

use parley_commands::DecodeFailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParleyConfig {
    /// Agent identity and command gating
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<AgentConfig>,

    /// Logging configuration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,
}

// ---------------------------------------------------------------------------
// Agent
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Commands recognized at startup. `None` enables every known command.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_commands: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decode_failure: Option<DecodeFailurePolicy>,

    /// Directory holding local checkouts of repositories, one per repo name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_dir: Option<PathBuf>,
}

impl AgentConfig {
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(crate::defaults::DEFAULT_AGENT_NAME)
    }

    pub fn decode_failure(&self) -> DecodeFailurePolicy {
        self.decode_failure.unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Directory for rolling NDJSON log files; console only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(crate::defaults::DEFAULT_LOG_LEVEL)
    }
}
