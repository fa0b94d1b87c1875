//! `parley-config`: Parley runtime configuration management.
//!
//! Provides:
//! - Typed config schema (agent identity, command gating, logging)
//! - YAML loading (a missing or blank file is an empty config)
//! - `${ENV_VAR}` substitution
//! - Default value application
//! - Validation against the agent's known commands

pub mod defaults;
pub mod env;
pub mod io;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use schema::{AgentConfig, LoggingConfig, ParleyConfig};
pub use io::{config_dir, config_file_path, load_raw};
pub use env::{resolve_env_vars, MissingEnvVarError};
pub use defaults::apply_all_defaults;
pub use validation::{validate, ValidationReport, ConfigValidationError};

use anyhow::{bail, Context, Result};
use std::path::Path;

/// Load, apply env substitution, apply defaults, and validate a config file.
///
/// `known_commands` are the command names the agent can enable. Validation
/// errors abort the load; warnings are logged.
pub async fn load_and_prepare(path: &Path, known_commands: &[&str]) -> Result<ParleyConfig> {
    let value = load_raw(path).await?;

    // Substitute ${VAR} env vars.
    let value = resolve_env_vars(value).context("Failed to resolve env vars in config")?;

    let config: ParleyConfig =
        serde_json::from_value(value).context("Failed to deserialize config after processing")?;

    let config = apply_all_defaults(config);

    let report = validate(&config, known_commands);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        bail!(first);
    }

    Ok(config)
}
