//! Config file location and loading.

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Default config file name within the config directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the Parley config directory.
/// Priority: `PARLEY_CONFIG_DIR` env > `~/.parley/`
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("PARLEY_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".parley"),
        None => PathBuf::from(".parley"),
    }
}

/// Resolve the full path to the main config file.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE_NAME)
}

/// Read the config file as an untyped value tree, before env substitution.
///
/// Returns an empty object if the file doesn't exist (first run).
pub async fn load_raw(path: &Path) -> Result<Value> {
    if !path.exists() {
        debug!(path = %path.display(), "Config file does not exist; using defaults");
        return Ok(Value::Object(Default::default()));
    }

    let raw = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if raw.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }

    let value: Value = serde_yaml::from_str(&raw)
        .with_context(|| format!("Failed to parse config YAML at: {}", path.display()))?;

    info!(path = %path.display(), "Loaded config");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_is_an_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let value = load_raw(&dir.path().join("nope.yaml")).await.unwrap();
        assert_eq!(value, Value::Object(Default::default()));
    }

    #[tokio::test]
    async fn blank_file_is_an_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        tokio::fs::write(&path, "\n  \n").await.unwrap();
        assert_eq!(load_raw(&path).await.unwrap(), Value::Object(Default::default()));
    }

    #[tokio::test]
    async fn reads_yaml_as_value_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = config_file_path(dir.path());
        tokio::fs::write(&path, "agent:\n  enabledCommands: [inform_url]\n").await.unwrap();
        let value = load_raw(&path).await.unwrap();
        assert_eq!(value["agent"]["enabledCommands"][0], "inform_url");
    }

    #[tokio::test]
    async fn invalid_yaml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "agent: [unterminated").await.unwrap();
        let err = load_raw(&path).await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse config YAML"));
    }

    #[test]
    fn config_file_lives_in_config_dir() {
        assert_eq!(
            config_file_path(Path::new("/etc/parley")),
            PathBuf::from("/etc/parley/config.yaml")
        );
    }
}
