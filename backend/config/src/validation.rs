//! Config validation: schema checks with user-friendly error messages.

use crate::schema::ParleyConfig;
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config against the commands the agent actually knows.
pub fn validate(config: &ParleyConfig, known_commands: &[&str]) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_agent(config, known_commands, &mut report);
    validate_logging(config, &mut report);
    report
}

fn validate_agent(config: &ParleyConfig, known: &[&str], report: &mut ValidationReport) {
    let Some(agent) = &config.agent else { return };

    if let Some(name) = &agent.name {
        if name.trim().is_empty() {
            report.error("agent.name", "Agent name cannot be empty");
        }
    }

    if let Some(enabled) = &agent.enabled_commands {
        if enabled.is_empty() {
            report.warn(
                "agent.enabledCommands",
                "No commands enabled; every message will go to the fallback",
            );
        }
        for (i, name) in enabled.iter().enumerate() {
            if !known.contains(&name.as_str()) {
                report.error(
                    format!("agent.enabledCommands[{i}]"),
                    format!("Unknown command `{name}` (known: {})", known.join(", ")),
                );
            }
        }
    }

    if let Some(dir) = &agent.checkout_dir {
        if !dir.is_dir() {
            report.warn("agent.checkoutDir", format!("{} is not a directory", dir.display()));
        }
    }
}

fn validate_logging(config: &ParleyConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
            report.error(
                "logging.level",
                format!("Invalid log level `{level}` (expected one of {})", LOG_LEVELS.join(", ")),
            );
        }
    }
}
