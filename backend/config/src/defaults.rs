//! Config defaults: applies default values to parsed config.

use crate::schema::{AgentConfig, LoggingConfig, ParleyConfig};

/// Agent name used in logs when the config does not set one.
pub const DEFAULT_AGENT_NAME: &str = "dockerchat";

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: ParleyConfig) -> ParleyConfig {
    let config = apply_agent_defaults(config);
    apply_logging_defaults(config)
}

/// Ensure the agent section exists with a name and decode policy.
fn apply_agent_defaults(mut config: ParleyConfig) -> ParleyConfig {
    let agent = config.agent.get_or_insert_with(AgentConfig::default);
    if agent.name.is_none() {
        agent.name = Some(DEFAULT_AGENT_NAME.to_string());
    }
    if agent.decode_failure.is_none() {
        agent.decode_failure = Some(Default::default());
    }
    config
}

/// Ensure logging.level is set.
fn apply_logging_defaults(mut config: ParleyConfig) -> ParleyConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_commands::DecodeFailurePolicy;

    #[test]
    fn fills_missing_sections() {
        let config = apply_all_defaults(ParleyConfig::default());
        let agent = config.agent.unwrap();
        assert_eq!(agent.name.as_deref(), Some(DEFAULT_AGENT_NAME));
        assert_eq!(agent.decode_failure, Some(DecodeFailurePolicy::Fallback));
        assert!(agent.enabled_commands.is_none());
        assert_eq!(config.logging.unwrap().level.as_deref(), Some("info"));
    }

    #[test]
    fn keeps_explicit_values() {
        let config = ParleyConfig {
            agent: Some(AgentConfig {
                name: Some("custom".into()),
                decode_failure: Some(DecodeFailurePolicy::Strict),
                ..Default::default()
            }),
            logging: Some(LoggingConfig { level: Some("warn".into()), dir: None }),
        };
        let config = apply_all_defaults(config);
        assert_eq!(config.agent.as_ref().unwrap().name(), "custom");
        assert_eq!(config.agent.unwrap().decode_failure(), DecodeFailurePolicy::Strict);
        assert_eq!(config.logging.unwrap().level(), "warn");
    }
}
