//! System prompt builder.
//!
//! Combines the agent's identity with usage instructions for whichever
//! commands are enabled right now, so disabling a command also stops the
//! model from being taught to emit it.

use parley_commands::SchemaRegistry;

pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(agent_name: &str, registry: &SchemaRegistry) -> String {
        let identity = Self::build_identity(agent_name);
        let commands = registry.instructions();
        if commands.is_empty() {
            return identity;
        }
        format!("{identity}\n\n{commands}")
    }

    fn build_identity(agent_name: &str) -> String {
        format!(
            "You are {agent_name}, an assistant that helps the user write a Dockerfile \
             for their repository. Ask for anything you cannot find out yourself."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{FileExists, InformUrl};
    use parley_commands::Command;

    #[test]
    fn identity_only_without_commands() {
        let prompt = PromptBuilder::build("dockerchat", &SchemaRegistry::new());
        assert!(prompt.starts_with("You are dockerchat"));
        assert!(!prompt.contains("request"));
    }

    #[test]
    fn lists_enabled_commands_only() {
        let mut registry = SchemaRegistry::new();
        registry.enable(InformUrl::schema());
        let prompt = PromptBuilder::build("dockerchat", &registry);
        assert!(prompt.contains("Command `inform_url`"));
        assert!(!prompt.contains("Command `file_exists`"));

        registry.enable(FileExists::schema());
        let prompt = PromptBuilder::build("dockerchat", &registry);
        assert!(prompt.contains("Command `file_exists`"));
    }
}
