/// Schema registry: which commands an agent currently recognizes.
///
/// Each agent owns its own registry; enabling a command in one agent never
/// affects another.
use std::collections::BTreeMap;

use tracing::debug;

use crate::types::CommandSchema;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, CommandSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start recognizing `schema`. Re-enabling overwrites the previous entry.
    pub fn enable(&mut self, schema: CommandSchema) {
        debug!(command = %schema.name, "enabling command");
        self.schemas.insert(schema.name.clone(), schema);
    }

    /// Stop recognizing `schema`. No-op when it is not enabled.
    pub fn disable(&mut self, schema: &CommandSchema) {
        self.disable_name(&schema.name);
    }

    pub fn disable_name(&mut self, name: &str) {
        if self.schemas.remove(name).is_some() {
            debug!(command = %name, "disabled command");
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&CommandSchema> {
        self.schemas.get(name)
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Enabled command names, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.schemas.keys().map(|s| s.as_str()).collect()
    }

    /// Enabled schemas, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = &CommandSchema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Model-facing instructions covering every enabled command.
    ///
    /// Empty when nothing is enabled.
    pub fn instructions(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        let mut sections = vec![
            "When you need one of the actions below, include exactly one JSON-like block \
             in your reply, with a `request` key naming the action."
                .to_string(),
        ];
        sections.extend(self.iter().map(CommandSchema::usage_example));
        sections.join("\n\n")
    }
}
