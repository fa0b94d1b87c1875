//! Long-lived state owned by one agent instance.

use std::collections::HashMap;
use std::path::PathBuf;

/// What the docker-chat agent has learned so far in the conversation.
///
/// Created empty with the agent, mutated by command handlers, never reset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentState {
    /// Repository URL confirmed through `inform_url`.
    pub repo_url: Option<String>,
    /// Local checkout of that repository, when one is available.
    pub repo_path: Option<PathBuf>,
    /// Free-form facts handlers want to keep for later turns.
    pub context_vars: HashMap<String, String>,
}

impl AgentState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn knows_repo(&self) -> bool {
        self.repo_url.is_some()
    }
}
