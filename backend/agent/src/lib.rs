//! Parley agent runtime.
//!
//! An [`Agent`] owns a command registry, the handler bound to it, and the
//! conversation state those handlers mutate. The docker-chat agent is the
//! bundled implementation.

pub mod agent;
pub mod dockerchat;
pub mod messages;
pub mod session_state;
pub mod system_prompt;

pub use agent::Agent;
pub use dockerchat::{DockerChatAgent, DockerChatHandler, ASK_URL_RESPONSE, GOT_URL_RESPONSE};
pub use messages::{
    known_commands, DockerChatCommand, FileExists, InformUrl, PythonDependency, PythonVersion,
};
pub use session_state::AgentState;
pub use system_prompt::PromptBuilder;
