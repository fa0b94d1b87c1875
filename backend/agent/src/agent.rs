//! The agent facade: owns a dispatcher, its registry and state, and records
//! every routing decision.

use anyhow::{anyhow, Result};
use parley_commands::{
    CommandDispatcher, CommandHandler, CommandSchema, CommandSet, DecodeFailurePolicy,
    DispatchError, Route, SchemaRegistry,
};
use parley_logging::{DispatchEvent, DispatchEventLogger};
use tracing::instrument;

use crate::system_prompt::PromptBuilder;

pub struct Agent<H: CommandHandler> {
    name: String,
    dispatcher: CommandDispatcher<H>,
}

impl<H: CommandHandler> Agent<H> {
    /// An agent with no commands enabled.
    pub fn new(name: impl Into<String>, handler: H, state: H::State) -> Self {
        Self {
            name: name.into(),
            dispatcher: CommandDispatcher::new(handler, state),
        }
    }

    pub fn with_policy(mut self, policy: DecodeFailurePolicy) -> Self {
        self.dispatcher = self.dispatcher.with_policy(policy);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> &H::State {
        self.dispatcher.state()
    }

    pub fn registry(&self) -> &SchemaRegistry {
        self.dispatcher.registry()
    }

    pub fn enable(&mut self, schema: CommandSchema) {
        self.dispatcher.registry_mut().enable(schema);
    }

    pub fn disable(&mut self, schema: &CommandSchema) {
        self.dispatcher.registry_mut().disable(schema);
    }

    /// Enable one of the handler's own commands by name.
    pub fn enable_command(&mut self, name: &str) -> Result<()> {
        let schema = H::Command::schemas()
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| anyhow!("agent `{}` has no command named `{name}`", self.name))?;
        self.enable(schema);
        Ok(())
    }

    pub fn disable_command(&mut self, name: &str) {
        self.dispatcher.registry_mut().disable_name(name);
    }

    /// Every command this agent could enable, with whether it currently is.
    pub fn command_status(&self) -> Vec<(CommandSchema, bool)> {
        H::Command::schemas()
            .into_iter()
            .map(|s| {
                let enabled = self.registry().is_enabled(&s.name);
                (s, enabled)
            })
            .collect()
    }

    /// System prompt teaching the model the currently enabled commands.
    pub fn instructions(&self) -> String {
        PromptBuilder::build(&self.name, self.registry())
    }

    /// Route `text` to a command handler or the fallback and return the
    /// reply. Only handler faults, and decode failures under the strict
    /// policy, come back as errors.
    #[instrument(skip(self, text), fields(agent = %self.name))]
    pub fn handle(&mut self, text: &str) -> Result<Option<String>, DispatchError> {
        match self.dispatcher.dispatch(text) {
            Ok(dispatched) => {
                let event = match &dispatched.route {
                    Route::Command { name, candidate } => DispatchEvent::CommandHandled {
                        command: name.to_string(),
                        fields_json: serde_json::to_string(&candidate.fields)
                            .unwrap_or_default(),
                    },
                    Route::Fallback(miss) => DispatchEvent::Fallback {
                        reason: miss.to_string(),
                        responded: dispatched.response.is_some(),
                    },
                };
                DispatchEventLogger::log_event(&self.name, event);
                Ok(dispatched.response)
            }
            Err(err) => {
                if let DispatchError::HandlerFault { command, source } = &err {
                    DispatchEventLogger::log_event(
                        &self.name,
                        DispatchEvent::HandlerFault {
                            command: command.clone(),
                            error_msg: format!("{source:#}"),
                        },
                    );
                }
                Err(err)
            }
        }
    }
}
