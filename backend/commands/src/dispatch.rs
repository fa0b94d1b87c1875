/// Command dispatch: route recognized commands to their handler, everything
/// else to the fallback.
use anyhow::Result;
use parley_logging::redact_sensitive_data;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::detection::{detect_candidate, ParsedCandidate};
use crate::error::{DecodeError, DispatchError, Miss};
use crate::registry::SchemaRegistry;
use crate::types::CommandSchema;

// ---------------------------------------------------------------------------
// Handler traits
// ---------------------------------------------------------------------------

/// The closed set of typed commands an agent knows how to run.
///
/// Implemented by an enum with one variant per command; the handler matches
/// on it exhaustively.
pub trait CommandSet: Sized {
    /// Decode `candidate` into the variant named by `schema`.
    ///
    /// Returns `None` when no variant carries that name.
    fn decode(schema: &CommandSchema, candidate: &ParsedCandidate)
        -> Option<Result<Self, DecodeError>>;

    fn name(&self) -> &'static str;

    /// Schemas for every variant.
    fn schemas() -> Vec<CommandSchema>;
}

pub trait CommandHandler {
    type Command: CommandSet;
    type State;

    fn handle_command(
        &self,
        command: Self::Command,
        state: &mut Self::State,
    ) -> Result<Option<String>>;

    /// Runs whenever the text holds no usable, enabled command.
    fn fallback(&self, text: &str, state: &mut Self::State) -> Option<String>;
}

// ---------------------------------------------------------------------------
// Policy and outcome
// ---------------------------------------------------------------------------

/// What to do with a block that names an enabled command but fails to decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeFailurePolicy {
    /// Treat it as ordinary text and run the fallback.
    #[default]
    Fallback,
    /// Return [`DispatchError::Decode`] to the caller.
    Strict,
}

/// Which path a call took.
#[derive(Debug)]
pub enum Route {
    Command {
        name: &'static str,
        candidate: ParsedCandidate,
    },
    Fallback(Miss),
}

#[derive(Debug)]
pub struct Dispatched {
    pub route: Route,
    pub response: Option<String>,
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

pub struct CommandDispatcher<H: CommandHandler> {
    registry: SchemaRegistry,
    handler: H,
    state: H::State,
    policy: DecodeFailurePolicy,
}

impl<H: CommandHandler> CommandDispatcher<H> {
    /// A dispatcher with no commands enabled.
    pub fn new(handler: H, state: H::State) -> Self {
        Self {
            registry: SchemaRegistry::new(),
            handler,
            state,
            policy: DecodeFailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DecodeFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut SchemaRegistry {
        &mut self.registry
    }

    pub fn state(&self) -> &H::State {
        &self.state
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn policy(&self) -> DecodeFailurePolicy {
        self.policy
    }

    /// Route `text` and return only the response.
    pub fn handle(&mut self, text: &str) -> Result<Option<String>, DispatchError> {
        self.dispatch(text).map(|d| d.response)
    }

    /// Route `text` to exactly one of the bound handler or the fallback.
    pub fn dispatch(&mut self, text: &str) -> Result<Dispatched, DispatchError> {
        let (command, candidate) = match self.recognize(text) {
            Ok(recognized) => recognized,
            Err(Miss::Decode(err)) if self.policy == DecodeFailurePolicy::Strict => {
                warn!(
                    error = %redact_sensitive_data(&err.to_string()),
                    "rejecting malformed command"
                );
                return Err(DispatchError::Decode(err));
            }
            Err(miss) => return Ok(self.fall_back(text, miss)),
        };

        let name = command.name();
        info!(command = name, "dispatching command");
        let response = self
            .handler
            .handle_command(command, &mut self.state)
            .map_err(|source| DispatchError::HandlerFault {
                command: name.to_string(),
                source,
            })?;

        Ok(Dispatched {
            route: Route::Command { name, candidate },
            response,
        })
    }

    fn recognize(&self, text: &str) -> Result<(H::Command, ParsedCandidate), Miss> {
        let candidate = detect_candidate(text).ok_or(Miss::ParseMiss)?;

        let unknown = || Miss::UnknownOrDisabled {
            name: candidate.name.clone(),
        };
        let schema = self.registry.lookup(&candidate.name).ok_or_else(unknown)?;
        let decoded = H::Command::decode(schema, &candidate).ok_or_else(unknown)??;
        Ok((decoded, candidate))
    }

    fn fall_back(&mut self, text: &str, miss: Miss) -> Dispatched {
        match &miss {
            Miss::Decode(err) => warn!(
                error = %redact_sensitive_data(&err.to_string()),
                "command failed to decode; falling back"
            ),
            other => debug!(
                reason = %redact_sensitive_data(&other.to_string()),
                "no usable command; falling back"
            ),
        }
        let response = self.handler.fallback(text, &mut self.state);
        Dispatched {
            route: Route::Fallback(miss),
            response,
        }
    }
}
