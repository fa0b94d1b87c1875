use thiserror::Error;

/// A schema that violates its own invariants.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("command `{command}`: example references undeclared field `{field}`")]
    UndeclaredExampleField { command: String, field: String },

    #[error("command `{command}`: `request` is reserved for the command name")]
    ReservedField { command: String },

    #[error("command `{command}`: field `{field}` declared twice")]
    DuplicateField { command: String, field: String },

    #[error("command `{command}`: at least one usage example is required")]
    NoExamples { command: String },

    #[error("command `{command}`: example {index} has no trigger phrases")]
    NoTriggerPhrases { command: String, index: usize },
}

/// A structured block named a known command but did not fit its schema.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("command `{command}`: missing required field `{field}`")]
    MissingField { command: String, field: String },

    #[error("command `{command}`: field `{field}` expected {expected}, got {value:?}")]
    InvalidType {
        command: String,
        field: String,
        expected: &'static str,
        value: String,
    },

    #[error("command `{command}`: {source}")]
    Malformed {
        command: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a call was routed to the fallback instead of a command handler.
#[derive(Debug, Error)]
pub enum Miss {
    #[error("no structured block found")]
    ParseMiss,

    #[error("command `{name}` is unknown or disabled")]
    UnknownOrDisabled { name: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Errors surfaced to the caller of `handle`.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("handler for `{command}` failed: {source}")]
    HandlerFault {
        command: String,
        #[source]
        source: anyhow::Error,
    },

    /// Only produced under [`crate::DecodeFailurePolicy::Strict`].
    #[error(transparent)]
    Decode(#[from] DecodeError),
}
