//! Parley command layer.
//!
//! Recognizes structured command blocks inside free-form model output and
//! routes each one to a typed handler, leaving everything else to a fallback.

pub mod decode;
pub mod detection;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod types;

pub use decode::{decode, typed_fields, Command};
pub use detection::{detect_candidate, ParsedCandidate};
pub use dispatch::{
    CommandDispatcher, CommandHandler, CommandSet, DecodeFailurePolicy, Dispatched, Route,
};
pub use error::{DecodeError, DispatchError, Miss, SchemaError};
pub use registry::SchemaRegistry;
pub use types::{CommandSchema, FieldDef, FieldType, UsageExample, REQUEST_KEY};
