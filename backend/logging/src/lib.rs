//! Structured logging for Parley agents.
//!
//! Subscriber setup (console plus optional rolling JSON file), dispatch event
//! records, and redaction of secrets before anything reaches a log.

pub mod event_logger;
pub mod logger;
pub mod redact;

pub use event_logger::{DispatchEvent, DispatchEventLogger, EventLogEntry};
pub use logger::init_logger;
pub use redact::redact_sensitive_data;
