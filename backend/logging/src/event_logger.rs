//! Dispatch Event Logger
//!
//! One structured record per `handle` call, written through `tracing` on the
//! `dispatch_events` target so file layers pick it up as NDJSON.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::redact::redact_sensitive_data;

pub const EVENT_TARGET: &str = "dispatch_events";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DispatchEvent {
    CommandHandled {
        command: String,
        fields_json: String,
    },
    Fallback {
        reason: String,
        responded: bool,
    },
    HandlerFault {
        command: String,
        error_msg: String,
    },
}

impl DispatchEvent {
    fn redacted(mut self) -> Self {
        match &mut self {
            DispatchEvent::CommandHandled { fields_json, .. } => {
                *fields_json = redact_sensitive_data(fields_json);
            }
            DispatchEvent::Fallback { reason, .. } => {
                *reason = redact_sensitive_data(reason);
            }
            DispatchEvent::HandlerFault { error_msg, .. } => {
                *error_msg = redact_sensitive_data(error_msg);
            }
        }
        self
    }
}

#[derive(Debug, Serialize)]
pub struct EventLogEntry {
    pub agent: String,
    pub timestamp: DateTime<Utc>,
    pub event: DispatchEvent,
}

pub struct DispatchEventLogger;

impl DispatchEventLogger {
    /// Build the redacted entry for `event`.
    pub fn entry(agent: &str, event: DispatchEvent) -> EventLogEntry {
        EventLogEntry {
            agent: agent.to_string(),
            timestamp: Utc::now(),
            event: event.redacted(),
        }
    }

    /// Redact and emit `event`.
    pub fn log_event(agent: &str, event: DispatchEvent) {
        let entry = Self::entry(agent, event);
        let json = serde_json::to_string(&entry).unwrap_or_default();
        info!(target: EVENT_TARGET, agent = %entry.agent, entry = %json, "dispatch event");
    }
}
