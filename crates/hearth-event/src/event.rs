//! Event type delivered to subscribers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A published event: a topic plus its payload.
///
/// The payload is a [`serde_json::Value`], a tagged union that subscribers
/// inspect with safe accessors (`as_str`, `as_i64`, structured
/// deserialization) instead of casting. A payload of an unexpected shape is
/// an observable `None`, not undefined behavior.
///
/// # Example
///
/// ```
/// use hearth_event::Event;
/// use serde_json::json;
///
/// let ev = Event::new("sensor.temp", json!({ "celsius": 21.5 }));
/// assert_eq!(ev.topic, "sensor.temp");
/// assert_eq!(ev.payload["celsius"], 21.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Topic the event was published on.
    pub topic: String,
    /// Type-erased payload; `Value::Null` for payload-less events.
    pub payload: Value,
}

impl Event {
    /// Creates a new event.
    #[must_use]
    pub fn new(topic: impl Into<String>, payload: impl Into<Value>) -> Self {
        Self {
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.topic, self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    #[test]
    fn payload_accessors_are_safe() {
        let ev = Event::new("net/status", json!({ "connected": true }));
        assert_eq!(ev.payload["connected"].as_bool(), Some(true));
        // Wrong-type access reports None rather than misbehaving.
        assert_eq!(ev.payload["connected"].as_i64(), None);
    }

    #[test]
    fn null_payload() {
        let ev = Event::new("system/ready", Value::Null);
        assert!(ev.payload.is_null());
        assert_eq!(ev.to_string(), "system/ready: null");
    }
}
