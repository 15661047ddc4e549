//! Immutable notification arguments.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// The argument mapping a notification is constructed from.
///
/// Captured once when the notification is built and never mutated afterwards,
/// so every accessor on a [`Notification`](crate::Notification) is a pure
/// function of these values. Cloning is cheap (the map is behind an `Arc`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationArgs(Arc<Map<String, Value>>);

impl NotificationArgs {
    /// Coerce an arbitrary JSON value into an argument mapping.
    ///
    /// Anything other than a JSON object becomes an empty mapping.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(Arc::new(map)),
            _ => Self::default(),
        }
    }

    /// Raw value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// String value for `key`, or `None` if absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Deserialize the value for `key` into `T`.
    ///
    /// Returns `None` when the key is absent or the value does not match the
    /// expected shape.
    pub fn parse<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.0
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for NotificationArgs {
    fn from(map: Map<String, Value>) -> Self {
        Self(Arc::new(map))
    }
}
