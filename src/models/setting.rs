use std::collections::HashMap;
use std::sync::RwLock;

use serde_json::Value;

pub const PRESENTATION: &str = "presentation";
pub const PROJECTOR_MESSAGE: &str = "projector_message";
pub const BIGGER: &str = "bigger";
pub const UP: &str = "up";
pub const COUNTDOWN_VISIBLE: &str = "countdown_visible";
pub const COUNTDOWN_RUN: &str = "countdown_run";
pub const COUNTDOWN_START: &str = "countdown_start";
pub const EVENT_NAME: &str = "event_name";
pub const AGENDA_COUNTDOWN_TIME: &str = "agenda_countdown_time";

pub const DEFAULT_BIGGER: i64 = 100;
pub const DEFAULT_UP: i64 = 0;
pub const DEFAULT_COUNTDOWN_TIME: i64 = 60;

/// Shared key-value configuration store.
///
/// Each `get`/`set` is atomic per key; nothing coordinates updates that span
/// several keys.
pub trait ConfigStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value);
}

/// In-process configuration store.
#[derive(Debug, Default)]
pub struct MemoryConfig {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with the projector defaults.
    pub fn with_defaults(event_name: &str) -> Self {
        let store = Self::new();
        for (key, value) in [
            (PRESENTATION, Value::from("")),
            (PROJECTOR_MESSAGE, Value::from("")),
            (BIGGER, Value::from(DEFAULT_BIGGER)),
            (UP, Value::from(DEFAULT_UP)),
            (COUNTDOWN_VISIBLE, Value::from(false)),
            (COUNTDOWN_RUN, Value::from(false)),
            (COUNTDOWN_START, Value::from(0.0)),
            (EVENT_NAME, Value::from(event_name)),
            (AGENDA_COUNTDOWN_TIME, Value::from(DEFAULT_COUNTDOWN_TIME)),
        ] {
            store.set(key, value);
        }
        store
    }
}

impl ConfigStore for MemoryConfig {
    fn get(&self, key: &str) -> Option<Value> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        values.get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value);
    }
}

/// Get a string value, returning `default` if the key is missing or not a string.
pub fn get_str(store: &dyn ConfigStore, key: &str, default: &str) -> String {
    match store.get(key) {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_string(),
    }
}

/// Get an integer value. Numeric strings are accepted, as form submissions
/// store them that way.
pub fn get_i64(store: &dyn ConfigStore, key: &str, default: i64) -> i64 {
    match store.get(key) {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

pub fn get_f64(store: &dyn ConfigStore, key: &str, default: f64) -> f64 {
    match store.get(key) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(default),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
        _ => default,
    }
}

pub fn get_bool(store: &dyn ConfigStore, key: &str, default: bool) -> bool {
    match store.get(key) {
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => matches!(s.as_str(), "true" | "True" | "1" | "on"),
        Some(Value::Number(n)) => n.as_i64().map(|i| i != 0).unwrap_or(default),
        _ => default,
    }
}
