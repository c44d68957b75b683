use std::collections::HashSet;

use serde::Serialize;
use serde_json::Value;

/// Persisted toggle of one overlay definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayState {
    pub name: String,
    pub active: bool,
    /// `None` shows the overlay on every slide; `Some(sid)` only while that SID is active.
    pub scope_sid: Option<String>,
}

impl OverlayState {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            active: false,
            scope_sid: None,
        }
    }

    pub fn is_visible_on(&self, sid: &str) -> bool {
        self.active && self.scope_sid.as_deref().is_none_or(|scope| scope == sid)
    }
}

/// An overlay as delivered to the projector.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedOverlay {
    pub name: String,
    pub payload: Value,
}

/// Source of one overlay definition.
pub trait OverlayProvider: Send + Sync {
    /// Name of the overlay this provider contributes, or `None` if it does not apply.
    fn discover(&self) -> Option<String>;

    /// Payload for the projector, given the names of all visible overlays.
    /// `None` when this provider has nothing to show.
    fn render(&self, active: &HashSet<String>) -> Option<Value>;
}
