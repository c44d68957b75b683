use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};

use crate::models::overlay::OverlayProvider;
use crate::models::setting::{self, ConfigStore};

pub const MESSAGE_OVERLAY: &str = "Message";
pub const COUNTDOWN_OVERLAY: &str = "Countdown";

/// Free-text banner. Shows the stored projector message.
pub struct MessageOverlay {
    config: Arc<dyn ConfigStore>,
}

impl MessageOverlay {
    pub fn new(config: Arc<dyn ConfigStore>) -> Self {
        Self { config }
    }
}

impl OverlayProvider for MessageOverlay {
    fn discover(&self) -> Option<String> {
        Some(MESSAGE_OVERLAY.to_string())
    }

    fn render(&self, active: &HashSet<String>) -> Option<Value> {
        if !active.contains(MESSAGE_OVERLAY) {
            return None;
        }
        let message = setting::get_str(self.config.as_ref(), setting::PROJECTOR_MESSAGE, "");
        if message.is_empty() {
            return None;
        }
        Some(json!({ "message": message }))
    }
}

/// Countdown timer driven by `countdown_start`, `countdown_run` and
/// `agenda_countdown_time`.
pub struct CountdownOverlay {
    config: Arc<dyn ConfigStore>,
}

impl CountdownOverlay {
    pub fn new(config: Arc<dyn ConfigStore>) -> Self {
        Self { config }
    }

    /// Seconds left at `now` (epoch seconds). A stopped countdown shows its full duration.
    pub fn remaining_at(&self, now: f64) -> i64 {
        let config = self.config.as_ref();
        let duration = setting::get_i64(
            config,
            setting::AGENDA_COUNTDOWN_TIME,
            setting::DEFAULT_COUNTDOWN_TIME,
        );
        if !setting::get_bool(config, setting::COUNTDOWN_RUN, false) {
            return duration;
        }
        let start = setting::get_f64(config, setting::COUNTDOWN_START, now);
        let remaining = start + duration as f64 - now;
        remaining.max(0.0).ceil() as i64
    }
}

impl OverlayProvider for CountdownOverlay {
    fn discover(&self) -> Option<String> {
        Some(COUNTDOWN_OVERLAY.to_string())
    }

    fn render(&self, active: &HashSet<String>) -> Option<Value> {
        if !active.contains(COUNTDOWN_OVERLAY) {
            return None;
        }
        let now = Utc::now().timestamp_millis() as f64 / 1000.0;
        Some(json!({
            "seconds": self.remaining_at(now),
            "running": setting::get_bool(self.config.as_ref(), setting::COUNTDOWN_RUN, false),
        }))
    }
}
