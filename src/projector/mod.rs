//! The projector: which slide is on the shared screen, which overlays sit on
//! top of it, and the view adjustments viewers apply.
//!
//! All state lives in the injected configuration and overlay stores; the
//! `Projector` itself is immutable and shared across requests.

pub mod commands;
pub mod overlays;

pub use commands::{CountdownCommand, ProjectorEdit};

use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::overlay::{OverlaySet, OverlayState, RenderedOverlay};
use crate::models::record::RecordStore;
use crate::models::setting::{self, ConfigStore};
use crate::models::slide::{self, Slide, SlideError, SlideRegistry, group_by_category};

use overlays::MESSAGE_OVERLAY;

pub const DEFAULT_TEMPLATE: &str = "projector/default.html";

/// What a polling viewer receives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectorStatus {
    pub title: String,
    pub template: String,
    pub slide: Map<String, Value>,
    pub overlays: Vec<RenderedOverlay>,
    pub active_overlay: Option<String>,
    /// Wall-clock time, `HH:MM`.
    pub time: String,
    pub bigger: i64,
    pub up: i64,
    pub countdown_visible: bool,
    pub countdown_time: i64,
    pub countdown_running: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlSlide {
    pub key: String,
    pub name: String,
    pub control_template: String,
    pub weight: i32,
    pub model_backed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ControlCategory {
    pub name: String,
    pub slides: Vec<ControlSlide>,
}

/// Everything the control panel shows.
#[derive(Debug, Clone, Serialize)]
pub struct ControlPanel {
    pub active_sid: String,
    pub categories: Vec<ControlCategory>,
    pub overlays: Vec<OverlayState>,
    pub countdown_visible: bool,
    pub countdown_time: i64,
}

pub struct Projector {
    config: Arc<dyn ConfigStore>,
    registry: Arc<SlideRegistry>,
    records: Arc<dyn RecordStore>,
    overlays: OverlaySet,
}

impl Projector {
    pub fn new(
        config: Arc<dyn ConfigStore>,
        registry: Arc<SlideRegistry>,
        records: Arc<dyn RecordStore>,
        overlays: OverlaySet,
    ) -> Self {
        Self {
            config,
            registry,
            records,
            overlays,
        }
    }

    pub fn overlays(&self) -> &OverlaySet {
        &self.overlays
    }

    pub fn registry(&self) -> &SlideRegistry {
        &self.registry
    }

    fn config(&self) -> &dyn ConfigStore {
        self.config.as_ref()
    }

    // ------------------------------------------------------------------
    // Active slide
    // ------------------------------------------------------------------

    /// The active SID, empty if none is set.
    pub fn active_sid(&self) -> String {
        setting::get_str(self.config(), setting::PRESENTATION, "")
    }

    /// Point the projector at `sid`. Not validated; an unresolvable SID
    /// simply shows the default slide.
    pub fn set_active_sid(&self, sid: &str) {
        self.config.set(setting::PRESENTATION, Value::from(sid));
        log::info!("Projector switched to '{sid}'");
    }

    pub fn resolve(&self, sid: &str) -> Result<Slide, SlideError> {
        slide::resolve(&self.registry, self.records.as_ref(), sid)
    }

    pub fn try_active_slide(&self) -> Result<Slide, SlideError> {
        let sid = self.active_sid();
        if sid.is_empty() {
            return Err(SlideError::NoActiveSlide);
        }
        self.resolve(&sid)
    }

    /// The active slide, or `None` when nothing usable is active.
    pub fn active_slide(&self) -> Option<Slide> {
        match self.try_active_slide() {
            Ok(slide) => Some(slide),
            Err(SlideError::NoActiveSlide) => None,
            Err(e) => {
                log::warn!("Active slide unavailable: {e}");
                None
            }
        }
    }

    fn default_slide(&self) -> Slide {
        Slide::new(
            setting::get_str(self.config(), setting::EVENT_NAME, ""),
            DEFAULT_TEMPLATE,
        )
    }

    // ------------------------------------------------------------------
    // Status
    // ------------------------------------------------------------------

    pub fn status<Tz>(&self, now: DateTime<Tz>) -> ProjectorStatus
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let slide = self.active_slide().unwrap_or_else(|| self.default_slide());
        let overlays = self.overlays.active_overlays_for(&self.active_sid());
        let active_overlay = overlays.first().map(|o| o.name.clone());
        let config = self.config();

        ProjectorStatus {
            title: slide.title,
            template: slide.template,
            slide: slide.data,
            overlays,
            active_overlay,
            time: now.format("%H:%M").to_string(),
            bigger: setting::get_i64(config, setting::BIGGER, setting::DEFAULT_BIGGER),
            up: setting::get_i64(config, setting::UP, setting::DEFAULT_UP),
            countdown_visible: setting::get_bool(config, setting::COUNTDOWN_VISIBLE, false),
            countdown_time: setting::get_i64(
                config,
                setting::AGENDA_COUNTDOWN_TIME,
                setting::DEFAULT_COUNTDOWN_TIME,
            ),
            countdown_running: setting::get_bool(config, setting::COUNTDOWN_RUN, false),
        }
    }

    // ------------------------------------------------------------------
    // Control surface
    // ------------------------------------------------------------------

    pub fn edit(&self, edit: ProjectorEdit) {
        let config = self.config();
        let bigger = setting::get_i64(config, setting::BIGGER, setting::DEFAULT_BIGGER);
        let up = setting::get_i64(config, setting::UP, setting::DEFAULT_UP);
        match edit {
            ProjectorEdit::Bigger => config.set(setting::BIGGER, Value::from(bigger + 10)),
            ProjectorEdit::Smaller => config.set(setting::BIGGER, Value::from(bigger - 10)),
            ProjectorEdit::Up => config.set(setting::UP, Value::from(up - 10)),
            ProjectorEdit::Down => config.set(setting::UP, Value::from(up + 10)),
            ProjectorEdit::Clean => {
                config.set(setting::UP, Value::from(setting::DEFAULT_UP));
                config.set(setting::BIGGER, Value::from(setting::DEFAULT_BIGGER));
            }
        }
    }

    /// Apply a countdown command. `now` is epoch seconds, used by `Reset`.
    pub fn countdown(&self, command: CountdownCommand, now: f64) {
        let config = self.config();
        match command {
            CountdownCommand::Show => config.set(setting::COUNTDOWN_VISIBLE, Value::from(true)),
            CountdownCommand::Hide => config.set(setting::COUNTDOWN_VISIBLE, Value::from(false)),
            CountdownCommand::Reset => config.set(setting::COUNTDOWN_START, Value::from(now)),
            CountdownCommand::Start => config.set(setting::COUNTDOWN_RUN, Value::from(true)),
            CountdownCommand::Stop => config.set(setting::COUNTDOWN_RUN, Value::from(false)),
        }
    }

    pub fn countdown_visible(&self) -> bool {
        setting::get_bool(self.config(), setting::COUNTDOWN_VISIBLE, false)
    }

    /// Store the projector message and scope the `Message` overlay to `sid`
    /// (global when `None`). A new overlay state starts active; an existing
    /// one keeps its toggle.
    pub fn set_message(&self, message: &str, sid: Option<&str>) {
        self.config.set(setting::PROJECTOR_MESSAGE, Value::from(message));
        let mut state = self.overlays.get(MESSAGE_OVERLAY).unwrap_or_else(|| OverlayState {
            active: true,
            ..OverlayState::new(MESSAGE_OVERLAY)
        });
        state.scope_sid = sid.map(str::to_string);
        self.overlays.upsert(state);
    }

    /// Clear the message text. The overlay state stays.
    pub fn delete_message(&self) {
        self.config.set(setting::PROJECTOR_MESSAGE, Value::from(""));
    }

    pub fn control_panel(&self, category_order: &[String]) -> ControlPanel {
        let categories = group_by_category(self.registry.list_all(), category_order)
            .into_iter()
            .map(|category| ControlCategory {
                name: category.name,
                slides: category
                    .slides
                    .into_iter()
                    .map(|s| ControlSlide {
                        key: s.key.clone(),
                        name: s.display_name().to_string(),
                        control_template: s.control_template.clone(),
                        weight: s.weight,
                        model_backed: s.is_model_backed(),
                    })
                    .collect(),
            })
            .collect();

        ControlPanel {
            active_sid: self.active_sid(),
            categories,
            overlays: self.overlays.control_states(),
            countdown_visible: self.countdown_visible(),
            countdown_time: setting::get_i64(
                self.config(),
                setting::AGENDA_COUNTDOWN_TIME,
                setting::DEFAULT_COUNTDOWN_TIME,
            ),
        }
    }
}
