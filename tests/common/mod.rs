//! Shared test infrastructure for projector tests.
//!
//! - `setup_projector()` - projector over in-memory stores with the agenda and
//!   motion slides registered and the built-in overlays installed
//! - `StaticOverlay` - overlay provider returning a fixed payload

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value, json};

use podium::app_state::{build_overlays, build_registry};
use podium::models::overlay::{MemoryOverlays, OverlayProvider, OverlaySet};
use podium::models::record::{MemoryRecords, Record, RecordStore};
use podium::models::setting::{ConfigStore, MemoryConfig};
use podium::models::slide::SlideRegistry;
use podium::projector::Projector;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

pub const EVENT_NAME: &str = "Test Assembly";

// ============================================================================
// FIXTURES
// ============================================================================

pub fn record(model_type: &str, id: i64, title: &str) -> Record {
    Record {
        model_type: model_type.to_string(),
        id,
        title: title.to_string(),
        fields: Map::new(),
    }
}

pub fn record_with(model_type: &str, id: i64, title: &str, fields: Value) -> Record {
    Record {
        fields: fields.as_object().cloned().unwrap_or_default(),
        ..record(model_type, id, title)
    }
}

/// Two agenda items and one motion.
pub fn seeded_records() -> Arc<MemoryRecords> {
    let records = MemoryRecords::new();
    records.insert(record_with("item", 1, "Opening", json!({ "weight": 10 })));
    records.insert(record_with("item", 2, "Elections", json!({ "weight": 5 })));
    records.insert(record_with(
        "motion",
        7,
        "Budget",
        json!({ "number": "A7", "text": "Approve the budget.", "reason": "Required." }),
    ));
    Arc::new(records)
}

pub struct TestProjector {
    pub projector: Projector,
    pub config: Arc<MemoryConfig>,
    pub records: Arc<MemoryRecords>,
}

/// Projector wired the way the server wires it, over in-memory stores.
pub fn setup_projector() -> TestProjector {
    let config = Arc::new(MemoryConfig::with_defaults(EVENT_NAME));
    let records = seeded_records();
    let registry = Arc::new(build_registry(records.clone()));
    let overlays = build_overlays(config.clone());
    let projector = Projector::new(config.clone(), registry, records.clone(), overlays);
    TestProjector {
        projector,
        config,
        records,
    }
}

/// Projector with a custom registry and overlay providers.
pub fn projector_with(
    registry: SlideRegistry,
    records: Arc<dyn RecordStore>,
    providers: Vec<Arc<dyn OverlayProvider>>,
) -> (Projector, Arc<MemoryConfig>) {
    let config = Arc::new(MemoryConfig::with_defaults(EVENT_NAME));
    let mut overlays = OverlaySet::new(Arc::new(MemoryOverlays::new()));
    for provider in providers {
        overlays = overlays.with_provider(provider);
    }
    let store: Arc<dyn ConfigStore> = config.clone();
    (Projector::new(store, Arc::new(registry), records, overlays), config)
}

// ============================================================================
// OVERLAY PROVIDERS
// ============================================================================

/// Provider that always renders `{"overlay": name}` when its name is active.
pub struct StaticOverlay {
    pub name: String,
}

impl StaticOverlay {
    pub fn new(name: &str) -> Arc<dyn OverlayProvider> {
        Arc::new(Self {
            name: name.to_string(),
        })
    }
}

impl OverlayProvider for StaticOverlay {
    fn discover(&self) -> Option<String> {
        Some(self.name.clone())
    }

    fn render(&self, active: &HashSet<String>) -> Option<Value> {
        active
            .contains(&self.name)
            .then(|| json!({ "overlay": self.name }))
    }
}

/// Provider that never applies.
pub struct DormantOverlay;

impl OverlayProvider for DormantOverlay {
    fn discover(&self) -> Option<String> {
        None
    }

    fn render(&self, _active: &HashSet<String>) -> Option<Value> {
        Some(json!({ "unexpected": true }))
    }
}
