use std::sync::Arc;

use crate::config::Settings;
use crate::models::overlay::{MemoryOverlays, OverlaySet};
use crate::models::record::RecordStore;
use crate::models::setting::{ConfigStore, MemoryConfig};
use crate::models::slide::{SlideRegistry, SlideRegistryBuilder};
use crate::projector::Projector;
use crate::projector::overlays::{CountdownOverlay, MessageOverlay};
use crate::{agenda, motion};

/// Shared state handed to every request handler.
pub struct AppState {
    pub projector: Projector,
    pub settings: Settings,
}

/// Run every feature module's slide registration, in a fixed order.
pub fn build_registry(records: Arc<dyn RecordStore>) -> SlideRegistry {
    let mut builder = SlideRegistryBuilder::new();
    agenda::register_slides(&mut builder, records);
    motion::register_slides(&mut builder);
    builder.build()
}

/// Overlay providers in display order: countdown below the message banner.
pub fn build_overlays(config: Arc<dyn ConfigStore>) -> OverlaySet {
    OverlaySet::new(Arc::new(MemoryOverlays::new()))
        .with_provider(Arc::new(CountdownOverlay::new(config.clone())))
        .with_provider(Arc::new(MessageOverlay::new(config)))
}

impl AppState {
    pub fn new(settings: Settings, records: Arc<dyn RecordStore>) -> Self {
        let config: Arc<dyn ConfigStore> = Arc::new(MemoryConfig::with_defaults(&settings.event_name));
        let registry = Arc::new(build_registry(records.clone()));
        let overlays = build_overlays(config.clone());
        let projector = Projector::new(config, registry, records, overlays);
        Self { projector, settings }
    }
}
