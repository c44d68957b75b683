use std::sync::Arc;

use serde_json::json;

use crate::models::record::{Record, RecordStore};
use crate::models::slide::{ModelType, Slide, SlideOptions, SlideRegistryBuilder};

pub const ITEM: ModelType = ModelType {
    name: "item",
    prefix: "item",
    module: module_path!(),
    to_slide: item_slide,
};

fn item_slide(record: &Record) -> Slide {
    Slide::new(record.title.clone(), "agenda/item_slide.html")
        .with("id", record.id)
        .with("text", record.field_str("text"))
}

/// Overview of all agenda items, ordered by their `weight` field.
pub fn overview_slide(records: &dyn RecordStore) -> Slide {
    let mut items = records.list(ITEM.name).unwrap_or_else(|e| {
        log::error!("Failed to load agenda items: {e}");
        Vec::new()
    });
    items.sort_by_key(|item| (item.field_i64("weight").unwrap_or(0), item.id));

    let items: Vec<_> = items
        .iter()
        .map(|item| json!({ "id": item.id, "title": item.title }))
        .collect();
    Slide::new("Agenda", "agenda/overview.html").with("items", items)
}

pub fn register_slides(registry: &mut SlideRegistryBuilder, records: Arc<dyn RecordStore>) {
    registry
        .register_function_slide(
            "agenda",
            module_path!(),
            move || overview_slide(records.as_ref()),
            SlideOptions {
                weight: -10,
                name: "Agenda".to_string(),
                ..Default::default()
            },
        )
        .register_model_slide(ITEM, None, Some("agenda/control_item.html"), 0);
}
