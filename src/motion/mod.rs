use crate::models::record::Record;
use crate::models::slide::{ModelType, Slide, SlideRegistryBuilder};

pub const MOTION: ModelType = ModelType {
    name: "motion",
    prefix: "motion",
    module: module_path!(),
    to_slide: motion_slide,
};

fn motion_slide(record: &Record) -> Slide {
    Slide::new(record.title.clone(), "motion/slide.html")
        .with("id", record.id)
        .with("number", record.field_str("number"))
        .with("text", record.field_str("text"))
        .with("reason", record.field_str("reason"))
}

pub fn register_slides(registry: &mut SlideRegistryBuilder) {
    registry.register_model_slide(MOTION, None, Some("motion/control_motion.html"), 0);
}
