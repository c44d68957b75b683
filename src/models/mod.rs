pub mod overlay;
pub mod record;
pub mod setting;
pub mod slide;
