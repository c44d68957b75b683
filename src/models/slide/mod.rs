pub mod registry;
pub mod sid;
pub mod types;

pub use registry::{SlideCategory, SlideRegistry, SlideRegistryBuilder, group_by_category};
pub use sid::resolve;
pub use types::*;
