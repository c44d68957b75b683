use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::record::{Record, StoreError};

pub const DEFAULT_MODEL_CONTROL_TEMPLATE: &str = "projector/default_control_slidemodel.html";
pub const DEFAULT_FUNCTION_CONTROL_TEMPLATE: &str = "projector/default_control_slidefunc.html";

/// Rendering-ready slide content. Built on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    pub title: String,
    pub template: String,
    pub data: Map<String, Value>,
}

impl Slide {
    pub fn new(title: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            template: template.into(),
            data: Map::new(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }
}

/// A record type that can be put on the projector.
#[derive(Debug, Clone, Copy)]
pub struct ModelType {
    /// Record type name in the record store.
    pub name: &'static str,
    /// Default registry key and SID prefix.
    pub prefix: &'static str,
    /// `module_path!()` of the declaring module; the category is derived from it.
    pub module: &'static str,
    pub to_slide: fn(&Record) -> Slide,
}

pub type SlideResolver = Arc<dyn Fn() -> Slide + Send + Sync>;

#[derive(Clone)]
pub enum SlideKind {
    Model { model: ModelType },
    Function { resolver: SlideResolver, name: String },
}

impl fmt::Debug for SlideKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlideKind::Model { model } => f.debug_struct("Model").field("model", &model.name).finish(),
            SlideKind::Function { name, .. } => f.debug_struct("Function").field("name", name).finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SlideDescriptor {
    pub key: String,
    pub category: String,
    pub control_template: String,
    pub weight: i32,
    pub kind: SlideKind,
}

impl SlideDescriptor {
    pub fn is_model_backed(&self) -> bool {
        matches!(self.kind, SlideKind::Model { .. })
    }

    /// Label for the control panel: the function slide's name, or the model type.
    pub fn display_name(&self) -> &str {
        match &self.kind {
            SlideKind::Model { model } => model.name,
            SlideKind::Function { name, .. } if !name.is_empty() => name,
            SlideKind::Function { .. } => &self.key,
        }
    }
}

/// Optional arguments of a function-slide registration.
#[derive(Debug, Clone, Default)]
pub struct SlideOptions {
    pub control_template: Option<String>,
    pub weight: i32,
    pub name: String,
}

/// Parsed slide identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sid {
    /// `"<key>-<id>"`
    Model { key: String, id: i64 },
    /// `"<key>"`
    Function { key: String },
}

#[derive(Debug)]
pub enum SlideError {
    /// The SID cannot be parsed, or its shape does not match the registered slide.
    Malformed(String),
    /// The key is not registered, or the record does not exist.
    NotFound(String),
    /// The active-slide pointer is empty.
    NoActiveSlide,
    Store(StoreError),
}

impl fmt::Display for SlideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlideError::Malformed(sid) => write!(f, "Malformed slide id: {sid:?}"),
            SlideError::NotFound(what) => write!(f, "Slide not found: {what}"),
            SlideError::NoActiveSlide => write!(f, "No active slide"),
            SlideError::Store(e) => write!(f, "Record store error: {e}"),
        }
    }
}

impl std::error::Error for SlideError {}

impl From<StoreError> for SlideError {
    fn from(e: StoreError) -> Self {
        SlideError::Store(e)
    }
}
