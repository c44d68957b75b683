use std::collections::HashMap;
use std::sync::Arc;

use super::types::{
    DEFAULT_FUNCTION_CONTROL_TEMPLATE, DEFAULT_MODEL_CONTROL_TEMPLATE, ModelType, Slide,
    SlideDescriptor, SlideKind, SlideOptions,
};

/// Category of a slide: the first module below the crate root.
///
/// `podium::agenda::slides` → `agenda`. A path without a crate prefix is used as is.
pub fn category_of(module_path: &str) -> String {
    let mut segments = module_path.split("::");
    let first = segments.next().unwrap_or_default();
    segments.next().unwrap_or(first).to_string()
}

/// Mutable registration phase. Feature modules register their slides here
/// once at startup, then `build()` freezes the result.
#[derive(Debug, Default)]
pub struct SlideRegistryBuilder {
    slides: Vec<SlideDescriptor>,
    index: HashMap<String, usize>,
}

impl SlideRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the descriptor for `key`. The last registration wins;
    /// an overwritten key keeps its listing position.
    pub fn register(&mut self, key: &str, mut descriptor: SlideDescriptor) -> &mut Self {
        descriptor.key = key.to_string();
        match self.index.get(key) {
            Some(&pos) => {
                log::warn!(
                    "Slide key '{key}' registered twice ({} replaces {})",
                    descriptor.category,
                    self.slides[pos].category
                );
                self.slides[pos] = descriptor;
            }
            None => {
                self.index.insert(key.to_string(), self.slides.len());
                self.slides.push(descriptor);
            }
        }
        self
    }

    /// Register a model-backed slide. The key defaults to the model prefix.
    pub fn register_model_slide(
        &mut self,
        model: ModelType,
        display_key: Option<&str>,
        control_template: Option<&str>,
        weight: i32,
    ) -> &mut Self {
        let key = display_key.unwrap_or(model.prefix);
        let descriptor = SlideDescriptor {
            key: key.to_string(),
            category: category_of(model.module),
            control_template: control_template
                .unwrap_or(DEFAULT_MODEL_CONTROL_TEMPLATE)
                .to_string(),
            weight,
            kind: SlideKind::Model { model },
        };
        self.register(key, descriptor)
    }

    /// Register a function-backed slide. `module_path` is the caller's `module_path!()`.
    pub fn register_function_slide<F>(
        &mut self,
        key: &str,
        module_path: &str,
        resolver: F,
        options: SlideOptions,
    ) -> &mut Self
    where
        F: Fn() -> Slide + Send + Sync + 'static,
    {
        let descriptor = SlideDescriptor {
            key: key.to_string(),
            category: category_of(module_path),
            control_template: options
                .control_template
                .unwrap_or_else(|| DEFAULT_FUNCTION_CONTROL_TEMPLATE.to_string()),
            weight: options.weight,
            kind: SlideKind::Function {
                resolver: Arc::new(resolver),
                name: options.name,
            },
        };
        self.register(key, descriptor)
    }

    pub fn build(self) -> SlideRegistry {
        log::info!("Slide registry built with {} slide(s)", self.slides.len());
        SlideRegistry {
            slides: self.slides,
            index: self.index,
        }
    }
}

/// Immutable key → descriptor mapping shared by every request.
#[derive(Debug, Default)]
pub struct SlideRegistry {
    slides: Vec<SlideDescriptor>,
    index: HashMap<String, usize>,
}

impl SlideRegistry {
    pub fn lookup(&self, key: &str) -> Option<&SlideDescriptor> {
        self.index.get(key).map(|&pos| &self.slides[pos])
    }

    /// All descriptors in registration order.
    pub fn list_all(&self) -> &[SlideDescriptor] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Slides of one category, ordered by weight.
#[derive(Debug)]
pub struct SlideCategory<'a> {
    pub name: String,
    pub slides: Vec<&'a SlideDescriptor>,
}

/// Group slides by category for the control panel.
///
/// Categories follow `category_order`; categories missing from it are left out.
/// Within a category the sort by weight is stable, so equal weights keep
/// registration order.
pub fn group_by_category<'a>(
    slides: &'a [SlideDescriptor],
    category_order: &[String],
) -> Vec<SlideCategory<'a>> {
    category_order
        .iter()
        .filter_map(|name| {
            let mut members: Vec<&SlideDescriptor> =
                slides.iter().filter(|s| &s.category == name).collect();
            if members.is_empty() {
                return None;
            }
            members.sort_by_key(|s| s.weight);
            Some(SlideCategory {
                name: name.clone(),
                slides: members,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_is_first_module_below_crate_root() {
        assert_eq!(category_of("podium::agenda"), "agenda");
        assert_eq!(category_of("podium::motion::slides"), "motion");
        assert_eq!(category_of("standalone"), "standalone");
    }

    #[test]
    fn grouping_follows_configured_order_and_weight() {
        let mut builder = SlideRegistryBuilder::new();
        let opts = |weight| SlideOptions { weight, ..Default::default() };
        builder
            .register_function_slide("late", "podium::agenda", || Slide::new("Late", "t"), opts(20))
            .register_function_slide("early", "podium::agenda", || Slide::new("Early", "t"), opts(-5))
            .register_function_slide("vote", "podium::motion", || Slide::new("Vote", "t"), opts(0))
            .register_function_slide("hidden", "podium::other", || Slide::new("Hidden", "t"), opts(0));
        let registry = builder.build();

        let order = vec!["motion".to_string(), "agenda".to_string()];
        let groups = group_by_category(registry.list_all(), &order);

        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["motion", "agenda"]);
        let agenda: Vec<&str> = groups[1].slides.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(agenda, vec!["early", "late"]);
    }
}
