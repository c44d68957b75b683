/// Server settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub bind_addr: String,
    pub event_name: String,
    pub seed_file: Option<String>,
    /// Control-panel category order; slides of other categories are not listed.
    pub categories: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".into(),
            event_name: "OpenSlides".into(),
            seed_file: Some("data/seed/records.json".into()),
            categories: vec!["agenda".into(), "motion".into()],
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup, falling back to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Settings::default();

        if let Some(v) = lookup("PODIUM_BIND") {
            settings.bind_addr = v;
        }
        if let Some(v) = lookup("PODIUM_EVENT_NAME") {
            settings.event_name = v;
        }
        if let Some(v) = lookup("PODIUM_SEED_FILE") {
            settings.seed_file = if v.trim().is_empty() { None } else { Some(v) };
        }
        if let Some(v) = lookup("PODIUM_CATEGORIES") {
            settings.categories = split_list(&v);
        }

        settings
    }
}

/// Split a comma-separated list, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        assert_eq!(Settings::from_lookup(|_| None), Settings::default());
    }

    #[test]
    fn environment_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("PODIUM_BIND", "0.0.0.0:9000"),
            ("PODIUM_EVENT_NAME", "General Assembly"),
            ("PODIUM_SEED_FILE", ""),
            ("PODIUM_CATEGORIES", "motion, agenda,,projector"),
        ]));
        assert_eq!(settings.bind_addr, "0.0.0.0:9000");
        assert_eq!(settings.event_name, "General Assembly");
        assert_eq!(settings.seed_file, None);
        assert_eq!(settings.categories, vec!["motion", "agenda", "projector"]);
    }
}
