pub mod types;

pub use types::{OverlayProvider, OverlayState, RenderedOverlay};

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, RwLock};

/// Storage of overlay states, one per definition name.
pub trait OverlayStore: Send + Sync {
    fn get(&self, name: &str) -> Option<OverlayState>;
    fn upsert(&self, state: OverlayState);
    fn all(&self) -> Vec<OverlayState>;

    /// Return the state for `name`, storing an inactive global one if there is
    /// none. Must be atomic with respect to concurrent writes of the same name.
    fn get_or_insert(&self, name: &str) -> OverlayState;
}

#[derive(Debug, Default)]
pub struct MemoryOverlays {
    states: RwLock<BTreeMap<String, OverlayState>>,
}

impl MemoryOverlays {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlayStore for MemoryOverlays {
    fn get(&self, name: &str) -> Option<OverlayState> {
        let states = self.states.read().unwrap_or_else(|e| e.into_inner());
        states.get(name).cloned()
    }

    fn upsert(&self, state: OverlayState) {
        let mut states = self.states.write().unwrap_or_else(|e| e.into_inner());
        states.insert(state.name.clone(), state);
    }

    fn all(&self) -> Vec<OverlayState> {
        let states = self.states.read().unwrap_or_else(|e| e.into_inner());
        states.values().cloned().collect()
    }

    fn get_or_insert(&self, name: &str) -> OverlayState {
        let mut states = self.states.write().unwrap_or_else(|e| e.into_inner());
        states
            .entry(name.to_string())
            .or_insert_with(|| {
                log::debug!("Created overlay state '{name}'");
                OverlayState::new(name)
            })
            .clone()
    }
}

/// Overlay providers in registration order plus their persisted states.
pub struct OverlaySet {
    providers: Vec<Arc<dyn OverlayProvider>>,
    store: Arc<dyn OverlayStore>,
}

impl OverlaySet {
    pub fn new(store: Arc<dyn OverlayStore>) -> Self {
        Self {
            providers: Vec::new(),
            store,
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn OverlayProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Names of all applicable overlay definitions, in provider order.
    pub fn definitions(&self) -> Vec<String> {
        self.providers.iter().filter_map(|p| p.discover()).collect()
    }

    /// Get the state for `name`, creating an inactive global one on first sight.
    pub fn ensure_state(&self, name: &str) -> OverlayState {
        self.store.get_or_insert(name)
    }

    pub fn get(&self, name: &str) -> Option<OverlayState> {
        self.store.get(name)
    }

    pub fn upsert(&self, state: OverlayState) {
        self.store.upsert(state);
    }

    /// States of every discovered overlay, for the control panel.
    pub fn control_states(&self) -> Vec<OverlayState> {
        self.definitions()
            .iter()
            .map(|name| self.ensure_state(name))
            .collect()
    }

    pub fn set_active(&self, name: &str, active: bool) {
        let mut state = self.ensure_state(name);
        state.active = active;
        self.store.upsert(state);
    }

    /// Apply a control-panel submission: checked overlays on, all others off.
    pub fn apply_toggles(&self, checked: &HashSet<String>) {
        for mut state in self.control_states() {
            state.active = checked.contains(&state.name);
            self.store.upsert(state);
        }
    }

    /// Render the overlays visible while `sid` is active.
    ///
    /// Only active states that are global or scoped to `sid` take part.
    /// Output follows provider order; providers returning nothing are skipped.
    pub fn active_overlays_for(&self, sid: &str) -> Vec<RenderedOverlay> {
        let visible: HashSet<String> = self
            .store
            .all()
            .into_iter()
            .filter(|state| state.is_visible_on(sid))
            .map(|state| state.name)
            .collect();
        if visible.is_empty() {
            return Vec::new();
        }

        self.providers
            .iter()
            .filter_map(|provider| {
                let name = provider.discover()?;
                if !visible.contains(&name) {
                    return None;
                }
                let payload = provider.render(&visible)?;
                Some(RenderedOverlay { name, payload })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_state_is_visible_only_on_its_sid() {
        let state = OverlayState {
            name: "Message".into(),
            active: true,
            scope_sid: Some("motion-1".into()),
        };
        assert!(state.is_visible_on("motion-1"));
        assert!(!state.is_visible_on("motion-2"));
        assert!(!state.is_visible_on(""));
    }

    /// Store whose `get` lets another writer land right after the read.
    struct InterleavedStore {
        inner: MemoryOverlays,
        concurrent: OverlayState,
    }

    impl OverlayStore for InterleavedStore {
        fn get(&self, name: &str) -> Option<OverlayState> {
            let seen = self.inner.get(name);
            self.inner.upsert(self.concurrent.clone());
            seen
        }

        fn upsert(&self, state: OverlayState) {
            self.inner.upsert(state);
        }

        fn all(&self) -> Vec<OverlayState> {
            self.inner.all()
        }

        fn get_or_insert(&self, name: &str) -> OverlayState {
            self.inner.upsert(self.concurrent.clone());
            self.inner.get_or_insert(name)
        }
    }

    #[test]
    fn ensure_state_keeps_a_concurrent_toggle() {
        let concurrent = OverlayState {
            active: true,
            ..OverlayState::new("Countdown")
        };
        let store = Arc::new(InterleavedStore {
            inner: MemoryOverlays::new(),
            concurrent: concurrent.clone(),
        });
        let set = OverlaySet::new(store.clone());

        assert_eq!(set.ensure_state("Countdown"), concurrent);
        assert_eq!(store.inner.get("Countdown"), Some(concurrent));
    }

    #[test]
    fn get_or_insert_never_overwrites() {
        let store = Arc::new(MemoryOverlays::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = store.clone();
                std::thread::spawn(move || {
                    if i % 2 == 0 {
                        store.upsert(OverlayState {
                            active: true,
                            ..OverlayState::new("Message")
                        });
                    } else {
                        store.get_or_insert("Message");
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(store.get("Message").unwrap().active);
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn inactive_state_is_never_visible() {
        let mut state = OverlayState::new("Countdown");
        assert!(!state.is_visible_on("agenda"));
        state.scope_sid = Some("agenda".into());
        assert!(!state.is_visible_on("agenda"));
    }
}
