//! The shared visual-theme store
//!
//! One owner writes, everyone else reads. All mutations go through
//! [`ThemeStateStore::apply`]; subscribers are notified after the change
//! has been fully committed. Theme variables are written to the
//! [`RootStyle`] as a single batch so a reader can never observe a mix of
//! two themes.

use std::collections::BTreeMap;

use bevy::prelude::*;

use super::toggles::{Flag, SpeedVariant, ToggleState};
use crate::core::errors::EngineError;
use crate::ui::theme_system::{ThemeDefinition, ThemeKey, ThemeRegistry};

/// The custom properties and meta colors currently applied to the root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootStyle {
    properties: BTreeMap<String, String>,
    meta: BTreeMap<String, String>,
    revision: u64,
}

impl RootStyle {
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }

    pub fn meta(&self, name: &str) -> Option<&str> {
        self.meta.get(name).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Number of batches written so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn write_batch(&mut self, definition: &ThemeDefinition) {
        let properties = definition
            .variables()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        let meta = definition
            .meta_colors()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        // Swap whole maps in; nothing is ever half-written
        self.properties = properties;
        self.meta = meta;
        self.revision += 1;
    }
}

/// Every mutation the store accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreAction {
    SetTheme(ThemeKey),
    SetFlag(Flag, bool),
    SetSpeed(SpeedVariant),
}

/// What subscribers are told after a committed change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    ThemeChanged { from: ThemeKey, to: ThemeKey },
    FlagChanged { flag: Flag, value: bool },
    SpeedChanged(SpeedVariant),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(&StoreEvent) + Send + Sync>;

#[derive(Resource)]
pub struct ThemeStateStore {
    registry: ThemeRegistry,
    active: ThemeKey,
    toggles: ToggleState,
    root: RootStyle,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl ThemeStateStore {
    pub fn new(registry: ThemeRegistry, initial: ThemeKey) -> Self {
        let mut root = RootStyle::default();
        root.write_batch(registry.get(initial));
        Self {
            registry,
            active: initial,
            toggles: ToggleState::default(),
            root,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn with_toggles(mut self, toggles: ToggleState) -> Self {
        self.toggles = toggles;
        self
    }

    pub fn active_theme(&self) -> ThemeKey {
        self.active
    }

    pub fn active_definition(&self) -> &ThemeDefinition {
        self.registry.get(self.active)
    }

    pub fn toggles(&self) -> &ToggleState {
        &self.toggles
    }

    pub fn root(&self) -> &RootStyle {
        &self.root
    }

    /// The single mutation entry point. Returns true if state changed.
    pub fn apply(&mut self, action: StoreAction) -> bool {
        let event = match action {
            StoreAction::SetTheme(key) => {
                if key == self.active {
                    return false;
                }
                let from = self.active;
                self.root.write_batch(self.registry.get(key));
                self.active = key;
                debug!("Theme changed: {} -> {}", from, key);
                StoreEvent::ThemeChanged { from, to: key }
            }
            StoreAction::SetFlag(flag, value) => {
                if !self.toggles.set_flag(flag, value) {
                    return false;
                }
                debug!("Toggle '{}' set to {}", flag.label(), value);
                StoreEvent::FlagChanged { flag, value }
            }
            StoreAction::SetSpeed(variant) => {
                if !self.toggles.set_speed_variant(variant) {
                    return false;
                }
                debug!("Speed variant set to {:?}", variant);
                StoreEvent::SpeedChanged(variant)
            }
        };

        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&event);
        }
        true
    }

    pub fn set_theme(&mut self, key: ThemeKey) -> bool {
        self.apply(StoreAction::SetTheme(key))
    }

    /// Set a theme from an untyped name; unknown names are logged and ignored
    pub fn set_theme_by_name(&mut self, name: &str) -> bool {
        match ThemeKey::parse(name) {
            Some(key) => self.set_theme(key),
            None => {
                warn!("{}", EngineError::invalid("theme", name));
                false
            }
        }
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) -> bool {
        self.apply(StoreAction::SetFlag(flag, value))
    }

    pub fn toggle(&mut self, flag: Flag) -> bool {
        let value = !self.toggles.flag(flag);
        self.set_flag(flag, value)
    }

    pub fn set_speed_variant(&mut self, variant: SpeedVariant) -> bool {
        self.apply(StoreAction::SetSpeed(variant))
    }

    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&StoreEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the subscription was already removed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn store() -> ThemeStateStore {
        ThemeStateStore::new(ThemeRegistry::embedded().unwrap(), ThemeKey::Slime)
    }

    #[test]
    fn initial_theme_is_written_to_root() {
        let store = store();
        assert_eq!(store.active_theme(), ThemeKey::Slime);
        assert_eq!(store.root().revision(), 1);
        assert_eq!(
            store.root().property("--color-background"),
            Some(store.active_definition().colors.background.as_str())
        );
    }

    #[test]
    fn set_theme_replaces_the_whole_variable_set() {
        let mut store = store();
        assert!(store.set_theme(ThemeKey::Water));

        let expected: BTreeMap<String, String> = store
            .active_definition()
            .variables()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(store.root().properties(), &expected);
        assert_eq!(
            store.root().meta("theme-color"),
            Some(store.active_definition().colors.background.as_str())
        );
    }

    #[test]
    fn set_theme_twice_is_idempotent() {
        let mut store = store();
        store.set_theme(ThemeKey::Acid);
        let once = store.root().clone();
        assert!(!store.set_theme(ThemeKey::Acid));
        assert_eq!(store.root(), &once);
    }

    #[test]
    fn unknown_theme_name_leaves_state_unchanged() {
        let mut store = store();
        let before = store.root().clone();
        assert!(!store.set_theme_by_name("neon"));
        assert_eq!(store.active_theme(), ThemeKey::Slime);
        assert_eq!(store.root(), &before);
        assert!(store.set_theme_by_name("Bunny"));
        assert_eq!(store.active_theme(), ThemeKey::Bunny);
    }

    #[test]
    fn subscribers_see_committed_changes_until_unsubscribed() {
        let mut store = store();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let id = store.subscribe(move |event| sink.lock().unwrap().push(*event));

        store.set_theme(ThemeKey::Dune);
        store.toggle(Flag::Grid);
        store.set_speed_variant(SpeedVariant::Fast);
        store.set_speed_variant(SpeedVariant::Fast);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_theme(ThemeKey::Slime);

        let events = events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                StoreEvent::ThemeChanged { from: ThemeKey::Slime, to: ThemeKey::Dune },
                StoreEvent::FlagChanged { flag: Flag::Grid, value: true },
                StoreEvent::SpeedChanged(SpeedVariant::Fast),
            ]
        );
    }

    #[test]
    fn redundant_flag_writes_do_not_notify() {
        let mut store = store();
        let count = Arc::new(Mutex::new(0));
        let sink = count.clone();
        store.subscribe(move |_| *sink.lock().unwrap() += 1);

        assert!(!store.set_flag(Flag::Noise, true));
        assert!(store.set_flag(Flag::Noise, false));
        assert_eq!(*count.lock().unwrap(), 1);
    }
}
