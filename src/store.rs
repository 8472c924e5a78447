//! Context store
//!
//! The store owns the one [`Context`] for an application root. All writes go
//! through [`ContextStore::dispatch`]; readers borrow the current snapshot.
//! Subscribers are notified synchronously after every dispatch, in
//! registration order.

use crate::config::ContextConfig;
use crate::device::{DeviceObserver, Environment, StaticEnvironment};
use crate::types::{Context, ContextAction, InteractionContext, Preferences, DEFAULT_ACTIVE_SECTION};
use chrono::{DateTime, Utc};
use std::fmt;

/// Handle returned by [`ContextStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Context, &ContextAction)>;

/// Owner of the process-wide adaptive context
pub struct ContextStore<E: Environment> {
    context: Context,
    environment: E,
    default_preferences: Preferences,
    initial_section: String,
    clock: fn() -> DateTime<Utc>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<E: Environment> ContextStore<E> {
    /// Create a store with default preferences, sampling the environment
    pub fn new(environment: E) -> Self {
        Self::with_defaults(environment, Preferences::default(), DEFAULT_ACTIVE_SECTION)
    }

    /// Create a store with custom startup preferences and active section
    pub fn with_defaults(
        environment: E,
        preferences: Preferences,
        initial_section: impl Into<String>,
    ) -> Self {
        let initial_section = initial_section.into();
        let clock: fn() -> DateTime<Utc> = Utc::now;
        let context = Self::initial_context(&environment, preferences, &initial_section, clock());
        Self {
            context,
            environment,
            default_preferences: preferences,
            initial_section,
            clock,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Replace the time source and restamp the current interaction state
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self.context.interaction.last_active_at = clock();
        self
    }

    fn initial_context(
        environment: &E,
        preferences: Preferences,
        initial_section: &str,
        now: DateTime<Utc>,
    ) -> Context {
        Context {
            preferences,
            device: DeviceObserver::sample(environment),
            interaction: InteractionContext::new(initial_section, now),
        }
    }

    /// Current snapshot
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn environment(&self) -> &E {
        &self.environment
    }

    pub fn environment_mut(&mut self) -> &mut E {
        &mut self.environment
    }

    /// Current time according to the store's clock
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Apply an update request and notify subscribers
    pub fn dispatch(&mut self, action: ContextAction) {
        match &action {
            ContextAction::UpdatePreferences(patch) => patch.apply(&mut self.context.preferences),
            ContextAction::UpdateDevice(patch) => patch.apply(&mut self.context.device),
            ContextAction::UpdateInteraction(patch) => patch.apply(&mut self.context.interaction),
            ContextAction::Reset => {
                self.context = Self::initial_context(
                    &self.environment,
                    self.default_preferences,
                    &self.initial_section,
                    (self.clock)(),
                );
            }
        }
        tracing::debug!(
            action = action.name(),
            interaction_count = self.context.interaction.interaction_count,
            "context updated"
        );

        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.context, &action);
        }
    }

    /// Register a callback invoked after every dispatch
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Context, &ContextAction) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a subscriber; returns false if the id was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ContextStore<StaticEnvironment> {
    /// Build a store from a loaded configuration
    pub fn from_config(config: &ContextConfig) -> Self {
        Self::with_defaults(
            config.environment,
            config.preferences,
            config.initial_section.clone(),
        )
    }
}

impl<E: Environment + fmt::Debug> fmt::Debug for ContextStore<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextStore")
            .field("context", &self.context)
            .field("environment", &self.environment)
            .field("subscribers", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ActionKind, ColorMode, DeviceClass, DevicePatch, FontSize, InteractionPatch,
        InteractionRecord, PreferencesPatch, ThemePreference,
    };
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn store() -> ContextStore<StaticEnvironment> {
        ContextStore::new(StaticEnvironment::default()).with_clock(fixed_now)
    }

    #[test]
    fn test_update_preferences_round_trip() {
        let mut store = store();
        store.dispatch(ContextAction::UpdatePreferences(PreferencesPatch {
            theme: Some(ThemePreference::Dark),
            color_mode: Some(ColorMode::Deuteranopia),
            ..Default::default()
        }));
        let before = store.context().preferences;

        store.dispatch(ContextAction::UpdatePreferences(PreferencesPatch {
            font_size: Some(FontSize::Large),
            ..Default::default()
        }));

        let after = store.context().preferences;
        assert_eq!(after.font_size, FontSize::Large);
        assert_eq!(
            after,
            Preferences {
                font_size: FontSize::Large,
                ..before
            }
        );
    }

    #[test]
    fn test_update_device_leaves_other_fields() {
        let mut store = store();
        let before = store.context().device;
        store.dispatch(ContextAction::UpdateDevice(DevicePatch {
            dark_mode: Some(true),
            ..Default::default()
        }));
        let after = store.context().device;
        assert!(after.dark_mode);
        assert_eq!(after.screen_size, before.screen_size);
        assert_eq!(after.device_class, before.device_class);
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut store = store();
        store.dispatch(ContextAction::UpdatePreferences(PreferencesPatch {
            reduced_motion: Some(true),
            ..Default::default()
        }));
        store.dispatch(ContextAction::UpdateInteraction(InteractionPatch {
            interaction_count: Some(4),
            append: Some(InteractionRecord::new("card-1", ActionKind::Click, fixed_now())),
            ..Default::default()
        }));

        store.dispatch(ContextAction::Reset);
        let once = store.context().clone();
        store.dispatch(ContextAction::Reset);
        assert_eq!(store.context(), &once);

        assert_eq!(once.preferences, Preferences::default());
        assert_eq!(once.interaction.interaction_count, 0);
        assert!(once.interaction.interaction_history.is_empty());
        assert_eq!(once.interaction.active_section, "home");
    }

    #[test]
    fn test_reset_resamples_environment() {
        let mut store = store();
        assert_eq!(store.context().device.device_class, DeviceClass::Desktop);

        // Environment changes without an event reaching the store.
        store.environment_mut().width = 400;
        assert_eq!(store.context().device.device_class, DeviceClass::Desktop);

        store.dispatch(ContextAction::Reset);
        assert_eq!(store.context().device.device_class, DeviceClass::Mobile);
    }

    #[test]
    fn test_reset_restores_configured_defaults() {
        let config = ContextConfig {
            preferences: Preferences {
                theme: ThemePreference::Dark,
                ..Preferences::default()
            },
            initial_section: "intro".to_string(),
            ..ContextConfig::default()
        };
        let mut store = ContextStore::from_config(&config);
        store.dispatch(ContextAction::UpdatePreferences(PreferencesPatch {
            theme: Some(ThemePreference::Light),
            ..Default::default()
        }));
        store.dispatch(ContextAction::Reset);
        assert_eq!(store.context().preferences.theme, ThemePreference::Dark);
        assert_eq!(store.context().interaction.active_section, "intro");
    }

    #[test]
    fn test_subscribers_notified_in_order() {
        let mut store = store();
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();

        let first = Rc::clone(&seen);
        let id = store.subscribe(move |_, action| first.borrow_mut().push(format!("a:{}", action.name())));
        let second = Rc::clone(&seen);
        store.subscribe(move |ctx, _| {
            second
                .borrow_mut()
                .push(format!("b:{}", ctx.preferences.font_size.as_str()))
        });

        store.dispatch(ContextAction::UpdatePreferences(PreferencesPatch {
            font_size: Some(FontSize::Small),
            ..Default::default()
        }));
        assert_eq!(*seen.borrow(), vec!["a:update_preferences", "b:small"]);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.dispatch(ContextAction::Reset);
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(store.subscriber_count(), 1);
    }
}
