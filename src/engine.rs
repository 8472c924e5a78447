//! Context engine
//!
//! Bundles the store, the device observer and an interaction recorder behind
//! one owner per application root, and applies [`ContextEvent`] records to
//! them. Views read derived values (theme, content variants, animation
//! profiles) from the engine's current snapshot.

use crate::adaptive::{select_variant, AdaptationCategory, ContentVariants};
use crate::animation::{animation_profile, AnimationProfile, AnimationRequest};
use crate::config::ContextConfig;
use crate::device::{DeviceObserver, Environment, StaticEnvironment};
use crate::error::ContextError;
use crate::events::ContextEvent;
use crate::interaction::{InteractionRecorder, TrackingOptions, TrackingStatus};
use crate::store::ContextStore;
use crate::theme::{derive_theme, Theme};
use crate::types::{Context, ContextAction};

/// Stateful owner of one adaptive context
pub struct ContextEngine<E: Environment> {
    store: ContextStore<E>,
    observer: DeviceObserver,
    recorder: InteractionRecorder,
}

impl<E: Environment> ContextEngine<E> {
    pub fn new(environment: E) -> Self {
        Self::with_store(ContextStore::new(environment))
    }

    pub fn with_store(store: ContextStore<E>) -> Self {
        Self {
            store,
            observer: DeviceObserver,
            recorder: InteractionRecorder::new(),
        }
    }

    pub fn context(&self) -> &Context {
        self.store.context()
    }

    pub fn store(&self) -> &ContextStore<E> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ContextStore<E> {
        &mut self.store
    }

    pub fn recorder(&self) -> &InteractionRecorder {
        &self.recorder
    }

    pub fn dispatch(&mut self, action: ContextAction) {
        self.store.dispatch(action);
    }

    pub fn track(&mut self, options: TrackingOptions) -> TrackingStatus {
        let tracker = self.recorder.track(options);
        tracker.status(self.store.context())
    }

    /// Status of a tracked element, `None` if it is not tracked
    pub fn tracking_status(&self, element_id: &str) -> Option<TrackingStatus> {
        self.recorder
            .tracker(element_id)
            .map(|tracker| tracker.status(self.store.context()))
    }

    /// Apply one event
    ///
    /// Returns the element's status for element and track events.
    pub fn apply(&mut self, event: &ContextEvent) -> Result<Option<TrackingStatus>, ContextError> {
        event.validate()?;
        tracing::debug!(kind = event.kind(), "applying context event");

        let status = match event {
            ContextEvent::Action { action } => {
                self.store.dispatch(action.clone());
                None
            }
            ContextEvent::Environment { change } => {
                self.observer.handle(&mut self.store, change);
                None
            }
            ContextEvent::Element { element_id, signal } => {
                let status = self.recorder.handle(&mut self.store, element_id, signal);
                if status.is_none() {
                    tracing::debug!(element = %element_id, "signal for untracked element dropped");
                }
                status
            }
            ContextEvent::PageScroll { position } => {
                self.recorder.record_page_scroll(&mut self.store, *position);
                None
            }
            ContextEvent::DocumentClick { element_id } => {
                self.recorder.record_document_click(&mut self.store, element_id);
                None
            }
            ContextEvent::Track { options } => Some(self.track(options.clone())),
            ContextEvent::Untrack { element_id } => {
                self.recorder.untrack(element_id);
                None
            }
        };
        Ok(status)
    }

    /// Apply events in order, stopping at the first invalid one
    pub fn apply_all(&mut self, events: &[ContextEvent]) -> Result<usize, ContextError> {
        for event in events {
            self.apply(event)?;
        }
        Ok(events.len())
    }

    pub fn theme(&self) -> Theme {
        let context = self.store.context();
        derive_theme(&context.preferences, &context.device)
    }

    pub fn select<'a, T>(
        &self,
        variants: &'a ContentVariants<T>,
        categories: &[AdaptationCategory],
    ) -> &'a T {
        select_variant(variants, categories, self.store.context())
    }

    pub fn animation(&self, request: &AnimationRequest) -> AnimationProfile {
        animation_profile(request, &self.theme())
    }
}

impl ContextEngine<StaticEnvironment> {
    pub fn from_config(config: &ContextConfig) -> Self {
        Self::with_store(ContextStore::from_config(config))
    }
}
