//! Interaction recording
//!
//! Tracks gestures on named elements and folds them into the shared
//! interaction context. Every tracked element feeds the same global counter
//! and history; there are no per-element counters.

use crate::device::Environment;
use crate::store::ContextStore;
use crate::types::{ActionKind, Context, ContextAction, InteractionPatch, InteractionRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fraction of an element that must be inside the viewport to make it the
/// active section
pub const VISIBILITY_THRESHOLD: f64 = 0.5;

/// Which signal kinds are recorded for one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingOptions {
    pub element_id: String,
    #[serde(default = "enabled")]
    pub track_hover: bool,
    #[serde(default = "enabled")]
    pub track_click: bool,
    #[serde(default)]
    pub track_focus: bool,
    #[serde(default)]
    pub track_scroll: bool,
    #[serde(default)]
    pub track_in_view: bool,
}

fn enabled() -> bool {
    true
}

impl TrackingOptions {
    /// Hover and click tracking on, everything else off
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
            track_hover: true,
            track_click: true,
            track_focus: false,
            track_scroll: false,
            track_in_view: false,
        }
    }

    pub fn hover(mut self, on: bool) -> Self {
        self.track_hover = on;
        self
    }

    pub fn click(mut self, on: bool) -> Self {
        self.track_click = on;
        self
    }

    pub fn focus(mut self, on: bool) -> Self {
        self.track_focus = on;
        self
    }

    pub fn scroll(mut self, on: bool) -> Self {
        self.track_scroll = on;
        self
    }

    pub fn in_view(mut self, on: bool) -> Self {
        self.track_in_view = on;
        self
    }
}

/// Signal observed on a tracked element
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ElementSignal {
    Click,
    PointerEnter,
    Focus,
    Scroll,
    /// Intersection ratio reported by the host, 0.0 - 1.0
    Visibility { ratio: f64 },
}

/// What a tracked element reports back to its view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingStatus {
    pub interaction_count: u64,
    pub is_active_section: bool,
}

/// Tracker for a single element
#[derive(Debug, Clone)]
pub struct ElementTracker {
    options: TrackingOptions,
}

impl ElementTracker {
    pub fn new(options: TrackingOptions) -> Self {
        Self { options }
    }

    pub fn element_id(&self) -> &str {
        &self.options.element_id
    }

    /// Gesture kind recorded for a signal, if that kind is enabled
    fn action_for(&self, signal: &ElementSignal) -> Option<ActionKind> {
        match signal {
            ElementSignal::Click if self.options.track_click => Some(ActionKind::Click),
            ElementSignal::PointerEnter if self.options.track_hover => Some(ActionKind::Hover),
            ElementSignal::Focus if self.options.track_focus => Some(ActionKind::Input),
            ElementSignal::Scroll if self.options.track_scroll => Some(ActionKind::Scroll),
            _ => None,
        }
    }

    /// Apply a signal to the store; returns true if the context changed
    pub fn handle<E: Environment>(&self, store: &mut ContextStore<E>, signal: &ElementSignal) -> bool {
        if let ElementSignal::Visibility { ratio } = *signal {
            if !self.options.track_in_view || ratio.is_nan() || ratio < VISIBILITY_THRESHOLD {
                return false;
            }
            tracing::debug!(element = self.element_id(), ratio, "section in view");
            store.dispatch(ContextAction::UpdateInteraction(InteractionPatch {
                active_section: Some(self.options.element_id.clone()),
                ..InteractionPatch::default()
            }));
            return true;
        }

        match self.action_for(signal) {
            Some(action) => {
                record(store, self.element_id(), action);
                true
            }
            None => false,
        }
    }

    pub fn is_active_section(&self, context: &Context) -> bool {
        context.interaction.active_section == self.options.element_id
    }

    pub fn status(&self, context: &Context) -> TrackingStatus {
        TrackingStatus {
            interaction_count: context.interaction.interaction_count,
            is_active_section: self.is_active_section(context),
        }
    }
}

/// Append one gesture, bump the counter and refresh `last_active_at`
fn record<E: Environment>(store: &mut ContextStore<E>, element_id: &str, action: ActionKind) {
    let now = store.now();
    let count = store.context().interaction.interaction_count.saturating_add(1);
    tracing::debug!(element = element_id, ?action, count, "interaction recorded");
    store.dispatch(ContextAction::UpdateInteraction(InteractionPatch {
        last_active_at: Some(now),
        interaction_count: Some(count),
        append: Some(InteractionRecord::new(element_id, action, now)),
        ..InteractionPatch::default()
    }));
}

/// Registry of element trackers owned by a view
///
/// Dropping the recorder releases every tracker it holds.
#[derive(Debug, Clone, Default)]
pub struct InteractionRecorder {
    trackers: HashMap<String, ElementTracker>,
}

impl InteractionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an element, replacing any previous options for it
    pub fn track(&mut self, options: TrackingOptions) -> &ElementTracker {
        let id = options.element_id.clone();
        tracing::debug!(element = %id, "tracking element");
        self.trackers.insert(id.clone(), ElementTracker::new(options));
        &self.trackers[&id]
    }

    /// Stop tracking an element; returns false if it was not tracked
    pub fn untrack(&mut self, element_id: &str) -> bool {
        self.trackers.remove(element_id).is_some()
    }

    pub fn tracker(&self, element_id: &str) -> Option<&ElementTracker> {
        self.trackers.get(element_id)
    }

    pub fn tracked_count(&self) -> usize {
        self.trackers.len()
    }

    /// Route a signal to the element's tracker
    ///
    /// Returns `None` when the element is not tracked; signals for untracked
    /// elements are dropped.
    pub fn handle<E: Environment>(
        &self,
        store: &mut ContextStore<E>,
        element_id: &str,
        signal: &ElementSignal,
    ) -> Option<TrackingStatus> {
        let tracker = self.trackers.get(element_id)?;
        tracker.handle(store, signal);
        Some(tracker.status(store.context()))
    }

    /// Document-level scroll: updates position and activity time, not the counter
    pub fn record_page_scroll<E: Environment>(&self, store: &mut ContextStore<E>, position: u32) {
        let now = store.now();
        store.dispatch(ContextAction::UpdateInteraction(InteractionPatch {
            scroll_position: Some(position),
            last_active_at: Some(now),
            ..InteractionPatch::default()
        }));
    }

    /// Document-level click on an element that may not be tracked
    pub fn record_document_click<E: Environment>(&self, store: &mut ContextStore<E>, element_id: &str) {
        record(store, element_id, ActionKind::Click);
    }
}
