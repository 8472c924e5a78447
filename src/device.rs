//! Device observation
//!
//! Samples the host environment into a [`DeviceContext`] and turns environment
//! change events into device patches for the context store. There is no
//! polling: the host forwards resize, color-scheme, contrast and connectivity
//! events as they happen.

use crate::store::ContextStore;
use crate::types::{
    Connectivity, ContextAction, DeviceClass, DeviceContext, DevicePatch, Orientation, ScreenSize,
};
use serde::{Deserialize, Serialize};

/// Viewports narrower than this are classified as mobile
pub const MOBILE_MAX_WIDTH: u32 = 768;

/// Viewports narrower than this (and at least [`MOBILE_MAX_WIDTH`]) are tablets
pub const TABLET_MAX_WIDTH: u32 = 1024;

/// Source of environment signals
///
/// Implemented by the host binding (browser, native shell, test harness).
pub trait Environment {
    fn viewport(&self) -> ScreenSize;
    fn prefers_dark(&self) -> bool;
    fn prefers_high_contrast(&self) -> bool;
    fn is_online(&self) -> bool;

    /// Called before an event is dispatched so hosts that cache signals
    /// stay in sync with what the store has seen.
    fn observe(&mut self, _event: &EnvironmentEvent) {}
}

/// Environment change delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EnvironmentEvent {
    Resize { width: u32, height: u32 },
    #[serde(rename_all = "camelCase")]
    ColorSchemeChanged { dark: bool },
    #[serde(rename_all = "camelCase")]
    ContrastChanged { high_contrast: bool },
    Online,
    Offline,
}

/// Fixed environment snapshot that tracks the events it observes
///
/// Used by the CLI, configuration files and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StaticEnvironment {
    pub width: u32,
    pub height: u32,
    pub dark: bool,
    pub high_contrast: bool,
    pub online: bool,
}

impl Default for StaticEnvironment {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 800,
            dark: false,
            high_contrast: false,
            online: true,
        }
    }
}

impl Environment for StaticEnvironment {
    fn viewport(&self) -> ScreenSize {
        ScreenSize::new(self.width, self.height)
    }

    fn prefers_dark(&self) -> bool {
        self.dark
    }

    fn prefers_high_contrast(&self) -> bool {
        self.high_contrast
    }

    fn is_online(&self) -> bool {
        self.online
    }

    fn observe(&mut self, event: &EnvironmentEvent) {
        match *event {
            EnvironmentEvent::Resize { width, height } => {
                self.width = width;
                self.height = height;
            }
            EnvironmentEvent::ColorSchemeChanged { dark } => self.dark = dark,
            EnvironmentEvent::ContrastChanged { high_contrast } => {
                self.high_contrast = high_contrast
            }
            EnvironmentEvent::Online => self.online = true,
            EnvironmentEvent::Offline => self.online = false,
        }
    }
}

/// Classify a viewport width
pub fn classify_width(width: u32) -> DeviceClass {
    if width < MOBILE_MAX_WIDTH {
        DeviceClass::Mobile
    } else if width < TABLET_MAX_WIDTH {
        DeviceClass::Tablet
    } else {
        DeviceClass::Desktop
    }
}

/// Landscape only when strictly wider than tall
pub fn orientation_for(size: ScreenSize) -> Orientation {
    if size.width > size.height {
        Orientation::Landscape
    } else {
        Orientation::Portrait
    }
}

fn connectivity_for(online: bool) -> Connectivity {
    if online {
        Connectivity::Fast
    } else {
        Connectivity::Offline
    }
}

/// Translates environment signals into device context updates
#[derive(Debug, Clone, Copy, Default)]
pub struct DeviceObserver;

impl DeviceObserver {
    /// Sample the environment into a complete device context
    pub fn sample<E: Environment + ?Sized>(env: &E) -> DeviceContext {
        let screen_size = env.viewport();
        DeviceContext {
            device_class: classify_width(screen_size.width),
            orientation: orientation_for(screen_size),
            screen_size,
            dark_mode: env.prefers_dark(),
            high_contrast: env.prefers_high_contrast(),
            connectivity: connectivity_for(env.is_online()),
        }
    }

    /// Device patch carrying only the fields an event changes
    pub fn patch_for(event: &EnvironmentEvent) -> DevicePatch {
        match *event {
            EnvironmentEvent::Resize { width, height } => {
                let size = ScreenSize::new(width, height);
                DevicePatch {
                    screen_size: Some(size),
                    orientation: Some(orientation_for(size)),
                    device_class: Some(classify_width(width)),
                    ..DevicePatch::default()
                }
            }
            EnvironmentEvent::ColorSchemeChanged { dark } => DevicePatch {
                dark_mode: Some(dark),
                ..DevicePatch::default()
            },
            EnvironmentEvent::ContrastChanged { high_contrast } => DevicePatch {
                high_contrast: Some(high_contrast),
                ..DevicePatch::default()
            },
            EnvironmentEvent::Online => DevicePatch {
                connectivity: Some(Connectivity::Fast),
                ..DevicePatch::default()
            },
            EnvironmentEvent::Offline => DevicePatch {
                connectivity: Some(Connectivity::Offline),
                ..DevicePatch::default()
            },
        }
    }

    /// Forward an environment event into the store
    pub fn handle<E: Environment>(&self, store: &mut ContextStore<E>, event: &EnvironmentEvent) {
        store.environment_mut().observe(event);
        let patch = Self::patch_for(event);
        tracing::debug!(?event, "device environment changed");
        store.dispatch(ContextAction::UpdateDevice(patch));
    }
}
