//! Adaptive Context - shared UI context and the presentation values derived from it
//!
//! One store per application root holds user preferences, device signals and
//! interaction history. Everything a view renders from it is derived on demand:
//! store → theme derivation → content variant selection → animation profiles.
//!
//! ## Modules
//!
//! - **Store**: Single source of truth with merge-update actions and subscribers
//! - **Device / Interaction**: Observers that feed environment and gesture signals
//!   into the store
//! - **Theme / Adaptive / Animation**: Pure functions from a context snapshot to
//!   presentation values
//! - **Events / Engine**: Replayable event stream driving a complete context

pub mod adaptive;
pub mod animation;
pub mod config;
pub mod device;
pub mod engine;
pub mod error;
pub mod events;
pub mod interaction;
pub mod store;
pub mod theme;
pub mod types;

pub use adaptive::{select_variant, AdaptationCategory, ContentVariants, VariantKey};
pub use animation::{animation_profile, AnimationProfile, AnimationRequest};
pub use config::ContextConfig;
pub use device::{DeviceObserver, Environment, EnvironmentEvent, StaticEnvironment};
pub use engine::ContextEngine;
pub use error::ContextError;
pub use events::{ContextEvent, EventAdapter};
pub use interaction::{ElementSignal, InteractionRecorder, TrackingOptions, TrackingStatus};
pub use store::{ContextStore, SubscriptionId};
pub use theme::{derive_theme, Theme};
pub use types::{Context, ContextAction};

/// Crate version reported by the CLI
pub const ACTX_VERSION: &str = env!("CARGO_PKG_VERSION");
