//! Adaptive content selection
//!
//! Picks one labeled content variant for the current context. Categories are
//! evaluated in a fixed order (device, theme, interaction, accessibility) and
//! every later match overrides an earlier one.

use crate::types::{Context, DeviceClass};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Interaction counts above this select the `highInteraction` variant
pub const HIGH_INTERACTION_THRESHOLD: u64 = 10;

/// Label of an alternative content variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariantKey {
    Mobile,
    Tablet,
    Desktop,
    Dark,
    Light,
    HighInteraction,
    LowInteraction,
    ReducedMotion,
    HighContrast,
}

/// Context category that may drive a variant choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdaptationCategory {
    Device,
    Theme,
    Interaction,
    Accessibility,
}

impl AdaptationCategory {
    /// All categories, in evaluation order
    pub const ALL: [AdaptationCategory; 4] = [
        AdaptationCategory::Device,
        AdaptationCategory::Theme,
        AdaptationCategory::Interaction,
        AdaptationCategory::Accessibility,
    ];
}

/// A mandatory default plus any subset of labeled alternatives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentVariants<T> {
    pub default: T,
    #[serde(flatten)]
    pub variants: BTreeMap<VariantKey, T>,
}

impl<T> ContentVariants<T> {
    pub fn new(default: T) -> Self {
        Self {
            default,
            variants: BTreeMap::new(),
        }
    }

    /// Add or replace a labeled variant
    pub fn with(mut self, key: VariantKey, value: T) -> Self {
        self.variants.insert(key, value);
        self
    }

    pub fn get(&self, key: VariantKey) -> Option<&T> {
        self.variants.get(&key)
    }

    /// Build full variants by merging partial overrides onto the default
    pub fn with_overrides<P, F>(default: T, overrides: BTreeMap<VariantKey, P>, merge: F) -> Self
    where
        F: Fn(&T, &P) -> T,
    {
        let variants = overrides
            .iter()
            .map(|(key, partial)| (*key, merge(&default, partial)))
            .collect();
        Self { default, variants }
    }

    /// Select the variant for a context, see [`select_variant`]
    pub fn select(&self, categories: &[AdaptationCategory], context: &Context) -> &T {
        select_variant(self, categories, context)
    }
}

impl ContentVariants<String> {
    /// Text variants with the given default
    pub fn text(default: impl Into<String>) -> Self {
        Self::new(default.into())
    }
}

/// Choose the variant for `context`, considering only the enabled categories
pub fn select_variant<'a, T>(
    variants: &'a ContentVariants<T>,
    categories: &[AdaptationCategory],
    context: &Context,
) -> &'a T {
    let enabled = |category: AdaptationCategory| categories.contains(&category);
    let mut selected = &variants.default;

    if enabled(AdaptationCategory::Device) {
        let key = match context.device.device_class {
            DeviceClass::Mobile => VariantKey::Mobile,
            DeviceClass::Tablet => VariantKey::Tablet,
            DeviceClass::Desktop => VariantKey::Desktop,
        };
        if let Some(value) = variants.get(key) {
            selected = value;
        }
    }

    if enabled(AdaptationCategory::Theme) {
        let key = if context.device.dark_mode {
            VariantKey::Dark
        } else {
            VariantKey::Light
        };
        if let Some(value) = variants.get(key) {
            selected = value;
        }
    }

    if enabled(AdaptationCategory::Interaction) {
        let key = if context.interaction.interaction_count > HIGH_INTERACTION_THRESHOLD {
            VariantKey::HighInteraction
        } else {
            VariantKey::LowInteraction
        };
        if let Some(value) = variants.get(key) {
            selected = value;
        }
    }

    if enabled(AdaptationCategory::Accessibility) {
        if context.preferences.reduced_motion {
            if let Some(value) = variants.get(VariantKey::ReducedMotion) {
                selected = value;
            }
        }
        if context.device.high_contrast {
            if let Some(value) = variants.get(VariantKey::HighContrast) {
                selected = value;
            }
        }
    }

    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeviceContext, InteractionContext, Preferences};
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    fn context(device_class: DeviceClass, interaction_count: u64) -> Context {
        let mut interaction = InteractionContext::new("home", Utc::now());
        interaction.interaction_count = interaction_count;
        Context {
            preferences: Preferences::default(),
            device: DeviceContext {
                device_class,
                ..DeviceContext::default()
            },
            interaction,
        }
    }

    fn abc() -> ContentVariants<&'static str> {
        ContentVariants::new("A")
            .with(VariantKey::Mobile, "B")
            .with(VariantKey::HighInteraction, "C")
    }

    #[test]
    fn test_device_match_without_override() {
        let ctx = context(DeviceClass::Mobile, 0);
        assert_eq!(*select_variant(&abc(), &AdaptationCategory::ALL, &ctx), "B");
    }

    #[test]
    fn test_interaction_overrides_device() {
        let ctx = context(DeviceClass::Mobile, 11);
        assert_eq!(*select_variant(&abc(), &AdaptationCategory::ALL, &ctx), "C");
    }

    #[test]
    fn test_threshold_is_strict() {
        let ctx = context(DeviceClass::Desktop, 10);
        assert_eq!(*select_variant(&abc(), &AdaptationCategory::ALL, &ctx), "A");
    }

    #[test]
    fn test_low_interaction_variant() {
        let variants = ContentVariants::new("A").with(VariantKey::LowInteraction, "L");
        let ctx = context(DeviceClass::Desktop, 3);
        assert_eq!(*variants.select(&AdaptationCategory::ALL, &ctx), "L");
    }

    #[test]
    fn test_disabled_categories_are_skipped() {
        let ctx = context(DeviceClass::Mobile, 11);
        let device_only = [AdaptationCategory::Device];
        assert_eq!(*select_variant(&abc(), &device_only, &ctx), "B");
        assert_eq!(*select_variant(&abc(), &[], &ctx), "A");
    }

    #[test]
    fn test_theme_uses_device_dark_mode() {
        let variants = ContentVariants::new("A")
            .with(VariantKey::Dark, "D")
            .with(VariantKey::Light, "L");
        let mut ctx = context(DeviceClass::Desktop, 0);
        assert_eq!(*variants.select(&AdaptationCategory::ALL, &ctx), "L");
        ctx.device.dark_mode = true;
        assert_eq!(*variants.select(&AdaptationCategory::ALL, &ctx), "D");
    }

    #[test]
    fn test_high_contrast_overrides_reduced_motion() {
        let variants = ContentVariants::new("A")
            .with(VariantKey::Mobile, "M")
            .with(VariantKey::ReducedMotion, "R")
            .with(VariantKey::HighContrast, "H");
        let mut ctx = context(DeviceClass::Mobile, 0);
        ctx.preferences.reduced_motion = true;
        assert_eq!(*variants.select(&AdaptationCategory::ALL, &ctx), "R");
        ctx.device.high_contrast = true;
        assert_eq!(*variants.select(&AdaptationCategory::ALL, &ctx), "H");
    }

    #[test]
    fn test_with_overrides_merges_defaults() {
        #[derive(Debug, Clone, PartialEq)]
        struct CardProps {
            title: &'static str,
            show_tags: bool,
        }
        let mut overrides = BTreeMap::new();
        overrides.insert(VariantKey::Mobile, false);

        let variants = ContentVariants::with_overrides(
            CardProps {
                title: "Problem 1",
                show_tags: true,
            },
            overrides,
            |base, show_tags| CardProps {
                show_tags: *show_tags,
                ..base.clone()
            },
        );

        let mobile = variants.get(VariantKey::Mobile).unwrap();
        assert_eq!(mobile.title, "Problem 1");
        assert!(!mobile.show_tags);
    }

    #[test]
    fn test_text_variants_json() {
        let variants: ContentVariants<String> =
            serde_json::from_str(r#"{"default":"Full title","mobile":"Short","highContrast":"HC"}"#).unwrap();
        assert_eq!(
            variants,
            ContentVariants::text("Full title")
                .with(VariantKey::Mobile, "Short".to_string())
                .with(VariantKey::HighContrast, "HC".to_string())
        );
    }
}
