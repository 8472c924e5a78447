//! Core types for the adaptive context
//!
//! This module defines the three state slices owned by the context store
//! (preferences, device, interaction), the partial patches used to update
//! them, and the actions the store's reducer accepts.

use crate::error::ContextError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::str::FromStr;

/// Maximum number of entries retained in the interaction history
pub const HISTORY_CAPACITY: usize = 10;

/// Section that is active before any element scrolls into view
pub const DEFAULT_ACTIVE_SECTION: &str = "home";

/// User-selected theme
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    Light,
    Dark,
    #[default]
    System,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
            ThemePreference::System => "system",
        }
    }
}

impl FromStr for ThemePreference {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            "system" => Ok(ThemePreference::System),
            other => Err(unknown("theme", other)),
        }
    }
}

/// Global animation speed preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl AnimationSpeed {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationSpeed::Slow => "slow",
            AnimationSpeed::Normal => "normal",
            AnimationSpeed::Fast => "fast",
        }
    }
}

impl FromStr for AnimationSpeed {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slow" => Ok(AnimationSpeed::Slow),
            "normal" => Ok(AnimationSpeed::Normal),
            "fast" => Ok(AnimationSpeed::Fast),
            other => Err(unknown("animation speed", other)),
        }
    }
}

/// Base font size preference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl FontSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }
}

impl FromStr for FontSize {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "small" => Ok(FontSize::Small),
            "medium" => Ok(FontSize::Medium),
            "large" => Ok(FontSize::Large),
            other => Err(unknown("font size", other)),
        }
    }
}

/// Color-vision adjustment applied on top of the base palette
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Default,
    Protanopia,
    Deuteranopia,
    Tritanopia,
}

impl ColorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorMode::Default => "default",
            ColorMode::Protanopia => "protanopia",
            ColorMode::Deuteranopia => "deuteranopia",
            ColorMode::Tritanopia => "tritanopia",
        }
    }
}

impl FromStr for ColorMode {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "default" => Ok(ColorMode::Default),
            "protanopia" => Ok(ColorMode::Protanopia),
            "deuteranopia" => Ok(ColorMode::Deuteranopia),
            "tritanopia" => Ok(ColorMode::Tritanopia),
            other => Err(unknown("color mode", other)),
        }
    }
}

/// Coarse device classification derived from viewport width
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Desktop => "desktop",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// Network reachability as seen by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    Offline,
    Slow,
    #[default]
    Fast,
}

impl Connectivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Connectivity::Offline => "offline",
            Connectivity::Slow => "slow",
            Connectivity::Fast => "fast",
        }
    }
}

/// Kind of gesture recorded in the interaction history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Click,
    Hover,
    Scroll,
    Input,
}

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// User-controlled display and accessibility settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub theme: ThemePreference,
    pub animation_speed: AnimationSpeed,
    pub reduced_motion: bool,
    pub font_size: FontSize,
    pub color_mode: ColorMode,
}

/// Environment-derived device signals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceContext {
    pub device_class: DeviceClass,
    pub orientation: Orientation,
    pub screen_size: ScreenSize,
    pub dark_mode: bool,
    pub high_contrast: bool,
    pub connectivity: Connectivity,
}

/// One recorded gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionRecord {
    pub element_id: String,
    pub action: ActionKind,
    pub timestamp: DateTime<Utc>,
}

impl InteractionRecord {
    pub fn new(element_id: impl Into<String>, action: ActionKind, timestamp: DateTime<Utc>) -> Self {
        Self {
            element_id: element_id.into(),
            action,
            timestamp,
        }
    }
}

/// Most recent interactions, oldest first, capped at [`HISTORY_CAPACITY`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<InteractionRecord>", into = "Vec<InteractionRecord>")]
pub struct InteractionHistory {
    entries: VecDeque<InteractionRecord>,
}

impl InteractionHistory {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY),
        }
    }

    /// Append a record, evicting the oldest entry when full
    pub fn push(&mut self, record: InteractionRecord) {
        if self.entries.len() == HISTORY_CAPACITY {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::trace!(element = %evicted.element_id, "evicted oldest interaction");
            }
        }
        self.entries.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &InteractionRecord> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&InteractionRecord> {
        self.entries.back()
    }
}

impl From<Vec<InteractionRecord>> for InteractionHistory {
    fn from(records: Vec<InteractionRecord>) -> Self {
        let mut history = Self::new();
        for record in records {
            history.push(record);
        }
        history
    }
}

impl From<InteractionHistory> for Vec<InteractionRecord> {
    fn from(history: InteractionHistory) -> Self {
        history.entries.into()
    }
}

/// Recorded gesture history and counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionContext {
    pub last_active_at: DateTime<Utc>,
    pub active_section: String,
    pub scroll_position: u32,
    pub interaction_count: u64,
    pub interaction_history: InteractionHistory,
}

impl InteractionContext {
    /// Empty interaction state starting at `now`
    pub fn new(active_section: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            last_active_at: now,
            active_section: active_section.into(),
            scroll_position: 0,
            interaction_count: 0,
            interaction_history: InteractionHistory::new(),
        }
    }
}

/// The combined state owned by the context store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub preferences: Preferences,
    pub device: DeviceContext,
    pub interaction: InteractionContext,
}

/// Partial preferences; `None` fields are left untouched on merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemePreference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation_speed: Option<AnimationSpeed>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduced_motion: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<FontSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_mode: Option<ColorMode>,
}

impl PreferencesPatch {
    pub fn apply(&self, target: &mut Preferences) {
        if let Some(theme) = self.theme {
            target.theme = theme;
        }
        if let Some(speed) = self.animation_speed {
            target.animation_speed = speed;
        }
        if let Some(reduced) = self.reduced_motion {
            target.reduced_motion = reduced;
        }
        if let Some(size) = self.font_size {
            target.font_size = size;
        }
        if let Some(mode) = self.color_mode {
            target.color_mode = mode;
        }
    }
}

/// Partial device context; `None` fields are left untouched on merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevicePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_class: Option<DeviceClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screen_size: Option<ScreenSize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_contrast: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connectivity: Option<Connectivity>,
}

impl DevicePatch {
    pub fn apply(&self, target: &mut DeviceContext) {
        if let Some(class) = self.device_class {
            target.device_class = class;
        }
        if let Some(orientation) = self.orientation {
            target.orientation = orientation;
        }
        if let Some(size) = self.screen_size {
            target.screen_size = size;
        }
        if let Some(dark) = self.dark_mode {
            target.dark_mode = dark;
        }
        if let Some(contrast) = self.high_contrast {
            target.high_contrast = contrast;
        }
        if let Some(connectivity) = self.connectivity {
            target.connectivity = connectivity;
        }
    }
}

/// Partial interaction context
///
/// `interaction_history` replaces the whole history (trimmed to the newest
/// [`HISTORY_CAPACITY`] entries); `append` pushes a single record in O(1).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InteractionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_section: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interaction_history: Option<Vec<InteractionRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub append: Option<InteractionRecord>,
}

impl InteractionPatch {
    pub fn apply(&self, target: &mut InteractionContext) {
        if let Some(at) = self.last_active_at {
            target.last_active_at = at;
        }
        if let Some(section) = &self.active_section {
            target.active_section.clone_from(section);
        }
        if let Some(position) = self.scroll_position {
            target.scroll_position = position;
        }
        if let Some(count) = self.interaction_count {
            // The counter never moves backwards outside of a reset.
            if count < target.interaction_count {
                tracing::debug!(
                    current = target.interaction_count,
                    requested = count,
                    "ignoring interaction count decrease"
                );
            } else {
                target.interaction_count = count;
            }
        }
        if let Some(history) = &self.interaction_history {
            target.interaction_history = InteractionHistory::from(history.clone());
        }
        if let Some(record) = &self.append {
            target.interaction_history.push(record.clone());
        }
    }
}

/// Update request accepted by the context store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum ContextAction {
    UpdatePreferences(PreferencesPatch),
    UpdateDevice(DevicePatch),
    UpdateInteraction(InteractionPatch),
    Reset,
}

impl ContextAction {
    pub fn name(&self) -> &'static str {
        match self {
            ContextAction::UpdatePreferences(_) => "update_preferences",
            ContextAction::UpdateDevice(_) => "update_device",
            ContextAction::UpdateInteraction(_) => "update_interaction",
            ContextAction::Reset => "reset",
        }
    }
}

fn unknown(kind: &'static str, value: &str) -> ContextError {
    ContextError::UnknownValue {
        kind,
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at(second: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, second).unwrap()
    }

    #[test]
    fn test_preferences_defaults() {
        let prefs = Preferences::default();
        assert_eq!(prefs.theme, ThemePreference::System);
        assert_eq!(prefs.animation_speed, AnimationSpeed::Normal);
        assert!(!prefs.reduced_motion);
        assert_eq!(prefs.font_size, FontSize::Medium);
        assert_eq!(prefs.color_mode, ColorMode::Default);
    }

    #[test]
    fn test_history_evicts_oldest() {
        let mut history = InteractionHistory::new();
        for i in 0..15u32 {
            history.push(InteractionRecord::new(format!("el-{i}"), ActionKind::Click, at(i)));
            assert!(history.len() <= HISTORY_CAPACITY);
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.iter().next().unwrap().element_id, "el-5");
        assert_eq!(history.latest().unwrap().element_id, "el-14");
    }

    #[test]
    fn test_history_from_long_vec_keeps_newest() {
        let records: Vec<_> = (0..12u32)
            .map(|i| InteractionRecord::new(format!("el-{i}"), ActionKind::Hover, at(i)))
            .collect();
        let history = InteractionHistory::from(records);
        assert_eq!(history.len(), 10);
        assert_eq!(history.iter().next().unwrap().element_id, "el-2");
    }

    #[test]
    fn test_preferences_patch_merges_only_present_fields() {
        let mut prefs = Preferences {
            theme: ThemePreference::Dark,
            reduced_motion: true,
            ..Preferences::default()
        };
        let patch = PreferencesPatch {
            font_size: Some(FontSize::Large),
            ..PreferencesPatch::default()
        };
        patch.apply(&mut prefs);
        assert_eq!(prefs.font_size, FontSize::Large);
        assert_eq!(prefs.theme, ThemePreference::Dark);
        assert!(prefs.reduced_motion);
    }

    #[test]
    fn test_interaction_count_never_decreases() {
        let mut interaction = InteractionContext::new("home", at(0));
        InteractionPatch {
            interaction_count: Some(5),
            ..Default::default()
        }
        .apply(&mut interaction);
        InteractionPatch {
            interaction_count: Some(3),
            ..Default::default()
        }
        .apply(&mut interaction);
        assert_eq!(interaction.interaction_count, 5);
    }

    #[test]
    fn test_action_json_shape() {
        let json = r#"{"type":"updatePreferences","payload":{"fontSize":"large","colorMode":"tritanopia"}}"#;
        let action: ContextAction = serde_json::from_str(json).unwrap();
        assert_eq!(
            action,
            ContextAction::UpdatePreferences(PreferencesPatch {
                font_size: Some(FontSize::Large),
                color_mode: Some(ColorMode::Tritanopia),
                ..Default::default()
            })
        );

        let reset: ContextAction = serde_json::from_str(r#"{"type":"reset"}"#).unwrap();
        assert_eq!(reset, ContextAction::Reset);
    }

    #[test]
    fn test_unknown_enum_value_rejected() {
        let json = r#"{"type":"updatePreferences","payload":{"colorMode":"achromatopsia"}}"#;
        assert!(serde_json::from_str::<ContextAction>(json).is_err());
        assert!("achromatopsia".parse::<ColorMode>().is_err());
        assert_eq!("protanopia".parse::<ColorMode>().unwrap(), ColorMode::Protanopia);
    }

    #[test]
    fn test_as_str_matches_serde_names() {
        for orientation in [Orientation::Portrait, Orientation::Landscape] {
            let json = serde_json::to_value(orientation).unwrap();
            assert_eq!(json, orientation.as_str());
        }
        for connectivity in [Connectivity::Offline, Connectivity::Slow, Connectivity::Fast] {
            let json = serde_json::to_value(connectivity).unwrap();
            assert_eq!(json, connectivity.as_str());
        }
    }

    #[test]
    fn test_from_str_reports_kind_and_value() {
        let err = "huge".parse::<FontSize>().unwrap_err();
        assert!(matches!(
            &err,
            ContextError::UnknownValue { kind: "font size", value } if value == "huge"
        ));
        assert_eq!(err.to_string(), "Unknown font size value: huge");
        assert_eq!("slow".parse::<AnimationSpeed>().unwrap(), AnimationSpeed::Slow);
        assert_eq!("system".parse::<ThemePreference>().unwrap(), ThemePreference::System);
    }
}
