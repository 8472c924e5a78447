//! Theme derivation
//!
//! A theme is a pure function of preferences and device context. It is never
//! stored; callers derive a fresh value whenever they need one.

use crate::types::{AnimationSpeed, ColorMode, DeviceClass, DeviceContext, FontSize, Preferences, ThemePreference};
use serde::Serialize;

/// Resolved color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Palette {
    pub background: &'static str,
    pub surface: &'static str,
    pub primary: &'static str,
    pub primary_variant: &'static str,
    pub secondary: &'static str,
    pub secondary_variant: &'static str,
    pub error: &'static str,
    pub on_background: &'static str,
    pub on_surface: &'static str,
    pub on_primary: &'static str,
    pub on_secondary: &'static str,
    pub on_error: &'static str,
}

pub const LIGHT_PALETTE: Palette = Palette {
    background: "#ffffff",
    surface: "#f5f5f5",
    primary: "#6200ee",
    primary_variant: "#3700b3",
    secondary: "#03dac6",
    secondary_variant: "#018786",
    error: "#b00020",
    on_background: "#000000",
    on_surface: "#000000",
    on_primary: "#ffffff",
    on_secondary: "#000000",
    on_error: "#ffffff",
};

pub const DARK_PALETTE: Palette = Palette {
    background: "#121212",
    surface: "#1e1e1e",
    primary: "#bb86fc",
    primary_variant: "#3700b3",
    secondary: "#03dac6",
    secondary_variant: "#03dac6",
    error: "#cf6679",
    on_background: "#ffffff",
    on_surface: "#ffffff",
    on_primary: "#000000",
    on_secondary: "#000000",
    on_error: "#000000",
};

/// Color-vision adjustment; only primary and secondary are replaced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorAdjustment {
    pub primary: &'static str,
    pub secondary: &'static str,
}

impl ColorAdjustment {
    pub fn for_mode(mode: ColorMode) -> Option<Self> {
        match mode {
            ColorMode::Default => None,
            ColorMode::Protanopia => Some(Self {
                primary: "#a48ee0",
                secondary: "#70c4c4",
            }),
            ColorMode::Deuteranopia => Some(Self {
                primary: "#9e94e8",
                secondary: "#7ac7c7",
            }),
            ColorMode::Tritanopia => Some(Self {
                primary: "#c77dff",
                secondary: "#00b3b3",
            }),
        }
    }

    fn overlay(&self, base: Palette) -> Palette {
        Palette {
            primary: self.primary,
            secondary: self.secondary,
            ..base
        }
    }
}

/// Type scale in rem
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FontSizes {
    pub h1: f64,
    pub h2: f64,
    pub h3: f64,
    pub body: f64,
    pub caption: f64,
}

impl FontSizes {
    pub fn for_size(size: FontSize) -> Self {
        match size {
            FontSize::Small => Self {
                h1: 1.75,
                h2: 1.5,
                h3: 1.25,
                body: 0.875,
                caption: 0.75,
            },
            FontSize::Medium => Self {
                h1: 2.0,
                h2: 1.75,
                h3: 1.5,
                body: 1.0,
                caption: 0.875,
            },
            FontSize::Large => Self {
                h1: 2.5,
                h2: 2.0,
                h3: 1.75,
                body: 1.125,
                caption: 1.0,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FontFamilies {
    pub primary: &'static str,
    pub code: &'static str,
}

pub const FONT_FAMILIES: FontFamilies = FontFamilies {
    primary: "'Inter', sans-serif",
    code: "'Fira Code', monospace",
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Fonts {
    pub sizes: FontSizes,
    pub family: FontFamilies,
}

/// Durations in seconds for each duration class
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnimationDurations {
    pub fast: f64,
    pub medium: f64,
    pub slow: f64,
}

impl AnimationDurations {
    pub fn for_speed(speed: AnimationSpeed) -> Self {
        match speed {
            AnimationSpeed::Slow => Self {
                fast: 0.5,
                medium: 0.75,
                slow: 1.0,
            },
            AnimationSpeed::Normal => Self {
                fast: 0.3,
                medium: 0.5,
                slow: 0.7,
            },
            AnimationSpeed::Fast => Self {
                fast: 0.15,
                medium: 0.25,
                slow: 0.4,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionSettings {
    pub speeds: AnimationDurations,
    pub reduced_motion: bool,
}

/// Spacing scale in rem
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Spacing {
    pub xs: f64,
    pub sm: f64,
    pub md: f64,
    pub lg: f64,
    pub xl: f64,
    pub xxl: f64,
}

pub const SPACING: Spacing = Spacing {
    xs: 0.25,
    sm: 0.5,
    md: 1.0,
    lg: 1.5,
    xl: 2.0,
    xxl: 3.0,
};

/// Layout breakpoints in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Breakpoints {
    pub mobile: u32,
    pub tablet: u32,
    pub desktop: u32,
    pub wide: u32,
}

pub const BREAKPOINTS: Breakpoints = Breakpoints {
    mobile: 480,
    tablet: 768,
    desktop: 1024,
    wide: 1280,
};

/// Concrete style configuration consumed by view renderers
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub colors: Palette,
    pub fonts: Fonts,
    pub animation: MotionSettings,
    pub spacing: Spacing,
    pub breakpoints: Breakpoints,
    pub is_dark: bool,
    pub high_contrast: bool,
    pub device_class: DeviceClass,
}

/// Whether the dark palette applies
pub fn resolve_dark(preferences: &Preferences, device: &DeviceContext) -> bool {
    match preferences.theme {
        ThemePreference::Dark => true,
        ThemePreference::Light => false,
        ThemePreference::System => device.dark_mode,
    }
}

/// Derive the theme for the given preferences and device
pub fn derive_theme(preferences: &Preferences, device: &DeviceContext) -> Theme {
    let is_dark = resolve_dark(preferences, device);
    let base = if is_dark { DARK_PALETTE } else { LIGHT_PALETTE };
    let colors = match ColorAdjustment::for_mode(preferences.color_mode) {
        Some(adjustment) => adjustment.overlay(base),
        None => base,
    };

    Theme {
        colors,
        fonts: Fonts {
            sizes: FontSizes::for_size(preferences.font_size),
            family: FONT_FAMILIES,
        },
        animation: MotionSettings {
            speeds: AnimationDurations::for_speed(preferences.animation_speed),
            reduced_motion: preferences.reduced_motion,
        },
        spacing: SPACING,
        breakpoints: BREAKPOINTS,
        is_dark,
        high_contrast: device.high_contrast,
        device_class: device.device_class,
    }
}
