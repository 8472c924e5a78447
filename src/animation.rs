//! Animation profiles
//!
//! Turns an animation request plus the theme's motion settings into concrete
//! enter/animate/exit states. Reduced motion always wins: the request's
//! variant and direction are ignored and an opacity-only fade is returned.

use crate::theme::{AnimationDurations, Theme};
use serde::{Deserialize, Serialize};

/// Positional offset used by slide animations
pub const SLIDE_OFFSET: f64 = 50.0;

/// Exit runs at this fraction of the entry duration
pub const EXIT_DURATION_FACTOR: f64 = 0.75;

/// Pulse runs at this multiple of the entry duration
pub const PULSE_DURATION_FACTOR: f64 = 1.5;

const SCALE_FROM: f64 = 0.8;
const ROTATE_FROM: f64 = -10.0;
const ROTATE_TO: f64 = 10.0;
const PULSE_KEYFRAMES: [f64; 3] = [SCALE_FROM, 1.05, 1.0];
const PULSE_TIMES: [f64; 3] = [0.0, 0.7, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationVariant {
    Fade,
    Slide,
    Scale,
    Rotate,
    Pulse,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationDirection {
    Up,
    Down,
    Left,
    Right,
    #[default]
    None,
}

/// Which entry of the theme's duration table to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationClass {
    Fast,
    #[default]
    #[serde(alias = "normal")]
    Medium,
    Slow,
}

impl DurationClass {
    pub fn seconds(&self, speeds: &AnimationDurations) -> f64 {
        match self {
            DurationClass::Fast => speeds.fast,
            DurationClass::Medium => speeds.medium,
            DurationClass::Slow => speeds.slow,
        }
    }
}

/// Number of repetitions, or forever
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RepeatRepr", into = "RepeatRepr")]
pub enum Repeat {
    Count(u32),
    Infinite,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RepeatRepr {
    Count(u32),
    Keyword(RepeatKeyword),
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RepeatKeyword {
    Infinite,
}

impl From<RepeatRepr> for Repeat {
    fn from(repr: RepeatRepr) -> Self {
        match repr {
            RepeatRepr::Count(n) => Repeat::Count(n),
            RepeatRepr::Keyword(RepeatKeyword::Infinite) => Repeat::Infinite,
        }
    }
}

impl From<Repeat> for RepeatRepr {
    fn from(repeat: Repeat) -> Self {
        match repeat {
            Repeat::Count(n) => RepeatRepr::Count(n),
            Repeat::Infinite => RepeatRepr::Keyword(RepeatKeyword::Infinite),
        }
    }
}

/// What the caller wants animated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationRequest {
    pub variant: AnimationVariant,
    #[serde(default)]
    pub direction: AnimationDirection,
    #[serde(default)]
    pub duration: DurationClass,
    /// Entry delay in seconds
    #[serde(default)]
    pub delay: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Repeat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger_children: Option<f64>,
}

impl AnimationRequest {
    pub fn new(variant: AnimationVariant) -> Self {
        Self {
            variant,
            direction: AnimationDirection::None,
            duration: DurationClass::Medium,
            delay: 0.0,
            repeat: None,
            stagger_children: None,
        }
    }

    pub fn direction(mut self, direction: AnimationDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn duration(mut self, duration: DurationClass) -> Self {
        self.duration = duration;
        self
    }

    pub fn delay(mut self, delay: f64) -> Self {
        self.delay = delay;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = Some(repeat);
        self
    }

    pub fn stagger_children(mut self, seconds: f64) -> Self {
        self.stagger_children = Some(seconds);
        self
    }
}

/// A single scale value or a keyframe sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Keyframes {
    Value(f64),
    Sequence(Vec<f64>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timing {
    pub duration: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub times: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat: Option<Repeat>,
}

/// Visual state at one point of an animation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MotionState {
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<Keyframes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<Timing>,
}

impl MotionState {
    fn opacity(opacity: f64) -> Self {
        Self {
            opacity,
            ..Self::default()
        }
    }

    fn with_timing(mut self, timing: Timing) -> Self {
        self.transition = Some(timing);
        self
    }

    /// True when the state moves, scales or rotates anything
    pub fn has_motion(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.scale.is_some() || self.rotate.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionVariants {
    pub initial: MotionState,
    pub animate: MotionState,
    pub exit: MotionState,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaggerTransition {
    pub stagger_children: f64,
}

/// Complete enter/exit description for one transition
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationProfile {
    pub variants: MotionVariants,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition: Option<StaggerTransition>,
    pub should_animate: bool,
    /// Base entry duration in seconds
    pub duration: f64,
}

fn slide_offset(direction: AnimationDirection) -> (Option<f64>, Option<f64>) {
    match direction {
        AnimationDirection::Up => (None, Some(SLIDE_OFFSET)),
        AnimationDirection::Down => (None, Some(-SLIDE_OFFSET)),
        AnimationDirection::Left => (Some(SLIDE_OFFSET), None),
        AnimationDirection::Right => (Some(-SLIDE_OFFSET), None),
        AnimationDirection::None => (None, None),
    }
}

/// Build the animation profile for a request under the given theme
pub fn animation_profile(request: &AnimationRequest, theme: &Theme) -> AnimationProfile {
    let duration = request.duration.seconds(&theme.animation.speeds);
    let should_animate = !theme.animation.reduced_motion;
    let transition = request
        .stagger_children
        .map(|stagger_children| StaggerTransition { stagger_children });

    let variants = if should_animate {
        full_motion(request, duration)
    } else {
        MotionVariants {
            initial: MotionState::opacity(0.0),
            animate: MotionState::opacity(1.0).with_timing(Timing {
                duration,
                ..Timing::default()
            }),
            exit: MotionState::opacity(0.0),
        }
    };

    AnimationProfile {
        variants,
        transition,
        should_animate,
        duration,
    }
}

fn full_motion(request: &AnimationRequest, duration: f64) -> MotionVariants {
    let enter = Timing {
        duration,
        delay: Some(request.delay),
        times: None,
        repeat: request.repeat,
    };
    let leave = Timing {
        duration: duration * EXIT_DURATION_FACTOR,
        ..Timing::default()
    };

    match request.variant {
        AnimationVariant::Fade => MotionVariants {
            initial: MotionState::opacity(0.0),
            animate: MotionState::opacity(1.0).with_timing(enter),
            exit: MotionState::opacity(0.0).with_timing(leave),
        },
        AnimationVariant::Slide => {
            let (x, y) = slide_offset(request.direction);
            MotionVariants {
                initial: MotionState {
                    x,
                    y,
                    ..MotionState::opacity(0.0)
                },
                animate: MotionState {
                    x: Some(0.0),
                    y: Some(0.0),
                    ..MotionState::opacity(1.0)
                }
                .with_timing(enter),
                exit: MotionState {
                    x,
                    y,
                    ..MotionState::opacity(0.0)
                }
                .with_timing(leave),
            }
        }
        AnimationVariant::Scale => MotionVariants {
            initial: MotionState {
                scale: Some(Keyframes::Value(SCALE_FROM)),
                ..MotionState::opacity(0.0)
            },
            animate: MotionState {
                scale: Some(Keyframes::Value(1.0)),
                ..MotionState::opacity(1.0)
            }
            .with_timing(enter),
            exit: MotionState {
                scale: Some(Keyframes::Value(SCALE_FROM)),
                ..MotionState::opacity(0.0)
            }
            .with_timing(leave),
        },
        AnimationVariant::Rotate => MotionVariants {
            initial: MotionState {
                rotate: Some(ROTATE_FROM),
                ..MotionState::opacity(0.0)
            },
            animate: MotionState {
                rotate: Some(0.0),
                ..MotionState::opacity(1.0)
            }
            .with_timing(enter),
            exit: MotionState {
                rotate: Some(ROTATE_TO),
                ..MotionState::opacity(0.0)
            }
            .with_timing(leave),
        },
        AnimationVariant::Pulse => MotionVariants {
            initial: MotionState {
                scale: Some(Keyframes::Value(SCALE_FROM)),
                ..MotionState::opacity(0.0)
            },
            animate: MotionState {
                scale: Some(Keyframes::Sequence(PULSE_KEYFRAMES.to_vec())),
                ..MotionState::opacity(1.0)
            }
            .with_timing(Timing {
                duration: duration * PULSE_DURATION_FACTOR,
                times: Some(PULSE_TIMES.to_vec()),
                ..enter
            }),
            exit: MotionState {
                scale: Some(Keyframes::Value(SCALE_FROM)),
                ..MotionState::opacity(0.0)
            }
            .with_timing(leave),
        },
    }
}
