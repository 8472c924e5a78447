//! End-to-end context tests: config → engine → event replay → derived values

use adaptive_context::animation::{AnimationDirection, AnimationVariant, DurationClass};
use adaptive_context::types::{
    ActionKind, AnimationSpeed, DeviceClass, FontSize, Orientation, PreferencesPatch, ThemePreference,
    HISTORY_CAPACITY,
};
use adaptive_context::*;
use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::rc::Rc;

const CONFIG: &str = r#"
initialSection = "intro"

[preferences]
theme = "system"
animationSpeed = "slow"
fontSize = "large"

[environment]
width = 390
height = 844
dark = true
"#;

#[test]
fn test_config_drives_initial_context() {
    let config = ContextConfig::from_toml(CONFIG).unwrap();
    let engine = ContextEngine::from_config(&config);
    let ctx = engine.context();

    assert_eq!(ctx.interaction.active_section, "intro");
    assert_eq!(ctx.preferences.font_size, FontSize::Large);
    assert_eq!(ctx.device.device_class, DeviceClass::Mobile);
    assert_eq!(ctx.device.orientation, Orientation::Portrait);

    let theme = engine.theme();
    assert!(theme.is_dark);
    assert_eq!(theme.colors.background, "#121212");
    assert_eq!(theme.fonts.sizes.h1, 2.5);
    assert_eq!(theme.animation.speeds.medium, 0.75);
}

#[test]
fn test_replay_session() {
    let session = r#"
{"kind":"track","options":{"elementId":"problem-1","trackInView":true,"trackFocus":true}}
{"kind":"track","options":{"elementId":"problem-2","trackInView":true}}
{"kind":"element","elementId":"problem-1","signal":{"type":"visibility","ratio":0.9}}
{"kind":"element","elementId":"problem-1","signal":{"type":"focus"}}
{"kind":"element","elementId":"problem-1","signal":{"type":"click"}}
{"kind":"pageScroll","position":1400}
{"kind":"element","elementId":"problem-2","signal":{"type":"visibility","ratio":0.6}}
{"kind":"documentClick","elementId":"footer-link"}
{"kind":"environment","change":{"type":"resize","width":1440,"height":900}}
"#;
    let mut engine = ContextEngine::new(StaticEnvironment::default());
    let events = EventAdapter::parse_ndjson(session).unwrap();
    engine.apply_all(&events).unwrap();

    let ctx = engine.context();
    assert_eq!(ctx.interaction.active_section, "problem-2");
    assert_eq!(ctx.interaction.scroll_position, 1400);
    assert_eq!(ctx.interaction.interaction_count, 3);

    let actions: Vec<ActionKind> = ctx.interaction.interaction_history.iter().map(|r| r.action).collect();
    assert_eq!(actions, vec![ActionKind::Input, ActionKind::Click, ActionKind::Click]);

    assert_eq!(ctx.device.device_class, DeviceClass::Desktop);
    assert!(!engine.tracking_status("problem-1").unwrap().is_active_section);
    assert!(engine.tracking_status("problem-2").unwrap().is_active_section);
}

#[test]
fn test_history_stays_bounded_over_long_session() {
    let mut engine = ContextEngine::new(StaticEnvironment::default());
    engine.track(TrackingOptions::new("card"));
    for _ in 0..40 {
        engine
            .apply(&ContextEvent::Element {
                element_id: "card".to_string(),
                signal: ElementSignal::PointerEnter,
            })
            .unwrap();
    }
    let interaction = &engine.context().interaction;
    assert_eq!(interaction.interaction_count, 40);
    assert_eq!(interaction.interaction_history.len(), HISTORY_CAPACITY);
}

#[test]
fn test_subscribers_see_every_dispatch() {
    let mut engine = ContextEngine::new(StaticEnvironment::default());
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    engine.store_mut().subscribe(move |ctx, action| {
        sink.borrow_mut().push((action.name(), ctx.preferences.theme));
    });

    engine.dispatch(ContextAction::UpdatePreferences(PreferencesPatch {
        theme: Some(ThemePreference::Dark),
        ..Default::default()
    }));
    engine.dispatch(ContextAction::Reset);

    assert_eq!(
        *seen.borrow(),
        vec![
            ("update_preferences", ThemePreference::Dark),
            ("reset", ThemePreference::System),
        ]
    );
}

#[test]
fn test_adaptive_content_and_motion_track_preferences() {
    let mut engine = ContextEngine::new(StaticEnvironment {
        width: 800,
        height: 1100,
        ..StaticEnvironment::default()
    });

    let headline = ContentVariants::text("Explore the model")
        .with(VariantKey::Tablet, "Tap to explore".to_string())
        .with(VariantKey::ReducedMotion, "Explore (static)".to_string());
    assert_eq!(engine.select(&headline, &AdaptationCategory::ALL), "Tap to explore");

    let request = AnimationRequest::new(AnimationVariant::Slide)
        .direction(AnimationDirection::Left)
        .duration(DurationClass::Slow);
    let profile = engine.animation(&request);
    assert!(profile.should_animate);
    assert_eq!(profile.duration, 0.7);
    assert_eq!(profile.variants.initial.x, Some(50.0));

    engine.dispatch(ContextAction::UpdatePreferences(PreferencesPatch {
        reduced_motion: Some(true),
        animation_speed: Some(AnimationSpeed::Fast),
        ..Default::default()
    }));

    assert_eq!(engine.select(&headline, &AdaptationCategory::ALL), "Explore (static)");
    let profile = engine.animation(&request);
    assert!(!profile.should_animate);
    assert_eq!(profile.duration, 0.4);
    assert!(profile.variants.initial.x.is_none());
}

#[test]
fn test_malformed_stream_reports_line() {
    let err = EventAdapter::parse_ndjson(
        "{\"kind\":\"pageScroll\",\"position\":5}\n{\"kind\":\"teleport\"}\n",
    )
    .unwrap_err();
    assert!(matches!(err, ContextError::ParseError(_)));
    assert!(err.to_string().contains("line 2"));
}
