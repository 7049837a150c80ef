//! Integration tests for vplayer Core

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use vplayer_core::{
    build_layout, format_time, DefaultQuality, ElementRegistry, ElementSpec, Error,
    HeadlessHost, MediaHost, PlayIcon, PlayerConfig, QualityVariant, Reload, Role, ScriptStep,
    Simulation, SubtitleVariant, TrackMode, WidgetEvent,
};

fn ladder_config() -> PlayerConfig {
    PlayerConfig::from_json(
        r#"{
            "videoQualities": [
                { "name": "1080p", "src": "movie-1080.mp4", "poster": "poster-1080.jpg" },
                { "name": "720p",  "src": "movie-720.mp4",  "poster": "poster-720.jpg" },
                { "name": "480p",  "src": "movie-480.mp4",  "poster": "poster-480.jpg" }
            ],
            "subtitleOptions": [
                { "code": "none", "label": "Off" },
                { "code": "en", "label": "English", "src": "en.vtt" },
                { "code": "es", "label": "Español", "src": "es.vtt" }
            ],
            "controls": { "showSubtitles": true },
            "behavior": { "defaultQuality": "highest", "hideControlsDelay": 2000 }
        }"#,
    )
    .unwrap()
}

fn playing_simulation() -> Simulation {
    let mut sim = Simulation::new(ladder_config());
    sim.dispatch(WidgetEvent::PlayPauseClick);
    assert!(!sim.host().paused());
    sim
}

// =============================================================================
// Quality Selection Tests
// =============================================================================

#[test]
fn test_selectors_against_config() {
    let sim = Simulation::new(ladder_config());
    let widget = sim.widget();

    assert_eq!(widget.get_quality(DefaultQuality::Highest).unwrap().name, "1080p");
    assert_eq!(widget.get_quality(DefaultQuality::Lowest).unwrap().name, "480p");
    assert_eq!(widget.get_quality(DefaultQuality::P720).unwrap().name, "720p");
    assert_eq!(sim.host().source(), "movie-1080.mp4");
}

#[test]
fn test_default_selector_in_every_mode() {
    for (selector, expected) in [("highest", "a.mp4"), ("lowest", "c.mp4"), ("720p", "c.mp4")] {
        let config = PlayerConfig::from_json(&format!(
            r#"{{
                "videoQualities": [
                    {{ "name": "2160p", "src": "a.mp4" }},
                    {{ "name": "1080p", "src": "b.mp4" }},
                    {{ "name": "Mobile", "src": "c.mp4" }}
                ],
                "behavior": {{ "defaultQuality": "{}" }}
            }}"#,
            selector
        ))
        .unwrap();
        let sim = Simulation::new(config);
        assert_eq!(sim.host().source(), expected, "selector {}", selector);
    }
}

#[test]
fn test_switch_to_active_quality_is_noop() {
    let mut sim = playing_simulation();
    let loads = sim.host().loads();

    sim.dispatch(WidgetEvent::QualitySelected { index: 0 });

    assert_eq!(sim.host().loads(), loads);
    assert_eq!(sim.widget().reload_state(), Reload::Idle);
    assert!(!sim.host().paused());
}

#[test]
fn test_switch_while_playing_resumes_at_position() {
    let mut sim = playing_simulation();
    sim.advance(Duration::from_millis(1500));
    sim.widget_mut().host_mut().set_current_time(42.0);

    sim.dispatch(WidgetEvent::QualitySelected { index: 1 });

    let host = sim.host();
    assert_eq!(host.source(), "movie-720.mp4");
    assert_eq!(host.poster(), "poster-720.jpg");
    assert_eq!(host.loads(), 1);
    assert_eq!(host.current_time(), 42.0);
    assert!(!host.paused());
    assert_eq!(host.play_requests(), 2);
    assert_eq!(sim.ui().play_icon, PlayIcon::Pause);
    assert_eq!(sim.widget().reload_state(), Reload::Idle);
    assert_eq!(sim.widget().active_quality().unwrap().name, "720p");
}

#[test]
fn test_second_switch_before_can_play_keeps_position() {
    let mut sim = playing_simulation();
    sim.widget_mut().host_mut().set_current_time(30.0);

    // First switch: the new source starts loading but never becomes playable
    sim.widget_mut()
        .handle(WidgetEvent::QualitySelected { index: 1 });
    let aborted = sim.widget_mut().host_mut().take_events();
    assert!(aborted.contains(&WidgetEvent::CanPlay));
    assert!(sim.host().paused());
    assert_eq!(sim.host().current_time(), 0.0);

    sim.dispatch(WidgetEvent::QualitySelected { index: 2 });

    let host = sim.host();
    assert_eq!(host.source(), "movie-480.mp4");
    assert_eq!(host.current_time(), 30.0);
    assert!(!host.paused());
    assert_eq!(sim.ui().play_icon, PlayIcon::Pause);
    assert_eq!(sim.widget().reload_state(), Reload::Idle);
}

#[test]
fn test_switch_while_paused_stays_paused() {
    let mut sim = Simulation::new(ladder_config());
    sim.widget_mut().host_mut().set_current_time(17.5);

    sim.dispatch(WidgetEvent::QualitySelected { index: 2 });

    let host = sim.host();
    assert_eq!(host.source(), "movie-480.mp4");
    assert_eq!(host.current_time(), 17.5);
    assert!(host.paused());
    assert_eq!(host.play_requests(), 0);
    assert_eq!(sim.ui().play_icon, PlayIcon::Play);
}

#[test]
fn test_switch_closes_settings_menu() {
    let mut sim = Simulation::new(ladder_config());
    sim.dispatch(WidgetEvent::SettingsClick);
    assert!(sim.ui().settings_open);

    sim.dispatch(WidgetEvent::QualitySelected { index: 1 });
    assert!(!sim.ui().settings_open);
}

#[test]
fn test_rejected_resume_is_reported() {
    let mut sim = playing_simulation();
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    sim.widget_mut().on_error(move |e| sink.borrow_mut().push(e.clone()));

    sim.widget_mut()
        .host_mut()
        .reject_play(Some("NotAllowedError".to_string()));
    sim.dispatch(WidgetEvent::QualitySelected { index: 1 });

    assert_eq!(
        *errors.borrow(),
        vec![Error::ResumeRejected("NotAllowedError".to_string())]
    );
    assert!(sim.host().paused());
    assert_eq!(sim.ui().play_icon, PlayIcon::Play);
}

// =============================================================================
// Load Error Fallback Tests
// =============================================================================

#[test]
fn test_default_quality_falls_back_to_lowest_once() {
    let mut host = HeadlessHost::new();
    host.fail_source("movie-1080.mp4");
    host.fail_source("movie-480.mp4");

    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    let mut config = ladder_config();
    config.behavior.default_quality = DefaultQuality::Highest;

    let mut sim = Simulation::with_host(config, host);
    sim.widget_mut().on_error(move |e| sink.borrow_mut().push(e.error_code()));

    // The initial failure happened during construction; the fallback is in place
    assert_eq!(sim.host().source(), "movie-480.mp4");
    assert_eq!(sim.host().loads(), 1);

    // The fallback failing too does not start a chain
    sim.dispatch(WidgetEvent::MediaError);
    assert_eq!(sim.host().source(), "movie-480.mp4");
    assert_eq!(sim.host().loads(), 1);
    assert_eq!(*errors.borrow(), vec!["MEDIA_LOAD"]);
}

#[test]
fn test_no_fallback_when_default_is_lowest() {
    let mut host = HeadlessHost::new();
    host.fail_source("movie-480.mp4");
    let mut config = ladder_config();
    config.behavior.default_quality = DefaultQuality::Lowest;

    let sim = Simulation::with_host(config, host);
    assert_eq!(sim.host().source(), "movie-480.mp4");
    assert_eq!(sim.host().loads(), 0);
}

// =============================================================================
// Subtitle Tests
// =============================================================================

#[test]
fn test_subtitle_none_hides_all() {
    let mut sim = Simulation::new(ladder_config());
    sim.dispatch(WidgetEvent::SubtitleSelected { index: 1 });
    sim.dispatch(WidgetEvent::SubtitleSelected { index: 0 });
    assert!(sim
        .host()
        .track_modes()
        .iter()
        .all(|mode| *mode == TrackMode::Hidden));
}

#[test]
fn test_subtitle_shows_exactly_one() {
    let mut sim = Simulation::new(ladder_config());
    sim.dispatch(WidgetEvent::SubtitleSelected { index: 1 });
    sim.dispatch(WidgetEvent::SubtitleSelected { index: 2 });

    let modes = sim.host().track_modes();
    assert_eq!(modes.iter().filter(|m| **m == TrackMode::Showing).count(), 1);
    assert_eq!(modes[1], TrackMode::Showing);
}

#[test]
fn test_subtitle_without_track_is_ignored() {
    let mut config = ladder_config();
    config
        .subtitle_options
        .push(SubtitleVariant::new("de", "Deutsch", ""));
    let mut sim = Simulation::new(config);

    assert_eq!(sim.host().text_track_languages(), vec!["en", "es"]);
    sim.dispatch(WidgetEvent::SubtitleSelected { index: 3 });
    assert!(sim
        .host()
        .track_modes()
        .iter()
        .all(|mode| *mode == TrackMode::Hidden));
}

// =============================================================================
// Visibility State Machine Tests
// =============================================================================

#[test]
fn test_controls_hide_after_configured_delay() {
    let mut sim = playing_simulation();
    assert!(sim.ui().controls_visible);

    sim.advance(Duration::from_millis(1999));
    assert!(sim.ui().controls_visible);

    sim.advance(Duration::from_millis(1));
    assert!(!sim.ui().controls_visible);
}

#[test]
fn test_interaction_shows_and_reschedules() {
    let mut sim = playing_simulation();
    sim.advance(Duration::from_millis(2000));
    assert!(!sim.ui().controls_visible);

    sim.dispatch(WidgetEvent::PointerMove);
    assert!(sim.ui().controls_visible);
    assert_eq!(sim.host().last_hide_delay(), Some(Duration::from_millis(2000)));

    sim.advance(Duration::from_millis(1500));
    sim.dispatch(WidgetEvent::PointerMove);
    sim.advance(Duration::from_millis(1500));
    assert!(sim.ui().controls_visible, "second move restarts the delay");

    sim.advance(Duration::from_millis(500));
    assert!(!sim.ui().controls_visible);
}

#[test]
fn test_single_live_timer() {
    let mut sim = playing_simulation();
    for _ in 0..5 {
        sim.dispatch(WidgetEvent::PointerMove);
    }
    assert_eq!(sim.host().pending_timers().len(), 1);
    assert_eq!(sim.host().pending_timers()[0], sim.widget().hide_timer().unwrap());
}

#[test]
fn test_pause_keeps_controls_until_next_interaction() {
    let mut sim = playing_simulation();
    sim.dispatch(WidgetEvent::PlayPauseClick);
    assert!(sim.host().paused());
    assert!(sim.widget().hide_timer().is_none());

    sim.advance(Duration::from_secs(30));
    assert!(sim.ui().controls_visible);

    // Interaction while paused arms the timer again
    sim.dispatch(WidgetEvent::PointerMove);
    sim.advance(Duration::from_millis(1999));
    assert!(sim.ui().controls_visible);
    sim.advance(Duration::from_millis(1));
    assert!(!sim.ui().controls_visible);
}

#[test]
fn test_pointer_move_with_controls_hidden_on_init() {
    let mut config = ladder_config();
    config.behavior.show_controls_on_init = false;
    let mut sim = Simulation::new(config);
    assert!(!sim.ui().controls_visible);

    sim.dispatch(WidgetEvent::PointerMove);
    assert!(sim.ui().controls_visible);
    assert!(sim.widget().hide_timer().is_some());
    assert_eq!(sim.host().last_hide_delay(), Some(Duration::from_millis(2000)));

    sim.advance(Duration::from_millis(2000));
    assert!(!sim.ui().controls_visible);
}

#[test]
fn test_hide_collapses_settings_menu() {
    let mut sim = playing_simulation();
    sim.dispatch(WidgetEvent::SettingsClick);
    assert!(sim.ui().settings_open);

    sim.advance(Duration::from_millis(2000));
    assert!(!sim.ui().controls_visible);
    assert!(!sim.ui().settings_open);
}

#[test]
fn test_fullscreen_rejection_reported() {
    let mut host = HeadlessHost::new();
    host.reject_fullscreen(Some("TypeError".to_string()));
    let mut sim = Simulation::with_host(ladder_config(), host);
    let errors = Rc::new(RefCell::new(Vec::new()));
    let sink = errors.clone();
    sim.widget_mut().on_error(move |e| sink.borrow_mut().push(e.error_code()));

    sim.dispatch(WidgetEvent::FullscreenClick);
    assert!(!sim.host().is_fullscreen());
    assert_eq!(*errors.borrow(), vec!["FULLSCREEN_REJECTED"]);
}

#[test]
fn test_scripted_session() {
    let script: Vec<ScriptStep> = serde_json::from_str(
        r#"[
            { "type": "play-pause-click" },
            { "advanceMs": 4000 },
            { "type": "pointer-move" },
            { "type": "mute-click" }
        ]"#,
    )
    .unwrap();

    let mut sim = Simulation::new(ladder_config());
    for step in &script {
        sim.run_step(step);
    }

    assert!(sim.ui().controls_visible);
    assert!(sim.host().muted());
    assert_eq!(sim.host().current_time(), 4.0);
    assert_eq!(sim.ui().current_time_label, "0:04");
}

// =============================================================================
// Layout Tests
// =============================================================================

#[test]
fn test_layout_registry_materialization() {
    let layout = build_layout(&ladder_config());
    let mut registry = ElementRegistry::new();
    layout
        .materialize(
            &mut |spec: &ElementSpec| Ok(spec.tag.clone()),
            &mut |_parent: &String, _child: &String| Ok(()),
            &mut registry,
        )
        .unwrap();

    assert_eq!(registry.get(Role::Video).map(String::as_str), Some("video"));
    assert_eq!(registry.get(Role::QualityList).map(String::as_str), Some("ul"));
    assert_eq!(registry.len(), Role::ALL.len());
}

#[test]
fn test_rendered_markup() {
    let mut config = ladder_config();
    config.controls.show_fullscreen = false;
    config.video_qualities.push(QualityVariant::new("360p", "movie-360.mp4", ""));
    let html = build_layout(&config).to_html();

    assert!(html.starts_with("<div class=\"container\""));
    assert!(html.contains(r#"<i class="fas fa-expand" style="display: none"></i>"#));
    assert!(html.contains(r#"<li data-quality="360p">360p</li>"#));
    assert!(html.contains(r#"<li data-subtitle="es">Español</li>"#));
}

// =============================================================================
// Time Formatting Tests
// =============================================================================

#[test]
fn test_format_time_labels() {
    assert_eq!(format_time(65.0), "1:05");
    assert_eq!(format_time(5.0), "0:05");
    assert_eq!(format_time(0.0), "0:00");
}
