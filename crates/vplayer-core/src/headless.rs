//! Headless host - in-memory [`MediaHost`] with a virtual clock
//!
//! Used by the test suites and by `vplayer-cli simulate`. Asynchronous
//! outcomes (play resolution, load events, fullscreen rejection) are queued
//! and delivered by [`Simulation`], which mirrors how the browser completes
//! them after the current callback returns.

use crate::config::{PlayerConfig, SubtitleVariant};
use crate::events::{TimerId, WidgetEvent};
use crate::host::{MediaHost, TrackMode};
use crate::ui::UiState;
use crate::widget::VideoPlayerWidget;
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};
use std::time::Duration;
use tracing::debug;

/// Upper bound on queued-event rounds per dispatch
const MAX_DRAIN_ROUNDS: usize = 64;

/// Length given to every source that loads successfully, unless overridden
pub const DEFAULT_MEDIA_DURATION: f64 = 60.0;

/// In-memory media element, fullscreen state, text tracks and timers
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    paused: bool,
    current_time: f64,
    duration: Option<f64>,
    media_duration: f64,
    muted: bool,
    fullscreen: bool,
    source: String,
    poster: String,
    source_dirty: bool,
    autoplay: bool,
    looping: bool,
    tracks: Vec<(String, TrackMode)>,

    now: Duration,
    next_timer: u64,
    timers: Vec<(TimerId, Duration)>,
    cancelled: Vec<TimerId>,
    last_hide_delay: Option<Duration>,

    loads: usize,
    play_requests: usize,
    seeks: usize,
    rendered: Option<UiState>,

    reject_play: Option<String>,
    reject_fullscreen: Option<String>,
    failing_sources: HashSet<String>,
    queued: VecDeque<WidgetEvent>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    pub fn new() -> Self {
        Self {
            paused: true,
            current_time: 0.0,
            duration: None,
            media_duration: DEFAULT_MEDIA_DURATION,
            muted: false,
            fullscreen: false,
            source: String::new(),
            poster: String::new(),
            source_dirty: false,
            autoplay: false,
            looping: false,
            tracks: Vec::new(),
            now: Duration::ZERO,
            next_timer: 0,
            timers: Vec::new(),
            cancelled: Vec::new(),
            last_hide_delay: None,
            loads: 0,
            play_requests: 0,
            seeks: 0,
            rendered: None,
            reject_play: None,
            reject_fullscreen: None,
            failing_sources: HashSet::new(),
            queued: VecDeque::new(),
        }
    }

    // Scenario controls

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn set_current_time(&mut self, time: f64) {
        self.current_time = time;
    }

    pub fn set_duration(&mut self, duration: Option<f64>) {
        self.duration = duration;
    }

    /// Duration reported once a source finishes loading
    pub fn set_media_duration(&mut self, duration: f64) {
        self.media_duration = duration;
    }

    /// Make every following play request fail with `reason`
    pub fn reject_play(&mut self, reason: Option<String>) {
        self.reject_play = reason;
    }

    pub fn reject_fullscreen(&mut self, reason: Option<String>) {
        self.reject_fullscreen = reason;
    }

    /// Loading `src` raises a media error
    pub fn fail_source(&mut self, src: impl Into<String>) {
        self.failing_sources.insert(src.into());
    }

    // Observations

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn poster(&self) -> &str {
        &self.poster
    }

    pub fn autoplay(&self) -> bool {
        self.autoplay
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    /// Explicit `load()` calls
    pub fn loads(&self) -> usize {
        self.loads
    }

    pub fn play_requests(&self) -> usize {
        self.play_requests
    }

    pub fn seeks(&self) -> usize {
        self.seeks
    }

    pub fn rendered(&self) -> Option<&UiState> {
        self.rendered.as_ref()
    }

    pub fn track_modes(&self) -> Vec<TrackMode> {
        self.tracks.iter().map(|(_, mode)| *mode).collect()
    }

    pub fn cancelled_timers(&self) -> &[TimerId] {
        &self.cancelled
    }

    /// Timers still waiting to fire
    pub fn pending_timers(&self) -> Vec<TimerId> {
        self.timers.iter().map(|(id, _)| *id).collect()
    }

    pub fn last_hide_delay(&self) -> Option<Duration> {
        self.last_hide_delay
    }

    /// Virtual time elapsed since creation
    pub fn now(&self) -> Duration {
        self.now
    }

    // Event delivery

    /// Drain queued asynchronous outcomes, performing any load implied by
    /// an assigned source first
    pub fn take_events(&mut self) -> Vec<WidgetEvent> {
        if self.source_dirty {
            self.begin_load();
        }
        self.queued.drain(..).collect()
    }

    /// Move the clock forward. Playback advances the position; returns the
    /// timers that came due, in deadline order.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        self.now += by;

        if !self.paused {
            let mut position = self.current_time + by.as_secs_f64();
            if let Some(duration) = self.duration {
                if position >= duration {
                    if self.looping {
                        position %= duration.max(f64::EPSILON);
                    } else {
                        position = duration;
                        self.paused = true;
                        self.queued.push_back(WidgetEvent::Ended);
                    }
                }
            }
            self.current_time = position;
            self.queued.push_back(WidgetEvent::TimeUpdate);
        }

        let now = self.now;
        let mut due: Vec<_> = self
            .timers
            .iter()
            .filter(|(_, deadline)| *deadline <= now)
            .copied()
            .collect();
        due.sort_by_key(|(_, deadline)| *deadline);
        self.timers.retain(|(_, deadline)| *deadline > now);
        due.into_iter().map(|(id, _)| id).collect()
    }

    fn begin_load(&mut self) {
        self.source_dirty = false;
        // A new load aborts the previous one
        self.queued.retain(|event| {
            !matches!(
                event,
                WidgetEvent::LoadedMetadata | WidgetEvent::CanPlay | WidgetEvent::MediaError
            )
        });
        self.paused = true;
        self.current_time = 0.0;
        self.duration = None;

        if self.source.is_empty() || self.failing_sources.contains(&self.source) {
            debug!(src = %self.source, "Headless load failed");
            self.queued.push_back(WidgetEvent::MediaError);
            return;
        }

        self.duration = Some(self.media_duration);
        self.queued.push_back(WidgetEvent::LoadedMetadata);
        self.queued.push_back(WidgetEvent::CanPlay);
        if self.autoplay {
            self.paused = false;
        }
    }
}

impl MediaHost for HeadlessHost {
    fn paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn muted(&self) -> bool {
        self.muted
    }

    fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn text_track_languages(&self) -> Vec<String> {
        self.tracks.iter().map(|(language, _)| language.clone()).collect()
    }

    fn set_source(&mut self, src: &str, poster: &str) {
        self.source = src.to_string();
        self.poster = poster.to_string();
        self.source_dirty = true;
    }

    fn set_playback_attributes(&mut self, autoplay: bool, looping: bool) {
        self.autoplay = autoplay;
        self.looping = looping;
    }

    fn load(&mut self) {
        self.loads += 1;
        self.source_dirty = true;
    }

    fn play(&mut self) {
        self.play_requests += 1;
        match self.reject_play.clone() {
            Some(reason) => {
                self.paused = true;
                self.queued.push_back(WidgetEvent::PlayRejected { reason });
            }
            None => {
                self.paused = false;
                self.queued.push_back(WidgetEvent::PlayResolved);
            }
        }
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn seek(&mut self, time: f64) {
        self.seeks += 1;
        self.current_time = time;
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn request_fullscreen(&mut self) {
        match self.reject_fullscreen.clone() {
            Some(reason) => self
                .queued
                .push_back(WidgetEvent::FullscreenRejected { reason }),
            None => self.fullscreen = true,
        }
    }

    fn exit_fullscreen(&mut self) {
        self.fullscreen = false;
    }

    fn add_text_track(&mut self, subtitle: &SubtitleVariant) {
        self.tracks.push((subtitle.code.clone(), TrackMode::Disabled));
    }

    fn set_text_track_mode(&mut self, index: usize, mode: TrackMode) {
        if let Some(track) = self.tracks.get_mut(index) {
            track.1 = mode;
        }
    }

    fn schedule_hide(&mut self, delay: Duration) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);
        self.timers.push((id, self.now + delay));
        self.last_hide_delay = Some(delay);
        id
    }

    fn cancel_hide(&mut self, timer: TimerId) {
        self.timers.retain(|(id, _)| *id != timer);
        self.cancelled.push(timer);
    }

    fn render(&mut self, ui: &UiState) {
        self.rendered = Some(ui.clone());
    }
}

/// One step of a scripted interaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScriptStep {
    /// Let virtual time pass
    #[serde(rename_all = "camelCase")]
    Advance { advance_ms: u64 },
    /// Deliver an event
    Event(WidgetEvent),
}

/// Widget over a [`HeadlessHost`] with queued outcomes delivered
/// automatically
pub struct Simulation {
    widget: VideoPlayerWidget<HeadlessHost>,
}

impl Simulation {
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_host(config, HeadlessHost::new())
    }

    /// Start from a prepared host (failing sources, rejections, ...)
    pub fn with_host(config: PlayerConfig, host: HeadlessHost) -> Self {
        let mut simulation = Self {
            widget: VideoPlayerWidget::new(config, host),
        };
        simulation.drain();
        simulation
    }

    /// Deliver an event and everything it causes
    pub fn dispatch(&mut self, event: WidgetEvent) {
        self.widget.handle(event);
        self.drain();
    }

    /// Advance virtual time, firing due hide timers
    pub fn advance(&mut self, by: Duration) {
        let fired = self.widget.host_mut().advance(by);
        for timer in fired {
            self.widget.handle(WidgetEvent::HideTimerFired { timer });
        }
        self.drain();
    }

    pub fn run_step(&mut self, step: &ScriptStep) {
        match step {
            ScriptStep::Advance { advance_ms } => self.advance(Duration::from_millis(*advance_ms)),
            ScriptStep::Event(event) => self.dispatch(event.clone()),
        }
    }

    pub fn widget(&self) -> &VideoPlayerWidget<HeadlessHost> {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut VideoPlayerWidget<HeadlessHost> {
        &mut self.widget
    }

    pub fn host(&self) -> &HeadlessHost {
        self.widget.host()
    }

    pub fn ui(&self) -> &UiState {
        self.widget.ui()
    }

    fn drain(&mut self) {
        for _ in 0..MAX_DRAIN_ROUNDS {
            let events = self.widget.host_mut().take_events();
            if events.is_empty() {
                return;
            }
            for event in events {
                self.widget.handle(event);
            }
        }
        debug!("Event drain limit reached");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timers_fire_in_order() {
        let mut host = HeadlessHost::new();
        let late = host.schedule_hide(Duration::from_millis(500));
        let early = host.schedule_hide(Duration::from_millis(200));
        host.cancel_hide(late);

        assert!(host.advance(Duration::from_millis(100)).is_empty());
        assert_eq!(host.advance(Duration::from_millis(500)), vec![early]);
        assert!(host.pending_timers().is_empty());
    }

    #[test]
    fn test_load_events() {
        let mut host = HeadlessHost::new();
        host.set_source("a.mp4", "a.jpg");
        assert_eq!(
            host.take_events(),
            vec![WidgetEvent::LoadedMetadata, WidgetEvent::CanPlay]
        );
        assert_eq!(host.duration(), Some(DEFAULT_MEDIA_DURATION));

        host.fail_source("b.mp4");
        host.set_source("b.mp4", "");
        host.load();
        assert_eq!(host.take_events(), vec![WidgetEvent::MediaError]);
        assert_eq!(host.loads(), 1);
    }

    #[test]
    fn test_playback_reaches_end() {
        let mut host = HeadlessHost::new();
        host.set_duration(Some(5.0));
        host.set_paused(false);
        host.advance(Duration::from_secs(10));
        assert!(host.paused());
        assert_eq!(host.current_time(), 5.0);
        assert_eq!(
            host.take_events(),
            vec![WidgetEvent::Ended, WidgetEvent::TimeUpdate]
        );
    }

    #[test]
    fn test_script_step_json() {
        let steps: Vec<ScriptStep> = serde_json::from_str(
            r#"[{ "type": "play-pause-click" }, { "advanceMs": 3000 }]"#,
        )
        .unwrap();
        assert_eq!(
            steps,
            vec![
                ScriptStep::Event(WidgetEvent::PlayPauseClick),
                ScriptStep::Advance { advance_ms: 3000 }
            ]
        );
    }
}
