//! Video player widget - control logic over a [`MediaHost`]
//!
//! Owns the configuration, the rendered [`UiState`], the single live hide
//! timer and the reload state used while switching quality. All input
//! arrives through [`VideoPlayerWidget::handle`], which renders the updated
//! state back to the host before returning.

use crate::config::{DefaultQuality, PlayerConfig, QualityVariant};
use crate::events::{TimerId, WidgetEvent};
use crate::host::{MediaHost, TrackMode};
use crate::quality;
use crate::time::format_time;
use crate::ui::{PlayIcon, UiState, VolumeIcon};
use crate::Error;
use tracing::{debug, info, warn};

/// Seconds jumped by the skip buttons
pub const SKIP_SECONDS: f64 = 10.0;

/// Source reload state while switching quality
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Reload {
    #[default]
    Idle,
    /// Waiting for the new source to become playable
    Pending {
        /// Position to restore
        position: f64,
        /// Whether playback resumes afterwards
        resume: bool,
    },
}

/// Origin of an outstanding play request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayIntent {
    Toggle,
    Resume,
}

type ErrorListener = Box<dyn FnMut(&Error)>;

/// The video player widget
pub struct VideoPlayerWidget<H: MediaHost> {
    config: PlayerConfig,
    host: H,
    ui: UiState,
    /// Index of the variant whose source is loaded
    active_quality: Option<usize>,
    /// Index the default selector resolved to
    default_quality: Option<usize>,
    fallback_attempted: bool,
    hide_timer: Option<TimerId>,
    reload: Reload,
    pending_play: Option<PlayIntent>,
    error_listener: Option<ErrorListener>,
}

impl<H: MediaHost> VideoPlayerWidget<H> {
    /// Apply the configuration to the host and render the initial state
    pub fn new(config: PlayerConfig, host: H) -> Self {
        let mut widget = Self {
            ui: UiState {
                volume_icon: VolumeIcon::for_muted(host.muted()),
                ..Default::default()
            },
            config,
            host,
            active_quality: None,
            default_quality: None,
            fallback_attempted: false,
            hide_timer: None,
            reload: Reload::Idle,
            pending_play: None,
            error_listener: None,
        };
        widget.init();
        widget
    }

    fn init(&mut self) {
        let behavior = &self.config.behavior;
        self.host
            .set_playback_attributes(behavior.autoplay, behavior.loop_playback);

        self.default_quality =
            quality::select_index(&self.config.video_qualities, behavior.default_quality);
        if let Some(index) = self.default_quality {
            let variant = &self.config.video_qualities[index];
            self.host.set_source(&variant.src, &variant.poster);
            self.active_quality = Some(index);
            info!(
                quality = %variant.name,
                selector = %behavior.default_quality,
                "Default quality selected"
            );
        } else {
            self.report(Error::NoQualityVariants);
        }

        let tracks: Vec<_> = self.config.subtitle_tracks().cloned().collect();
        for track in &tracks {
            self.host.add_text_track(track);
        }

        if self.config.behavior.show_controls_on_init {
            self.ui.show_controls();
        }

        info!(
            qualities = self.config.video_qualities.len(),
            subtitle_tracks = tracks.len(),
            "Video player widget initialized"
        );
        self.render();
    }

    /// Register a status callback for reported errors
    pub fn on_error(&mut self, listener: impl FnMut(&Error) + 'static) {
        self.error_listener = Some(Box::new(listener));
    }

    /// Process one event and render the result
    pub fn handle(&mut self, event: WidgetEvent) {
        debug!(event = event.name(), "Handling widget event");

        match event {
            WidgetEvent::PointerMove => {
                self.show_controls();
                self.reset_hide_timer();
            }
            WidgetEvent::VideoClick | WidgetEvent::PlayPauseClick => self.toggle_play_pause(),
            WidgetEvent::DocumentClick => self.hide_settings(),
            WidgetEvent::MuteClick => self.toggle_mute(),
            WidgetEvent::SkipBackward => self.skip(-SKIP_SECONDS),
            WidgetEvent::SkipForward => self.skip(SKIP_SECONDS),
            WidgetEvent::FullscreenClick => self.toggle_fullscreen(),
            WidgetEvent::SettingsClick => self.toggle_settings(),
            WidgetEvent::ProgressClick {
                pointer_x,
                track_left,
                track_width,
            } => self.seek_from_pointer(pointer_x, track_left, track_width),
            WidgetEvent::QualitySelected { index } => {
                self.change_quality(index);
            }
            WidgetEvent::SubtitleSelected { index } => self.change_subtitle(index),
            WidgetEvent::HideTimerFired { timer } => self.on_hide_timer(timer),
            WidgetEvent::LoadedMetadata => self.on_loaded_metadata(),
            WidgetEvent::TimeUpdate => self.update_progress(),
            WidgetEvent::CanPlay => self.on_can_play(),
            WidgetEvent::Ended => self.on_ended(),
            WidgetEvent::MediaError => self.on_media_error(),
            WidgetEvent::PlayResolved => self.on_play_resolved(),
            WidgetEvent::PlayRejected { reason } => self.on_play_rejected(reason),
            WidgetEvent::FullscreenRejected { reason } => {
                self.report(Error::FullscreenRejected(reason))
            }
        }

        self.render();
    }

    /// Push the current UI state to the host
    pub fn render(&mut self) {
        self.host.render(&self.ui);
    }

    // =========================================================================
    // Playback
    // =========================================================================

    /// Play when paused, pause otherwise
    pub fn toggle_play_pause(&mut self) {
        if self.active_quality.is_none() {
            self.report(Error::NoQualityVariants);
            return;
        }
        if self.host.paused() {
            self.pending_play = Some(PlayIntent::Toggle);
            self.host.play();
        } else {
            self.host.pause();
            self.ui.play_icon = PlayIcon::Play;
            self.show_controls();
            self.cancel_hide_timer();
        }
    }

    /// Flip the muted flag
    pub fn toggle_mute(&mut self) {
        let muted = !self.host.muted();
        self.host.set_muted(muted);
        self.ui.volume_icon = VolumeIcon::for_muted(muted);
        self.reset_hide_timer();
    }

    /// Jump by `seconds`, clamped into `[0, duration]`
    pub fn skip(&mut self, seconds: f64) {
        let mut target = (self.host.current_time() + seconds).max(0.0);
        if let Some(duration) = self.duration() {
            target = target.min(duration);
        }
        self.host.seek(target);
        self.reset_hide_timer();
    }

    /// Seek to the time under a pointer on the progress track.
    ///
    /// Ignored while the duration is unknown.
    pub fn seek_from_pointer(&mut self, pointer_x: f64, track_left: f64, track_width: f64) {
        let Some(duration) = self.duration() else {
            return;
        };
        if track_width <= 0.0 {
            return;
        }
        let fraction = ((pointer_x - track_left) / track_width).clamp(0.0, 1.0);
        self.host.seek(fraction * duration);
        self.reset_hide_timer();
    }

    /// Enter or leave fullscreen
    pub fn toggle_fullscreen(&mut self) {
        if self.host.is_fullscreen() {
            self.host.exit_fullscreen();
        } else {
            self.host.request_fullscreen();
        }
        self.reset_hide_timer();
    }

    fn duration(&self) -> Option<f64> {
        self.host.duration().filter(|d| d.is_finite() && *d >= 0.0)
    }

    fn on_play_resolved(&mut self) {
        let intent = self.pending_play.take();
        self.ui.play_icon = PlayIcon::for_paused(self.host.paused());
        if intent.is_some() {
            if intent == Some(PlayIntent::Toggle) {
                self.show_controls();
            }
            self.reset_hide_timer();
        }
    }

    fn on_play_rejected(&mut self, reason: String) {
        let error = match self.pending_play.take() {
            Some(PlayIntent::Resume) => Error::ResumeRejected(reason),
            _ => Error::PlayRejected(reason),
        };
        self.report(error);
        self.ui.play_icon = PlayIcon::for_paused(self.host.paused());
    }

    fn on_ended(&mut self) {
        self.ui.play_icon = PlayIcon::Play;
        self.show_controls();
        self.cancel_hide_timer();
    }

    // =========================================================================
    // Media lifecycle
    // =========================================================================

    fn on_loaded_metadata(&mut self) {
        self.ui.duration_label = format_time(self.duration().unwrap_or(0.0));
    }

    /// Refresh the progress bar and time label
    pub fn update_progress(&mut self) {
        if let Some(duration) = self.duration() {
            self.ui.update_progress(self.host.current_time(), duration);
        }
        if self.pending_play.is_none() {
            self.ui.play_icon = PlayIcon::for_paused(self.host.paused());
        }
    }

    fn on_can_play(&mut self) {
        let Reload::Pending { position, resume } = std::mem::take(&mut self.reload) else {
            return;
        };
        if position > 0.0 {
            self.host.seek(position);
        }
        if resume {
            debug!(position, "Resuming playback after source switch");
            self.pending_play = Some(PlayIntent::Resume);
            self.host.play();
        }
    }

    fn on_media_error(&mut self) {
        let src = self
            .active_quality()
            .map(|q| q.src.clone())
            .unwrap_or_default();
        self.report(Error::MediaLoad { src });

        if self.fallback_attempted || self.active_quality != self.default_quality {
            return;
        }
        self.fallback_attempted = true;

        let Some(lowest) = quality::lowest_index(&self.config.video_qualities) else {
            return;
        };
        if Some(lowest) == self.active_quality {
            return;
        }

        let variant = &self.config.video_qualities[lowest];
        warn!(quality = %variant.name, "Default quality failed, falling back");
        self.host.set_source(&variant.src, &variant.poster);
        self.host.load();
        self.active_quality = Some(lowest);
    }

    // =========================================================================
    // Quality & subtitles
    // =========================================================================

    /// Variant a selector resolves to
    pub fn get_quality(&self, selector: DefaultQuality) -> Option<&QualityVariant> {
        quality::get_quality(&self.config.video_qualities, selector)
    }

    /// Variant whose source is currently loaded
    pub fn active_quality(&self) -> Option<&QualityVariant> {
        self.active_quality
            .and_then(|index| self.config.video_qualities.get(index))
    }

    /// Switch to the variant at `index`.
    ///
    /// Returns `false` when the variant is unknown or its source is already
    /// active; nothing is reloaded in that case.
    pub fn change_quality(&mut self, index: usize) -> bool {
        let Some(variant) = self.config.video_qualities.get(index) else {
            self.report(Error::UnknownQuality(index));
            return false;
        };
        if self.active_quality().is_some_and(|active| active.src == variant.src) {
            debug!(quality = %variant.name, "Quality already active");
            return false;
        }

        let (src, poster, name) = (variant.src.clone(), variant.poster.clone(), variant.name.clone());
        // A load in flight has already reset the host, so keep what it saved
        let (position, resume) = match self.reload {
            Reload::Pending { position, resume } => (position, resume),
            Reload::Idle => (self.host.current_time(), !self.host.paused()),
        };
        self.reload = Reload::Pending { position, resume };

        self.hide_settings();
        self.reset_hide_timer();

        self.host.set_source(&src, &poster);
        self.host.load();
        self.active_quality = Some(index);

        info!(quality = %name, position, resume, "Quality switched");
        true
    }

    /// Show the subtitle option at `index`, hiding every other track
    pub fn change_subtitle(&mut self, index: usize) {
        let Some(subtitle) = self.config.subtitle_options.get(index) else {
            self.report(Error::UnknownSubtitle(index));
            return;
        };
        let code = subtitle.code.clone();
        let show = !subtitle.is_none();

        let languages = self.host.text_track_languages();
        for track in 0..languages.len() {
            self.host.set_text_track_mode(track, TrackMode::Hidden);
        }
        if show {
            match languages.iter().position(|language| *language == code) {
                Some(track) => self.host.set_text_track_mode(track, TrackMode::Showing),
                None => debug!(code = %code, "No text track for subtitle option"),
            }
        }

        self.hide_settings();
        self.reset_hide_timer();
    }

    // =========================================================================
    // Visibility
    // =========================================================================

    pub fn show_controls(&mut self) {
        self.ui.show_controls();
    }

    /// Collapse controls and settings menu
    pub fn hide_controls(&mut self) {
        self.ui.hide_controls();
    }

    /// Open or close the settings menu
    pub fn toggle_settings(&mut self) {
        self.ui.settings_open = !self.ui.settings_open;
        self.show_controls();
        self.reset_hide_timer();
    }

    pub fn hide_settings(&mut self) {
        self.ui.settings_open = false;
    }

    /// Replace the live hide timer.
    ///
    /// Pausing cancels the timer without arming a new one; the next
    /// interaction arms it again.
    pub fn reset_hide_timer(&mut self) {
        self.cancel_hide_timer();
        let delay = self.config.behavior.hide_delay();
        self.hide_timer = Some(self.host.schedule_hide(delay));
    }

    fn cancel_hide_timer(&mut self) {
        if let Some(timer) = self.hide_timer.take() {
            self.host.cancel_hide(timer);
        }
    }

    fn on_hide_timer(&mut self, timer: TimerId) {
        if self.hide_timer != Some(timer) {
            debug!(%timer, "Ignoring stale hide timer");
            return;
        }
        self.hide_timer = None;
        self.hide_controls();
    }

    // =========================================================================
    // Errors & accessors
    // =========================================================================

    fn report(&mut self, error: Error) {
        warn!(code = error.error_code(), error = %error, "Widget error");
        if let Some(listener) = self.error_listener.as_mut() {
            listener(&error);
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Handle of the live hide timer
    pub fn hide_timer(&self) -> Option<TimerId> {
        self.hide_timer
    }

    pub fn reload_state(&self) -> Reload {
        self.reload
    }
}
