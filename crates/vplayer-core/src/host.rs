//! Media host - the seam between widget logic and the environment
//!
//! The browser crate implements this over `HtmlVideoElement`, the
//! fullscreen API, text tracks and `setTimeout`; [`HeadlessHost`](crate::HeadlessHost)
//! implements it in memory for tests and the CLI.
//!
//! Requests that complete asynchronously (`play`, `request_fullscreen`)
//! report back later as [`WidgetEvent`](crate::WidgetEvent)s.

use crate::config::SubtitleVariant;
use crate::events::TimerId;
use crate::ui::UiState;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Text track display mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackMode {
    Disabled,
    Hidden,
    Showing,
}

/// Environment the widget drives
pub trait MediaHost {
    // Media state
    fn paused(&self) -> bool;
    fn current_time(&self) -> f64;
    /// `None` until metadata is known
    fn duration(&self) -> Option<f64>;
    fn muted(&self) -> bool;
    fn is_fullscreen(&self) -> bool;
    /// Language of every attached text track, in track order
    fn text_track_languages(&self) -> Vec<String>;

    // Media requests
    fn set_source(&mut self, src: &str, poster: &str);
    fn set_playback_attributes(&mut self, autoplay: bool, looping: bool);
    fn load(&mut self);
    /// Start playback; completes with `PlayResolved` or `PlayRejected`
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, time: f64);
    fn set_muted(&mut self, muted: bool);

    // Fullscreen
    /// Completes silently or with `FullscreenRejected`
    fn request_fullscreen(&mut self);
    fn exit_fullscreen(&mut self);

    // Text tracks
    fn add_text_track(&mut self, subtitle: &SubtitleVariant);
    fn set_text_track_mode(&mut self, index: usize, mode: TrackMode);

    // Hide timer
    /// Fires `HideTimerFired` with the returned id after `delay`
    fn schedule_hide(&mut self, delay: Duration) -> TimerId;
    fn cancel_hide(&mut self, timer: TimerId);

    // View
    fn render(&mut self, ui: &UiState);
}
