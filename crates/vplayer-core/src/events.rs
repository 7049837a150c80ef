//! Typed widget events
//!
//! Every DOM callback, media lifecycle notification, timer expiry and
//! promise continuation reaches the widget as one of these.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle of a scheduled hide timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Input delivered to [`VideoPlayerWidget::handle`](crate::VideoPlayerWidget::handle)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum WidgetEvent {
    // Pointer input
    PointerMove,
    VideoClick,
    DocumentClick,

    // Control buttons
    PlayPauseClick,
    MuteClick,
    SkipBackward,
    SkipForward,
    FullscreenClick,
    SettingsClick,
    #[serde(rename_all = "camelCase")]
    ProgressClick {
        pointer_x: f64,
        track_left: f64,
        track_width: f64,
    },

    // Settings menu
    QualitySelected { index: usize },
    SubtitleSelected { index: usize },

    // Timer
    HideTimerFired { timer: TimerId },

    // Media lifecycle
    LoadedMetadata,
    TimeUpdate,
    CanPlay,
    Ended,
    MediaError,

    // Async request outcomes
    PlayResolved,
    PlayRejected { reason: String },
    FullscreenRejected { reason: String },
}

impl WidgetEvent {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            WidgetEvent::PointerMove => "pointer-move",
            WidgetEvent::VideoClick => "video-click",
            WidgetEvent::DocumentClick => "document-click",
            WidgetEvent::PlayPauseClick => "play-pause-click",
            WidgetEvent::MuteClick => "mute-click",
            WidgetEvent::SkipBackward => "skip-backward",
            WidgetEvent::SkipForward => "skip-forward",
            WidgetEvent::FullscreenClick => "fullscreen-click",
            WidgetEvent::SettingsClick => "settings-click",
            WidgetEvent::ProgressClick { .. } => "progress-click",
            WidgetEvent::QualitySelected { .. } => "quality-selected",
            WidgetEvent::SubtitleSelected { .. } => "subtitle-selected",
            WidgetEvent::HideTimerFired { .. } => "hide-timer-fired",
            WidgetEvent::LoadedMetadata => "loaded-metadata",
            WidgetEvent::TimeUpdate => "time-update",
            WidgetEvent::CanPlay => "can-play",
            WidgetEvent::Ended => "ended",
            WidgetEvent::MediaError => "media-error",
            WidgetEvent::PlayResolved => "play-resolved",
            WidgetEvent::PlayRejected { .. } => "play-rejected",
            WidgetEvent::FullscreenRejected { .. } => "fullscreen-rejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event: WidgetEvent = serde_json::from_str(
            r#"{ "type": "progress-click", "pointerX": 150, "trackLeft": 50, "trackWidth": 400 }"#,
        )
        .unwrap();
        assert_eq!(
            event,
            WidgetEvent::ProgressClick {
                pointer_x: 150.0,
                track_left: 50.0,
                track_width: 400.0
            }
        );

        let event: WidgetEvent = serde_json::from_str(r#"{ "type": "quality-selected", "index": 2 }"#).unwrap();
        assert_eq!(event.name(), "quality-selected");
    }
}
