//! Rendered control state
//!
//! The widget keeps one `UiState` and hands it to the host after every
//! event; hosts never decide visibility themselves.

use crate::time::format_time;
use serde::{Deserialize, Serialize};

/// Class marking the control bar and top bar as visible
pub const SHOW_CONTROLS_CLASS: &str = "show-controls";
/// Class marking the settings menu as open
pub const SHOW_SETTINGS_CLASS: &str = "show-settings";

/// Icon on the play/pause button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayIcon {
    Play,
    Pause,
}

impl PlayIcon {
    /// Icon for a media element in the given paused state
    pub fn for_paused(paused: bool) -> Self {
        if paused {
            PlayIcon::Play
        } else {
            PlayIcon::Pause
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            PlayIcon::Play => "fa-play",
            PlayIcon::Pause => "fa-pause",
        }
    }
}

/// Icon on the mute button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VolumeIcon {
    Up,
    Muted,
}

impl VolumeIcon {
    pub fn for_muted(muted: bool) -> Self {
        if muted {
            VolumeIcon::Muted
        } else {
            VolumeIcon::Up
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            VolumeIcon::Up => "fa-volume-up",
            VolumeIcon::Muted => "fa-volume-mute",
        }
    }
}

/// Snapshot of everything the view layer displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    pub controls_visible: bool,
    pub settings_open: bool,
    pub play_icon: PlayIcon,
    pub volume_icon: VolumeIcon,
    /// Played fraction of the timeline, 0-100
    pub progress_percent: f64,
    pub current_time_label: String,
    pub duration_label: String,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            controls_visible: false,
            settings_open: false,
            play_icon: PlayIcon::Play,
            volume_icon: VolumeIcon::Up,
            progress_percent: 0.0,
            current_time_label: format_time(0.0),
            duration_label: format_time(0.0),
        }
    }
}

impl UiState {
    /// Show the control bar
    pub fn show_controls(&mut self) {
        self.controls_visible = true;
    }

    /// Collapse the control bar together with the settings menu
    pub fn hide_controls(&mut self) {
        self.controls_visible = false;
        self.settings_open = false;
    }

    /// Recompute the progress bar and current-time label
    pub fn update_progress(&mut self, current_time: f64, duration: f64) {
        if duration > 0.0 {
            self.progress_percent = (current_time / duration * 100.0).clamp(0.0, 100.0);
        }
        self.current_time_label = format_time(current_time);
    }
}
