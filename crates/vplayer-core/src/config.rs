//! Widget configuration
//!
//! Caller options are merged over defaults field-by-field within each
//! category (`dimensions`, `controls`, `behavior`). The `videoQualities` and
//! `subtitleOptions` lists replace the defaults wholesale when present.
//!
//! ```rust
//! use vplayer_core::config::{PlayerConfig, DefaultQuality};
//!
//! let config = PlayerConfig::from_json(r#"{ "behavior": { "defaultQuality": "720p" } }"#).unwrap();
//! assert_eq!(config.behavior.default_quality, DefaultQuality::P720);
//! assert_eq!(config.behavior.hide_controls_delay, 3000);
//! ```

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Language code that stands for "no subtitles"
pub const NO_SUBTITLES: &str = "none";

/// Complete widget configuration, immutable once the widget is built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerConfig {
    /// Container sizing
    pub dimensions: Dimensions,
    /// Which controls are displayed
    pub controls: ControlsConfig,
    /// Selectable sources, ordered from highest to lowest
    pub video_qualities: Vec<QualityVariant>,
    /// Selectable subtitle tracks
    pub subtitle_options: Vec<SubtitleVariant>,
    /// Playback and visibility behavior
    pub behavior: BehaviorConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            dimensions: Dimensions::default(),
            controls: ControlsConfig::default(),
            video_qualities: vec![QualityVariant::new("Source", "", "")],
            subtitle_options: vec![SubtitleVariant::none("No subtitles")],
            behavior: BehaviorConfig::default(),
        }
    }
}

impl PlayerConfig {
    /// Merge caller options given as JSON text over the defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Merge caller options given as a JSON value over the defaults
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Serialize the resolved configuration
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Subtitle variants that map to an attachable text track
    pub fn subtitle_tracks(&self) -> impl Iterator<Item = &SubtitleVariant> {
        self.subtitle_options.iter().filter(|s| s.has_track())
    }
}

/// A CSS length: either a bare pixel count or any CSS length string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Length {
    Pixels(f64),
    Css(String),
}

impl Length {
    /// Render as a CSS value
    pub fn to_css(&self) -> String {
        match self {
            Length::Pixels(px) => format!("{}px", px),
            Length::Css(value) => value.clone(),
        }
    }

    /// Empty strings are treated as unset
    pub fn is_set(&self) -> bool {
        match self {
            Length::Pixels(px) => *px > 0.0,
            Length::Css(value) => !value.trim().is_empty(),
        }
    }
}

impl From<&str> for Length {
    fn from(value: &str) -> Self {
        Length::Css(value.to_string())
    }
}

/// Container dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dimensions {
    pub width: Length,
    pub height: Length,
    /// Minimum width in pixels
    pub min_width: u32,
    /// Minimum height in pixels
    pub min_height: u32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            width: Length::from("100%"),
            height: Length::from("100%"),
            min_width: 300,
            min_height: 150,
        }
    }
}

impl Dimensions {
    /// Inline style declarations for the container
    pub fn css_declarations(&self) -> Vec<(&'static str, String)> {
        let mut declarations = Vec::new();
        if self.width.is_set() {
            declarations.push(("width", self.width.to_css()));
        }
        if self.height.is_set() {
            declarations.push(("height", self.height.to_css()));
        }
        if self.min_width > 0 {
            declarations.push(("min-width", format!("{}px", self.min_width)));
        }
        if self.min_height > 0 {
            declarations.push(("min-height", format!("{}px", self.min_height)));
        }
        declarations
    }
}

/// Control visibility flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ControlsConfig {
    pub show_fullscreen: bool,
    pub show_quality: bool,
    pub show_subtitles: bool,
    pub show_volume: bool,
    pub show_time: bool,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            show_fullscreen: true,
            show_quality: true,
            show_subtitles: false,
            show_volume: true,
            show_time: true,
        }
    }
}

impl ControlsConfig {
    /// The settings button is useless when it opens an empty menu
    pub fn show_settings(&self) -> bool {
        self.show_quality || self.show_subtitles
    }
}

/// Playback and visibility behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BehaviorConfig {
    pub autoplay: bool,
    #[serde(rename = "loop")]
    pub loop_playback: bool,
    pub default_quality: DefaultQuality,
    pub show_controls_on_init: bool,
    /// Inactivity before the controls hide, in milliseconds
    pub hide_controls_delay: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            autoplay: false,
            loop_playback: false,
            default_quality: DefaultQuality::Lowest,
            show_controls_on_init: true,
            hide_controls_delay: 3000,
        }
    }
}

impl BehaviorConfig {
    /// Hide delay as a `Duration`
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_controls_delay)
    }
}

/// Which variant is loaded first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DefaultQuality {
    Highest,
    #[default]
    Lowest,
    P720,
}

impl From<String> for DefaultQuality {
    fn from(value: String) -> Self {
        match value.as_str() {
            "highest" => DefaultQuality::Highest,
            "720p" => DefaultQuality::P720,
            _ => DefaultQuality::Lowest,
        }
    }
}

impl From<DefaultQuality> for String {
    fn from(value: DefaultQuality) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DefaultQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultQuality::Highest => write!(f, "highest"),
            DefaultQuality::Lowest => write!(f, "lowest"),
            DefaultQuality::P720 => write!(f, "720p"),
        }
    }
}

/// One selectable source
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityVariant {
    /// Display name, e.g. "1080p"
    pub name: String,
    /// Media URL
    pub src: String,
    /// Poster image URL
    pub poster: String,
}

impl QualityVariant {
    pub fn new(name: impl Into<String>, src: impl Into<String>, poster: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            src: src.into(),
            poster: poster.into(),
        }
    }
}

/// One selectable subtitle option
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtitleVariant {
    /// Language code, or `"none"`
    pub code: String,
    pub label: String,
    /// WebVTT URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
}

impl SubtitleVariant {
    pub fn new(code: impl Into<String>, label: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            src: Some(src.into()),
        }
    }

    /// The "no subtitles" sentinel option
    pub fn none(label: impl Into<String>) -> Self {
        Self {
            code: NO_SUBTITLES.to_string(),
            label: label.into(),
            src: None,
        }
    }

    pub fn is_none(&self) -> bool {
        self.code == NO_SUBTITLES
    }

    /// Whether a text track should be attached for this option
    pub fn has_track(&self) -> bool {
        !self.is_none() && self.src.as_deref().is_some_and(|src| !src.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlayerConfig::default();
        assert_eq!(config.dimensions.min_width, 300);
        assert_eq!(config.dimensions.min_height, 150);
        assert!(config.controls.show_fullscreen);
        assert!(!config.controls.show_subtitles);
        assert_eq!(config.video_qualities.len(), 1);
        assert_eq!(config.video_qualities[0].name, "Source");
        assert!(config.subtitle_options[0].is_none());
        assert_eq!(config.behavior.hide_delay(), Duration::from_millis(3000));
    }

    #[test]
    fn test_empty_object_resolves_to_defaults() {
        let config = PlayerConfig::from_json("{}").unwrap();
        assert_eq!(config, PlayerConfig::default());
    }

    #[test]
    fn test_field_by_field_merge() {
        let config = PlayerConfig::from_json(
            r#"{
                "dimensions": { "width": 640 },
                "controls": { "showSubtitles": true },
                "behavior": { "autoplay": true, "loop": true, "hideControlsDelay": 1500 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.dimensions.width, Length::Pixels(640.0));
        assert_eq!(config.dimensions.height, Length::from("100%"));
        assert!(config.controls.show_subtitles);
        assert!(config.controls.show_quality);
        assert!(config.behavior.autoplay);
        assert!(config.behavior.loop_playback);
        assert!(config.behavior.show_controls_on_init);
        assert_eq!(config.behavior.hide_controls_delay, 1500);
    }

    #[test]
    fn test_lists_replace_wholesale() {
        let config = PlayerConfig::from_json(
            r#"{
                "videoQualities": [
                    { "name": "1080p", "src": "hd.mp4", "poster": "hd.jpg" },
                    { "name": "480p", "src": "sd.mp4" }
                ],
                "subtitleOptions": [{ "code": "es", "label": "Español", "src": "es.vtt" }]
            }"#,
        )
        .unwrap();

        assert_eq!(config.video_qualities.len(), 2);
        assert_eq!(config.video_qualities[1].poster, "");
        assert_eq!(config.subtitle_options.len(), 1);
        assert!(config.subtitle_options[0].has_track());
    }

    #[test]
    fn test_unknown_default_quality_is_lowest() {
        let config = PlayerConfig::from_json(r#"{ "behavior": { "defaultQuality": "ultra" } }"#).unwrap();
        assert_eq!(config.behavior.default_quality, DefaultQuality::Lowest);
    }

    #[test]
    fn test_invalid_json() {
        assert!(PlayerConfig::from_json("{ not json").is_err());
    }

    #[test]
    fn test_dimension_declarations() {
        let dims = Dimensions {
            width: Length::Pixels(640.0),
            height: Length::from(""),
            min_width: 0,
            min_height: 150,
        };
        assert_eq!(
            dims.css_declarations(),
            vec![("width", "640px".to_string()), ("min-height", "150px".to_string())]
        );
    }

    #[test]
    fn test_subtitle_tracks() {
        let mut config = PlayerConfig::default();
        config.subtitle_options.push(SubtitleVariant::new("en", "English", "en.vtt"));
        config.subtitle_options.push(SubtitleVariant {
            code: "fr".into(),
            label: "Français".into(),
            src: None,
        });
        let codes: Vec<_> = config.subtitle_tracks().map(|s| s.code.as_str()).collect();
        assert_eq!(codes, vec!["en"]);
    }

    #[test]
    fn test_settings_button_visibility() {
        let mut controls = ControlsConfig::default();
        assert!(controls.show_settings());
        controls.show_quality = false;
        assert!(!controls.show_settings());
    }
}
