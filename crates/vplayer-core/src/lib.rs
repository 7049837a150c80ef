//! vplayer Core - Video Player Widget Library
//!
//! This crate provides the host-independent logic of the vplayer widget:
//! - Configuration merging over defaults
//! - Quality variant selection and source switching
//! - Subtitle track selection
//! - Playback controls (play/pause, seek, skip, mute, fullscreen)
//! - Auto-hiding controls and settings menu state
//! - The widget layout tree and element registry
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        vplayer Core                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐           │
//! │  │    Config    │  │   Quality    │  │    Layout    │           │
//! │  │    Merge     │  │  Selection   │  │     Tree     │           │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘           │
//! │         │                 │                 │                   │
//! │         └─────────────────┼─────────────────┘                   │
//! │                           │                                     │
//! │                    ┌──────┴──────┐                              │
//! │   WidgetEvent ───▶ │   Widget    │ ───▶ UiState                 │
//! │                    └──────┬──────┘                              │
//! │                           │                                     │
//! │                    ┌──────┴──────┐                              │
//! │                    │  MediaHost  │  (browser / headless)        │
//! │                    └─────────────┘                              │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```rust
//! use vplayer_core::{PlayerConfig, Simulation, WidgetEvent};
//! use std::time::Duration;
//!
//! let config = PlayerConfig::from_json(r#"{
//!     "videoQualities": [
//!         { "name": "1080p", "src": "hd.mp4", "poster": "hd.jpg" },
//!         { "name": "480p", "src": "sd.mp4", "poster": "sd.jpg" }
//!     ]
//! }"#).unwrap();
//!
//! let mut sim = Simulation::new(config);
//! sim.dispatch(WidgetEvent::PlayPauseClick);
//! sim.advance(Duration::from_millis(3000));
//! assert!(!sim.ui().controls_visible);
//! ```

pub mod config;
pub mod error;
pub mod events;
pub mod headless;
pub mod host;
pub mod layout;
pub mod quality;
pub mod registry;
pub mod time;
pub mod ui;
pub mod widget;

pub use config::{
    BehaviorConfig, ControlsConfig, DefaultQuality, Dimensions, Length, PlayerConfig,
    QualityVariant, SubtitleVariant, NO_SUBTITLES,
};
pub use error::{Error, Result};
pub use events::{TimerId, WidgetEvent};
pub use headless::{HeadlessHost, ScriptStep, Simulation};
pub use host::{MediaHost, TrackMode};
pub use layout::{build_layout, ElementSpec};
pub use quality::{get_lowest_quality, get_quality};
pub use registry::{ElementRegistry, Role};
pub use time::format_time;
pub use ui::{PlayIcon, UiState, VolumeIcon};
pub use widget::{Reload, VideoPlayerWidget, SKIP_SECONDS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log library initialization
pub fn init() {
    tracing::info!(version = VERSION, "vplayer Core initialized");
}
