//! vplayer WASM - Browser bindings for the vplayer widget
//!
//! Mounts the widget around an HTML5 video element:
//! - Builds the container, control bar, progress bar and settings menu
//! - Drives the element through the core widget logic
//! - Forwards media, pointer and timer events as typed widget events
//!
//! ## Usage
//!
//! ```javascript
//! import init, { VideoPlayer } from '@vplayer/wasm';
//!
//! await init();
//! const player = new VideoPlayer({
//!   videoQualities: [
//!     { name: '1080p', src: 'movie-1080.mp4', poster: 'poster.jpg' },
//!     { name: '480p', src: 'movie-480.mp4', poster: 'poster.jpg' },
//!   ],
//!   behavior: { defaultQuality: 'highest', hideControlsDelay: 2500 },
//! });
//! player.setErrorCallback((code, message) => console.warn(code, message));
//! ```

use std::cell::RefCell;
use std::rc::Rc;
use vplayer_core::{PlayerConfig, VideoPlayerWidget, WidgetEvent};
use wasm_bindgen::prelude::*;

mod dispatcher;
mod dom_host;
mod mount;

pub use dispatcher::{Dispatcher, SharedWidget};
pub use dom_host::DomHost;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    web_sys::console::log_1(&"[vplayer WASM] Initialized".into());
}

/// Library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Format seconds as `m:ss`
#[wasm_bindgen(js_name = formatTime)]
pub fn format_time(seconds: f64) -> String {
    vplayer_core::format_time(seconds)
}

/// Resolve a configuration object against the defaults and return it as JSON
#[wasm_bindgen(js_name = resolveConfig)]
pub fn resolve_config(config: JsValue) -> Result<String, JsValue> {
    Ok(parse_config(config)?.to_json())
}

fn parse_config(config: JsValue) -> Result<PlayerConfig, JsValue> {
    if config.is_undefined() || config.is_null() {
        return Ok(PlayerConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsValue::from_str(&format!("Invalid configuration: {}", e)))
}

type ErrorCallback = Rc<RefCell<Option<js_sys::Function>>>;

/// The video player widget, exported to JavaScript
#[wasm_bindgen]
pub struct VideoPlayer {
    widget: Rc<SharedWidget>,
    dispatcher: Dispatcher,
    error_callback: ErrorCallback,
}

#[wasm_bindgen]
impl VideoPlayer {
    /// Build the widget into the current document
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<VideoPlayer, JsValue> {
        let config = parse_config(config)?;
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no global window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("window has no document"))?;

        let dispatcher = Dispatcher::new();
        let elements = mount::mount(&config, &document, &dispatcher)?;
        let host = DomHost::new(window, document, elements, dispatcher.clone())?;

        let mut widget = VideoPlayerWidget::new(config, host);
        let error_callback: ErrorCallback = Rc::new(RefCell::new(None));
        let callback = error_callback.clone();
        widget.on_error(move |error| {
            let message = JsValue::from_str(&format!("[vplayer] {}: {}", error.error_code(), error));
            if error.is_recoverable() {
                web_sys::console::warn_1(&message);
            } else {
                web_sys::console::error_1(&message);
            }
            if let Some(ref function) = *callback.borrow() {
                if let Err(err) = function.call2(
                    &JsValue::NULL,
                    &JsValue::from_str(error.error_code()),
                    &JsValue::from_str(&error.to_string()),
                ) {
                    dom_host::log_error("error callback threw", &err);
                }
            }
        });

        let widget = Rc::new(RefCell::new(widget));
        dispatcher.attach(&widget);

        Ok(VideoPlayer {
            widget,
            dispatcher,
            error_callback,
        })
    }

    /// Receive `(code, message)` for every reported error
    #[wasm_bindgen(js_name = setErrorCallback)]
    pub fn set_error_callback(&self, callback: js_sys::Function) {
        *self.error_callback.borrow_mut() = Some(callback);
    }

    #[wasm_bindgen(js_name = togglePlayPause)]
    pub fn toggle_play_pause(&self) {
        self.dispatcher.dispatch(WidgetEvent::PlayPauseClick);
    }

    #[wasm_bindgen(js_name = toggleMute)]
    pub fn toggle_mute(&self) {
        self.dispatcher.dispatch(WidgetEvent::MuteClick);
    }

    #[wasm_bindgen(js_name = toggleFullscreen)]
    pub fn toggle_fullscreen(&self) {
        self.dispatcher.dispatch(WidgetEvent::FullscreenClick);
    }

    /// Jump by the skip interval; negative `direction` skips backwards
    pub fn skip(&self, direction: i32) {
        let event = if direction < 0 {
            WidgetEvent::SkipBackward
        } else {
            WidgetEvent::SkipForward
        };
        self.dispatcher.dispatch(event);
    }

    #[wasm_bindgen(js_name = selectQuality)]
    pub fn select_quality(&self, index: usize) {
        self.dispatcher.dispatch(WidgetEvent::QualitySelected { index });
    }

    #[wasm_bindgen(js_name = selectSubtitle)]
    pub fn select_subtitle(&self, index: usize) {
        self.dispatcher.dispatch(WidgetEvent::SubtitleSelected { index });
    }

    /// Name of the quality variant currently loaded
    #[wasm_bindgen(js_name = activeQuality)]
    pub fn active_quality(&self) -> Option<String> {
        let widget = self.widget.try_borrow().ok()?;
        widget.active_quality().map(|quality| quality.name.clone())
    }

    /// Snapshot of the rendered control state
    #[wasm_bindgen(js_name = uiState)]
    pub fn ui_state(&self) -> Result<JsValue, JsValue> {
        let widget = self
            .widget
            .try_borrow()
            .map_err(|_| JsValue::from_str("widget is busy"))?;
        serde_wasm_bindgen::to_value(widget.ui()).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
