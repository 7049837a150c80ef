//! DOM host - [`MediaHost`] over the browser media, fullscreen and timer APIs

use crate::dispatcher::Dispatcher;
use js_sys::{Function, Promise};
use std::time::Duration;
use vplayer_core::ui::{SHOW_CONTROLS_CLASS, SHOW_SETTINGS_CLASS};
use vplayer_core::{
    ElementRegistry, MediaHost, PlayIcon, Role, SubtitleVariant, TimerId, TrackMode, UiState,
    VolumeIcon, WidgetEvent,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, HtmlElement, HtmlTrackElement, HtmlVideoElement, TextTrackMode, Window,
};

/// Live `setTimeout` registration
struct ScheduledHide {
    id: TimerId,
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

/// Browser implementation of [`MediaHost`]
pub struct DomHost {
    window: Window,
    document: Document,
    video: HtmlVideoElement,
    elements: ElementRegistry<Element>,
    dispatcher: Dispatcher,
    next_timer: u64,
    scheduled: Option<ScheduledHide>,
    /// Previous registration, kept until the next one so a firing callback
    /// is never dropped while it runs
    _retired: Option<ScheduledHide>,
}

impl DomHost {
    pub fn new(
        window: Window,
        document: Document,
        elements: ElementRegistry<Element>,
        dispatcher: Dispatcher,
    ) -> Result<Self, JsValue> {
        let video = elements
            .require(Role::Video)
            .map_err(|e| JsValue::from_str(&e.to_string()))?
            .clone()
            .dyn_into::<HtmlVideoElement>()?;

        Ok(Self {
            window,
            document,
            video,
            elements,
            dispatcher,
            next_timer: 0,
            scheduled: None,
            _retired: None,
        })
    }

    fn element(&self, role: Role) -> Option<&Element> {
        self.elements.get(role)
    }

    fn set_class(&self, role: Role, class: &str, on: bool) {
        if let Some(element) = self.element(role) {
            if let Err(err) = element.class_list().toggle_with_force(class, on) {
                log_error("class toggle failed", &err);
            }
        }
    }

    fn swap_icon(&self, role: Role, remove: &[&str], add: &str) {
        let Some(element) = self.element(role) else {
            return;
        };
        let classes = element.class_list();
        for class in remove {
            if let Err(err) = classes.remove_1(class) {
                log_error("icon class removal failed", &err);
            }
        }
        if let Err(err) = classes.add_1(add) {
            log_error("icon class update failed", &err);
        }
    }

    fn set_text(&self, role: Role, text: &str) {
        if let Some(element) = self.element(role) {
            element.set_text_content(Some(text));
        }
    }

    fn text_track(&self, index: usize) -> Option<web_sys::TextTrack> {
        self.video.text_tracks()?.get(index as u32)
    }
}

impl MediaHost for DomHost {
    fn paused(&self) -> bool {
        self.video.paused()
    }

    fn current_time(&self) -> f64 {
        self.video.current_time()
    }

    fn duration(&self) -> Option<f64> {
        let duration = self.video.duration();
        duration.is_finite().then_some(duration)
    }

    fn muted(&self) -> bool {
        self.video.muted()
    }

    fn is_fullscreen(&self) -> bool {
        self.document.fullscreen_element().is_some()
    }

    fn text_track_languages(&self) -> Vec<String> {
        let Some(tracks) = self.video.text_tracks() else {
            return Vec::new();
        };
        (0..tracks.length())
            .filter_map(|index| tracks.get(index))
            .map(|track| track.language())
            .collect()
    }

    fn set_source(&mut self, src: &str, poster: &str) {
        self.video.set_src(src);
        self.video.set_poster(poster);
    }

    fn set_playback_attributes(&mut self, autoplay: bool, looping: bool) {
        self.video.set_autoplay(autoplay);
        self.video.set_loop(looping);
    }

    fn load(&mut self) {
        self.video.load();
    }

    fn play(&mut self) {
        let dispatcher = self.dispatcher.clone();
        match self.video.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                let event = match JsFuture::from(promise).await {
                    Ok(_) => WidgetEvent::PlayResolved,
                    Err(err) => WidgetEvent::PlayRejected {
                        reason: describe(&err),
                    },
                };
                dispatcher.dispatch(event);
            }),
            Err(err) => dispatcher.dispatch(WidgetEvent::PlayRejected {
                reason: describe(&err),
            }),
        }
    }

    fn pause(&mut self) {
        if let Err(err) = self.video.pause() {
            log_error("pause failed", &err);
        }
    }

    fn seek(&mut self, time: f64) {
        self.video.set_current_time(time);
    }

    fn set_muted(&mut self, muted: bool) {
        self.video.set_muted(muted);
    }

    fn request_fullscreen(&mut self) {
        let Some(container) = self.element(Role::Container) else {
            return;
        };
        // web-sys drops the returned promise, so call the method directly
        let dispatcher = self.dispatcher.clone();
        match call_method(container, "requestFullscreen") {
            Ok(result) => {
                let Ok(promise) = result.dyn_into::<Promise>() else {
                    return;
                };
                wasm_bindgen_futures::spawn_local(async move {
                    if let Err(err) = JsFuture::from(promise).await {
                        dispatcher.dispatch(WidgetEvent::FullscreenRejected {
                            reason: describe(&err),
                        });
                    }
                });
            }
            Err(err) => dispatcher.dispatch(WidgetEvent::FullscreenRejected {
                reason: describe(&err),
            }),
        }
    }

    fn exit_fullscreen(&mut self) {
        self.document.exit_fullscreen();
    }

    fn add_text_track(&mut self, subtitle: &SubtitleVariant) {
        let track = match self
            .document
            .create_element("track")
            .and_then(|element| element.dyn_into::<HtmlTrackElement>().map_err(JsValue::from))
        {
            Ok(track) => track,
            Err(err) => {
                log_error("track creation failed", &err);
                return;
            }
        };
        track.set_kind("subtitles");
        track.set_label(&subtitle.label);
        track.set_srclang(&subtitle.code);
        track.set_src(subtitle.src.as_deref().unwrap_or_default());
        if let Err(err) = self.video.append_child(&track) {
            log_error("track attach failed", &err);
        }
    }

    fn set_text_track_mode(&mut self, index: usize, mode: TrackMode) {
        if let Some(track) = self.text_track(index) {
            track.set_mode(match mode {
                TrackMode::Disabled => TextTrackMode::Disabled,
                TrackMode::Hidden => TextTrackMode::Hidden,
                TrackMode::Showing => TextTrackMode::Showing,
            });
        }
    }

    fn schedule_hide(&mut self, delay: Duration) -> TimerId {
        self.next_timer += 1;
        let id = TimerId(self.next_timer);

        let dispatcher = self.dispatcher.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            dispatcher.dispatch(WidgetEvent::HideTimerFired { timer: id });
        });
        let millis = delay.as_millis().min(i32::MAX as u128) as i32;

        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                millis,
            ) {
            Ok(handle) => {
                self._retired = self.scheduled.replace(ScheduledHide {
                    id,
                    handle,
                    _callback: callback,
                });
            }
            Err(err) => log_error("setTimeout failed", &err),
        }
        id
    }

    fn cancel_hide(&mut self, timer: TimerId) {
        if let Some(scheduled) = self.scheduled.as_ref().filter(|s| s.id == timer) {
            self.window.clear_timeout_with_handle(scheduled.handle);
        }
    }

    fn render(&mut self, ui: &UiState) {
        self.set_class(Role::Controls, SHOW_CONTROLS_CLASS, ui.controls_visible);
        self.set_class(Role::TopBar, SHOW_CONTROLS_CLASS, ui.controls_visible);
        self.set_class(Role::SettingsMenu, SHOW_SETTINGS_CLASS, ui.settings_open);

        self.swap_icon(
            Role::PlayPauseButton,
            &[PlayIcon::Play.class(), PlayIcon::Pause.class()],
            ui.play_icon.class(),
        );
        self.swap_icon(
            Role::MuteButton,
            &[VolumeIcon::Up.class(), VolumeIcon::Muted.class()],
            ui.volume_icon.class(),
        );

        if let Some(progress) = self
            .element(Role::Progress)
            .and_then(|element| element.dyn_ref::<HtmlElement>())
        {
            let width = format!("{}%", ui.progress_percent);
            if let Err(err) = progress.style().set_property("width", &width) {
                log_error("progress update failed", &err);
            }
        }

        self.set_text(Role::CurrentTime, &ui.current_time_label);
        self.set_text(Role::Duration, &ui.duration_label);
    }
}

/// Invoke a zero-argument method and return its raw result
fn call_method(target: &JsValue, name: &str) -> Result<JsValue, JsValue> {
    let method = js_sys::Reflect::get(target, &JsValue::from_str(name))?
        .dyn_into::<Function>()?;
    method.call0(target)
}

/// Readable description of a rejected browser request
pub(crate) fn describe(err: &JsValue) -> String {
    if let Some(message) = err.as_string() {
        return message;
    }
    js_sys::Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|name| name.as_string())
        .unwrap_or_else(|| format!("{:?}", err))
}

pub(crate) fn log_error(context: &str, err: &JsValue) {
    web_sys::console::error_2(&format!("[vplayer] {}", context).into(), err);
}
