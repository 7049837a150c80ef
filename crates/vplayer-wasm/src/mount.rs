//! DOM mounting - materializes the layout tree and wires event listeners

use crate::dispatcher::Dispatcher;
use vplayer_core::{build_layout, ElementRegistry, ElementSpec, PlayerConfig, Role, WidgetEvent};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, MouseEvent};

/// Id of a pre-existing video element adopted by the widget
const VIDEO_ELEMENT_ID: &str = "video";

/// Media lifecycle events forwarded to the widget
const MEDIA_EVENTS: [(&str, WidgetEvent); 5] = [
    ("loadedmetadata", WidgetEvent::LoadedMetadata),
    ("timeupdate", WidgetEvent::TimeUpdate),
    ("canplay", WidgetEvent::CanPlay),
    ("ended", WidgetEvent::Ended),
    ("error", WidgetEvent::MediaError),
];

/// Build the widget's DOM and attach it to the document.
///
/// An existing `#video` element is adopted and the container takes its place
/// in the document; otherwise a new video element is created and the
/// container is appended to `<body>`.
pub fn mount(
    config: &PlayerConfig,
    document: &Document,
    dispatcher: &Dispatcher,
) -> Result<ElementRegistry<Element>, JsValue> {
    let layout = build_layout(config);

    let existing = document.get_element_by_id(VIDEO_ELEMENT_ID);
    let anchor = existing
        .as_ref()
        .and_then(|video| video.parent_node().map(|parent| (parent, video.next_sibling())));

    let mut registry = ElementRegistry::new();
    let container = layout
        .materialize(
            &mut |spec: &ElementSpec| {
                let element = match (&existing, spec.role) {
                    (Some(video), Some(Role::Video)) => video.clone(),
                    _ => document.create_element(&spec.tag).map_err(to_core)?,
                };
                apply_spec(&element, spec).map_err(to_core)?;
                if let Some(ref event) = spec.on_click {
                    listen(&element, "click", dispatcher, {
                        let event = event.clone();
                        move |_| Some(event.clone())
                    })
                    .map_err(to_core)?;
                }
                Ok(element)
            },
            &mut |parent: &Element, child: &Element| {
                parent.append_child(child).map(|_| ()).map_err(to_core)
            },
            &mut registry,
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    match anchor {
        Some((parent, next)) => {
            parent.insert_before(&container, next.as_ref())?;
        }
        None => {
            let body = document
                .body()
                .ok_or_else(|| JsValue::from_str("document has no body"))?;
            body.append_child(&container)?;
        }
    }

    wire_listeners(document, &registry, dispatcher)?;
    Ok(registry)
}

fn apply_spec(element: &Element, spec: &ElementSpec) -> Result<(), JsValue> {
    if let Some(ref id) = spec.id {
        element.set_id(id);
    }
    if !spec.classes.is_empty() {
        element.set_class_name(&spec.classes.join(" "));
    }
    for (name, value) in &spec.attributes {
        element.set_attribute(name, value)?;
    }
    if let Some(style) = spec.style_attribute() {
        element.set_attribute("style", &style)?;
    }
    if let Some(ref text) = spec.text {
        element.set_text_content(Some(text));
    }
    Ok(())
}

fn wire_listeners(
    document: &Document,
    registry: &ElementRegistry<Element>,
    dispatcher: &Dispatcher,
) -> Result<(), JsValue> {
    let video = registry.require(Role::Video).map_err(from_core)?.clone();
    for (name, event) in MEDIA_EVENTS {
        listen(&video, name, dispatcher, move |_| Some(event.clone()))?;
    }

    // Only clicks on the video surface itself toggle playback
    let surface = video.clone();
    listen(&video, "click", dispatcher, move |event| {
        let on_surface = event
            .target()
            .and_then(|target| target.dyn_into::<Element>().ok())
            .is_some_and(|target| target == surface);
        on_surface.then_some(WidgetEvent::VideoClick)
    })?;

    let track = registry.require(Role::ProgressBar).map_err(from_core)?.clone();
    let bounds = track.clone();
    listen(&track, "click", dispatcher, move |event| {
        let pointer = event.dyn_ref::<MouseEvent>()?;
        let rect = bounds.get_bounding_client_rect();
        Some(WidgetEvent::ProgressClick {
            pointer_x: f64::from(pointer.client_x()),
            track_left: rect.left(),
            track_width: rect.width(),
        })
    })?;

    let settings = registry.require(Role::SettingsButton).map_err(from_core)?;
    listen(settings, "click", dispatcher, |event| {
        event.stop_propagation();
        Some(WidgetEvent::SettingsClick)
    })?;

    let menu = registry.require(Role::SettingsMenu).map_err(from_core)?;
    listen(menu, "click", dispatcher, |event| {
        event.stop_propagation();
        None
    })?;

    listen(document, "click", dispatcher, |_| Some(WidgetEvent::DocumentClick))?;
    listen(document, "mousemove", dispatcher, |_| Some(WidgetEvent::PointerMove))?;

    Ok(())
}

/// Attach a listener for the lifetime of the page
fn listen<F>(
    target: &EventTarget,
    name: &str,
    dispatcher: &Dispatcher,
    mut translate: F,
) -> Result<(), JsValue>
where
    F: FnMut(&Event) -> Option<WidgetEvent> + 'static,
{
    let dispatcher = dispatcher.clone();
    let callback = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        if let Some(widget_event) = translate(&event) {
            dispatcher.dispatch(widget_event);
        }
    });
    target.add_event_listener_with_callback(name, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

fn to_core(err: JsValue) -> vplayer_core::Error {
    vplayer_core::Error::Dom(crate::dom_host::describe(&err))
}

fn from_core(err: vplayer_core::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}
