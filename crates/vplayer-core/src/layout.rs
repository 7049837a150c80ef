//! Widget layout tree
//!
//! The widget's DOM is described once as a tree of [`ElementSpec`]s. The
//! browser crate materializes it into real elements; the CLI renders it as
//! static HTML. Both paths populate an [`ElementRegistry`] through
//! [`ElementSpec::materialize`].
//!
//! ```text
//! div.container
//! ├── div.top-bar
//! ├── div.video-wrapper
//! │   └── video#video.video
//! └── div.controls
//!     ├── div.progress-container > div#progress-bar.progress-bar > div#progress.progress
//!     ├── div.controls-left   (back, play/pause, forward, mute, time)
//!     ├── div.controls-right  (settings, expand)
//!     └── div#settings-menu.settings-menu
//!         ├── ul#quality-list
//!         └── ul#subtitle-list
//! ```

use crate::config::PlayerConfig;
use crate::events::WidgetEvent;
use crate::registry::{ElementRegistry, Role};
use crate::ui::{PlayIcon, VolumeIcon};
use crate::Result;
use serde::Serialize;

/// Description of one element
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub classes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub attributes: Vec<(String, String)>,
    pub style: Vec<(String, String)>,
    pub hidden: bool,
    /// Event dispatched on a plain click
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_click: Option<WidgetEvent>,
    pub children: Vec<ElementSpec>,
}

impl ElementSpec {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Default::default()
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Add space-separated classes
    pub fn class(mut self, classes: &str) -> Self {
        self.classes
            .extend(classes.split_whitespace().map(str::to_string));
        self
    }

    pub fn role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attributes.push((name.to_string(), value.into()));
        self
    }

    pub fn css(mut self, property: &str, value: impl Into<String>) -> Self {
        self.style.push((property.to_string(), value.into()));
        self
    }

    pub fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    pub fn on_click(mut self, event: WidgetEvent) -> Self {
        self.on_click = Some(event);
        self
    }

    pub fn child(mut self, child: ElementSpec) -> Self {
        self.children.push(child);
        self
    }

    /// Inline `style` attribute value, if any
    pub fn style_attribute(&self) -> Option<String> {
        let mut declarations: Vec<String> = self
            .style
            .iter()
            .map(|(property, value)| format!("{}: {}", property, value))
            .collect();
        if self.hidden {
            declarations.push("display: none".to_string());
        }
        (!declarations.is_empty()).then(|| declarations.join("; "))
    }

    /// Depth-first search for the element with a role
    pub fn find(&self, role: Role) -> Option<&ElementSpec> {
        if self.role == Some(role) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(role))
    }

    /// Build this tree bottom-up with caller-supplied node operations,
    /// registering every node that carries a role.
    pub fn materialize<N, C, A>(
        &self,
        create: &mut C,
        append: &mut A,
        registry: &mut ElementRegistry<N>,
    ) -> Result<N>
    where
        N: Clone,
        C: FnMut(&ElementSpec) -> Result<N>,
        A: FnMut(&N, &N) -> Result<()>,
    {
        let node = create(self)?;
        for child in &self.children {
            let child_node = child.materialize(create, append, registry)?;
            append(&node, &child_node)?;
        }
        if let Some(role) = self.role {
            registry.insert(role, node.clone())?;
        }
        Ok(node)
    }

    /// Render as HTML markup
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out, 0);
        out
    }

    fn write_html(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        out.push_str(&indent);
        out.push('<');
        out.push_str(&self.tag);
        if let Some(ref id) = self.id {
            push_attr(out, "id", id);
        }
        if !self.classes.is_empty() {
            push_attr(out, "class", &self.classes.join(" "));
        }
        for (name, value) in &self.attributes {
            push_attr(out, name, value);
        }
        if let Some(style) = self.style_attribute() {
            push_attr(out, "style", &style);
        }
        out.push('>');

        if let Some(ref text) = self.text {
            out.push_str(&escape(text));
        }
        if !self.children.is_empty() {
            out.push('\n');
            for child in &self.children {
                child.write_html(out, depth + 1);
            }
            out.push_str(&indent);
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push_str(">\n");
    }
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Build the widget tree for a configuration
pub fn build_layout(config: &PlayerConfig) -> ElementSpec {
    let controls = &config.controls;

    let mut container = ElementSpec::new("div").class("container").role(Role::Container);
    for (property, value) in config.dimensions.css_declarations() {
        container = container.css(property, value);
    }

    let progress = ElementSpec::new("div")
        .class("progress-container")
        .role(Role::ProgressContainer)
        .child(
            ElementSpec::new("div")
                .id("progress-bar")
                .class("progress-bar")
                .role(Role::ProgressBar)
                .child(ElementSpec::new("div").id("progress").class("progress").role(Role::Progress)),
        );

    let time_display = ElementSpec::new("div")
        .class("time-display")
        .role(Role::TimeDisplay)
        .hidden(!controls.show_time)
        .child(ElementSpec::new("span").id("current-time").role(Role::CurrentTime).text("0:00"))
        .child(ElementSpec::new("span").text(" / "))
        .child(ElementSpec::new("span").id("duration").role(Role::Duration).text("0:00"));

    let controls_left = ElementSpec::new("div")
        .class("controls-left")
        .role(Role::ControlsLeft)
        .child(icon("fa-step-backward").role(Role::BackButton).on_click(WidgetEvent::SkipBackward))
        .child(
            icon(PlayIcon::Play.class())
                .id("play-pause")
                .role(Role::PlayPauseButton)
                .on_click(WidgetEvent::PlayPauseClick),
        )
        .child(icon("fa-step-forward").role(Role::ForwardButton).on_click(WidgetEvent::SkipForward))
        .child(
            icon(VolumeIcon::Up.class())
                .id("mute")
                .role(Role::MuteButton)
                .hidden(!controls.show_volume)
                .on_click(WidgetEvent::MuteClick),
        )
        .child(time_display);

    let controls_right = ElementSpec::new("div")
        .class("controls-right")
        .role(Role::ControlsRight)
        .child(icon("fa-cog").role(Role::SettingsButton).hidden(!controls.show_settings()))
        .child(
            icon("fa-expand")
                .role(Role::ExpandButton)
                .hidden(!controls.show_fullscreen)
                .on_click(WidgetEvent::FullscreenClick),
        );

    let mut quality_list = ElementSpec::new("ul")
        .id("quality-list")
        .role(Role::QualityList)
        .hidden(!controls.show_quality)
        .child(ElementSpec::new("li").class("settings-title").text("Quality"));
    for (index, quality) in config.video_qualities.iter().enumerate() {
        quality_list = quality_list.child(
            ElementSpec::new("li")
                .text(quality.name.clone())
                .attr("data-quality", quality.name.to_lowercase())
                .on_click(WidgetEvent::QualitySelected { index }),
        );
    }

    let mut subtitle_list = ElementSpec::new("ul")
        .id("subtitle-list")
        .role(Role::SubtitleList)
        .hidden(!controls.show_subtitles)
        .child(ElementSpec::new("li").class("settings-title").text("Subtitles"));
    for (index, subtitle) in config.subtitle_options.iter().enumerate() {
        subtitle_list = subtitle_list.child(
            ElementSpec::new("li")
                .text(subtitle.label.clone())
                .attr("data-subtitle", subtitle.code.clone())
                .on_click(WidgetEvent::SubtitleSelected { index }),
        );
    }

    let settings_menu = ElementSpec::new("div")
        .id("settings-menu")
        .class("settings-menu")
        .role(Role::SettingsMenu)
        .child(quality_list)
        .child(subtitle_list);

    container
        .child(ElementSpec::new("div").class("top-bar").role(Role::TopBar))
        .child(
            ElementSpec::new("div")
                .class("video-wrapper")
                .role(Role::VideoWrapper)
                .child(ElementSpec::new("video").id("video").class("video").role(Role::Video)),
        )
        .child(
            ElementSpec::new("div")
                .class("controls")
                .role(Role::Controls)
                .child(progress)
                .child(controls_left)
                .child(controls_right)
                .child(settings_menu),
        )
}

fn icon(name: &str) -> ElementSpec {
    ElementSpec::new("i").class("fas").class(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{QualityVariant, SubtitleVariant};

    fn sample_config() -> PlayerConfig {
        let mut config = PlayerConfig::default();
        config.video_qualities = vec![
            QualityVariant::new("1080p", "hd.mp4", "hd.jpg"),
            QualityVariant::new("480p", "sd.mp4", "sd.jpg"),
        ];
        config.subtitle_options = vec![
            SubtitleVariant::none("Off"),
            SubtitleVariant::new("en", "English", "en.vtt"),
        ];
        config
    }

    #[test]
    fn test_every_role_registered_once() {
        let layout = build_layout(&sample_config());
        let mut registry = ElementRegistry::new();
        let mut next = 0usize;
        let root = layout
            .materialize(
                &mut |_spec: &ElementSpec| {
                    next += 1;
                    Ok(next)
                },
                &mut |_parent: &usize, _child: &usize| Ok(()),
                &mut registry,
            )
            .unwrap();

        assert_eq!(root, 1);
        assert_eq!(registry.len(), Role::ALL.len());
        for role in Role::ALL {
            assert!(registry.contains(role), "missing {}", role);
        }
        assert_eq!(registry.get(Role::Container), Some(&1));
    }

    #[test]
    fn test_list_items() {
        let layout = build_layout(&sample_config());
        let qualities = layout.find(Role::QualityList).unwrap();
        assert_eq!(qualities.children.len(), 3);
        assert_eq!(qualities.children[1].text.as_deref(), Some("1080p"));
        assert_eq!(
            qualities.children[2].on_click,
            Some(WidgetEvent::QualitySelected { index: 1 })
        );

        let subtitles = layout.find(Role::SubtitleList).unwrap();
        assert_eq!(
            subtitles.children[2].attributes,
            vec![("data-subtitle".to_string(), "en".to_string())]
        );
    }

    #[test]
    fn test_control_flags_hide_elements() {
        let mut config = sample_config();
        config.controls.show_fullscreen = false;
        config.controls.show_volume = false;
        config.controls.show_time = false;
        config.controls.show_quality = false;
        let layout = build_layout(&config);

        assert!(layout.find(Role::ExpandButton).unwrap().hidden);
        assert!(layout.find(Role::MuteButton).unwrap().hidden);
        assert!(layout.find(Role::TimeDisplay).unwrap().hidden);
        assert!(layout.find(Role::QualityList).unwrap().hidden);
        assert!(layout.find(Role::SubtitleList).unwrap().hidden);
        assert!(layout.find(Role::SettingsButton).unwrap().hidden);
        assert!(!layout.find(Role::PlayPauseButton).unwrap().hidden);
    }

    #[test]
    fn test_container_dimensions() {
        let layout = build_layout(&PlayerConfig::default());
        assert_eq!(
            layout.style_attribute().as_deref(),
            Some("width: 100%; height: 100%; min-width: 300px; min-height: 150px")
        );
    }

    #[test]
    fn test_html_escaping() {
        let mut config = sample_config();
        config.video_qualities[0].name = "<4K> \"HDR\"".to_string();
        let html = build_layout(&config).to_html();
        assert!(html.contains("&lt;4K&gt; &quot;HDR&quot;"));
        assert!(html.contains(r#"<video id="video" class="video"></video>"#));
        assert!(html.contains(r#"<i id="play-pause" class="fas fa-play"></i>"#));
    }
}
