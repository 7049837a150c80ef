//! Element registry - logical role to constructed node

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Logical role of a widget element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Container,
    TopBar,
    VideoWrapper,
    Video,
    Controls,
    ProgressContainer,
    ProgressBar,
    Progress,
    ControlsLeft,
    BackButton,
    PlayPauseButton,
    ForwardButton,
    MuteButton,
    TimeDisplay,
    CurrentTime,
    Duration,
    ControlsRight,
    SettingsButton,
    ExpandButton,
    SettingsMenu,
    QualityList,
    SubtitleList,
}

impl Role {
    /// Every role the layout registers
    pub const ALL: [Role; 22] = [
        Role::Container,
        Role::TopBar,
        Role::VideoWrapper,
        Role::Video,
        Role::Controls,
        Role::ProgressContainer,
        Role::ProgressBar,
        Role::Progress,
        Role::ControlsLeft,
        Role::BackButton,
        Role::PlayPauseButton,
        Role::ForwardButton,
        Role::MuteButton,
        Role::TimeDisplay,
        Role::CurrentTime,
        Role::Duration,
        Role::ControlsRight,
        Role::SettingsButton,
        Role::ExpandButton,
        Role::SettingsMenu,
        Role::QualityList,
        Role::SubtitleList,
    ];
}

impl Role {
    /// Kebab-case name, matching the serialized form
    pub fn name(&self) -> &'static str {
        match self {
            Role::Container => "container",
            Role::TopBar => "top-bar",
            Role::VideoWrapper => "video-wrapper",
            Role::Video => "video",
            Role::Controls => "controls",
            Role::ProgressContainer => "progress-container",
            Role::ProgressBar => "progress-bar",
            Role::Progress => "progress",
            Role::ControlsLeft => "controls-left",
            Role::BackButton => "back-button",
            Role::PlayPauseButton => "play-pause-button",
            Role::ForwardButton => "forward-button",
            Role::MuteButton => "mute-button",
            Role::TimeDisplay => "time-display",
            Role::CurrentTime => "current-time",
            Role::Duration => "duration",
            Role::ControlsRight => "controls-right",
            Role::SettingsButton => "settings-button",
            Role::ExpandButton => "expand-button",
            Role::SettingsMenu => "settings-menu",
            Role::QualityList => "quality-list",
            Role::SubtitleList => "subtitle-list",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Nodes keyed by role. Each role is registered at most once.
#[derive(Debug, Clone)]
pub struct ElementRegistry<N> {
    nodes: HashMap<Role, N>,
}

impl<N> Default for ElementRegistry<N> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }
}

impl<N> ElementRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a node; a role that is already taken is rejected
    pub fn insert(&mut self, role: Role, node: N) -> Result<()> {
        if self.nodes.contains_key(&role) {
            return Err(Error::DuplicateElement(role.to_string()));
        }
        self.nodes.insert(role, node);
        Ok(())
    }

    pub fn get(&self, role: Role) -> Option<&N> {
        self.nodes.get(&role)
    }

    /// Like [`get`](Self::get), but a missing role is an error
    pub fn require(&self, role: Role) -> Result<&N> {
        self.nodes
            .get(&role)
            .ok_or_else(|| Error::Dom(format!("missing element for role {}", role)))
    }

    pub fn contains(&self, role: Role) -> bool {
        self.nodes.contains_key(&role)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
