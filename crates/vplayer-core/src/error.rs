//! Error types for vplayer Core

use thiserror::Error;

/// Result type alias for widget operations
pub type Result<T> = std::result::Result<T, Error>;

/// Widget error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No quality variants configured")]
    NoQualityVariants,

    #[error("Unknown quality variant index: {0}")]
    UnknownQuality(usize),

    #[error("Unknown subtitle option index: {0}")]
    UnknownSubtitle(usize),

    // Playback errors
    #[error("Playback request rejected: {0}")]
    PlayRejected(String),

    #[error("Resume after quality switch rejected: {0}")]
    ResumeRejected(String),

    #[error("Failed to load media source: {src}")]
    MediaLoad { src: String },

    // Presentation errors
    #[error("Fullscreen request rejected: {0}")]
    FullscreenRejected(String),

    #[error("Element already registered for role: {0}")]
    DuplicateElement(String),

    #[error("DOM error: {0}")]
    Dom(String),
}

impl Error {
    /// Returns true if the widget keeps working normally after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::PlayRejected(_)
                | Error::ResumeRejected(_)
                | Error::MediaLoad { .. }
                | Error::FullscreenRejected(_)
                | Error::UnknownQuality(_)
                | Error::UnknownSubtitle(_)
        )
    }

    /// Returns the error code reported to status callbacks
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::NoQualityVariants => "NO_QUALITY",
            Error::UnknownQuality(_) => "UNKNOWN_QUALITY",
            Error::UnknownSubtitle(_) => "UNKNOWN_SUBTITLE",
            Error::PlayRejected(_) => "PLAY_REJECTED",
            Error::ResumeRejected(_) => "RESUME_REJECTED",
            Error::MediaLoad { .. } => "MEDIA_LOAD",
            Error::FullscreenRejected(_) => "FULLSCREEN_REJECTED",
            Error::DuplicateElement(_) => "DUPLICATE_ELEMENT",
            Error::Dom(_) => "DOM",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(Error::PlayRejected("NotAllowedError".into()).error_code(), "PLAY_REJECTED");
        assert_eq!(Error::MediaLoad { src: "a.mp4".into() }.error_code(), "MEDIA_LOAD");
        assert_eq!(Error::NoQualityVariants.error_code(), "NO_QUALITY");
    }

    #[test]
    fn test_recoverable() {
        assert!(Error::FullscreenRejected("denied".into()).is_recoverable());
        assert!(!Error::InvalidConfig("bad".into()).is_recoverable());
        assert!(!Error::NoQualityVariants.is_recoverable());
    }

    #[test]
    fn test_json_error_conversion() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }
}
