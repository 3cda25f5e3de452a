use crate::capture::CaptureRegion;
use crate::observer::EventKind;
use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for observer operations.
pub type ObserverResult<T> = Result<T, ObserverError>;

/// The error type for template construction, capture, matching and the observer lifecycle.
#[derive(Debug, Error)]
pub enum ObserverError {
    #[error("Invalid template: expected 3 or 4 channels, got {channels}")]
    InvalidTemplate { channels: u8 },

    #[error("Failed to load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Unknown event kind '{name}', expected one of: found, lost, moved")]
    UnknownEventKind { name: String },

    #[error("Listener is not registered for {kind} events")]
    NotRegistered { kind: EventKind },

    #[error("Observer is already running")]
    AlreadyRunning,

    #[error("Observer is not running")]
    NotRunning,

    #[error("Observer must be started from within a tokio runtime")]
    NoRuntime,

    #[error("Frame capture failed: {description}")]
    Capture { description: String },

    #[error("Capture region {region} lies outside the {width}x{height} frame")]
    RegionOutOfBounds {
        region: CaptureRegion,
        width: u32,
        height: u32,
    },

    #[error(
        "Frame ({frame_width}x{frame_height}) is smaller than the template ({template_width}x{template_height})"
    )]
    FrameTooSmall {
        frame_width: u32,
        frame_height: u32,
        template_width: u32,
        template_height: u32,
    },

    #[error("Polling task failed to complete: {source}")]
    JoinError {
        #[from]
        source: tokio::task::JoinError,
    },
}

impl ObserverError {
    /// Check if this error comes from calling start/stop/tick in the wrong lifecycle state
    pub fn is_lifecycle_misuse(&self) -> bool {
        matches!(
            self,
            ObserverError::AlreadyRunning | ObserverError::NotRunning | ObserverError::NoRuntime
        )
    }

    pub(crate) fn capture(description: impl Into<String>) -> Self {
        ObserverError::Capture {
            description: description.into(),
        }
    }
}
