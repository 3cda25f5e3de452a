pub mod capture;
pub mod error;
pub mod observer;
pub mod template_matching;

pub use capture::{CaptureRegion, FrameSource, ImageFileSource, StaticFrame};
pub use error::{ObserverError, ObserverResult};
pub use observer::{EventKind, Listener, Observer, ObserverConfig, ObserverEvent};
pub use template_matching::{Location, MatchResult, SqDiffMatcher, Template, TemplateMatcher};

#[cfg(feature = "screen")]
pub use capture::ScreenSource;
