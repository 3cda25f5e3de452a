// Capture module - produces the frames the observer searches
// Sources are interchangeable behind the FrameSource trait: a fixed in-memory
// frame, an image file re-read on every grab, or the live screen.

pub mod region;
#[cfg(feature = "screen")]
pub mod screen;
pub mod source;

pub use region::CaptureRegion;
#[cfg(feature = "screen")]
pub use screen::ScreenSource;
pub use source::{FrameSource, ImageFileSource, StaticFrame};
