// Live screen capture of the primary display
use super::region::CaptureRegion;
use super::source::FrameSource;
use crate::error::{ObserverError, ObserverResult};
use image::RgbImage;

/// Captures the primary monitor, or the first one when none reports itself primary
#[derive(Debug, Default, Clone, Copy)]
pub struct ScreenSource;

impl ScreenSource {
    pub fn new() -> Self {
        Self
    }
}

impl FrameSource for ScreenSource {
    fn grab(&self, region: Option<&CaptureRegion>) -> ObserverResult<RgbImage> {
        let monitors = xcap::Monitor::all()
            .map_err(|e| ObserverError::capture(format!("listing monitors failed: {e}")))?;
        let monitor = monitors
            .iter()
            .find(|monitor| monitor.is_primary())
            .or_else(|| monitors.first())
            .ok_or_else(|| ObserverError::capture("no monitor available"))?;

        let screen = monitor
            .capture_image()
            .map_err(|e| ObserverError::capture(format!("screen capture failed: {e}")))?;

        // Drop alpha; the matcher works on 3 channels
        let frame = image::DynamicImage::ImageRgba8(screen).to_rgb8();

        match region {
            Some(region) => region.crop(&frame),
            None => Ok(frame),
        }
    }
}
