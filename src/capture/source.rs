// Frame sources feeding the observer
use super::region::CaptureRegion;
use crate::error::{ObserverError, ObserverResult};
use image::RgbImage;
use std::path::{Path, PathBuf};

// Trait defining capture capabilities (screen, file or in-memory implementations)
pub trait FrameSource: Send + Sync {
    /// Capture a 3-channel frame of the whole source or of `region`
    fn grab(&self, region: Option<&CaptureRegion>) -> ObserverResult<RgbImage>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn grab(&self, region: Option<&CaptureRegion>) -> ObserverResult<RgbImage> {
        (**self).grab(region)
    }
}

fn apply_region(frame: RgbImage, region: Option<&CaptureRegion>) -> ObserverResult<RgbImage> {
    match region {
        Some(region) => region.crop(&frame),
        None => Ok(frame),
    }
}

/// Always returns the same frame
#[derive(Debug, Clone)]
pub struct StaticFrame {
    frame: RgbImage,
}

impl StaticFrame {
    pub fn new(frame: RgbImage) -> Self {
        Self { frame }
    }
}

impl FrameSource for StaticFrame {
    fn grab(&self, region: Option<&CaptureRegion>) -> ObserverResult<RgbImage> {
        apply_region(self.frame.clone(), region)
    }
}

/// Re-reads an image file on every grab, e.g. a screenshot another tool keeps overwriting
#[derive(Debug, Clone)]
pub struct ImageFileSource {
    path: PathBuf,
}

impl ImageFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FrameSource for ImageFileSource {
    fn grab(&self, region: Option<&CaptureRegion>) -> ObserverResult<RgbImage> {
        let frame = image::open(&self.path)
            .map_err(|source| ObserverError::ImageLoad {
                path: self.path.clone(),
                source,
            })?
            .to_rgb8();
        log::trace!(
            "📸 Read frame {}x{} from {}",
            frame.width(),
            frame.height(),
            self.path.display()
        );
        apply_region(frame, region)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_static_frame_full_and_region() {
        let source = StaticFrame::new(RgbImage::from_pixel(6, 4, Rgb([9, 9, 9])));

        assert_eq!(source.grab(None).unwrap().dimensions(), (6, 4));
        let region = CaptureRegion::new(1, 1, 2, 2);
        assert_eq!(source.grab(Some(&region)).unwrap().dimensions(), (2, 2));
    }

    #[test]
    fn test_file_source_reads_png() {
        let path = std::env::temp_dir().join(format!("screen-observer-frame-{}.png", std::process::id()));
        RgbImage::from_pixel(3, 2, Rgb([1, 2, 3])).save(&path).unwrap();

        let frame = ImageFileSource::new(&path).grab(None).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(frame.dimensions(), (3, 2));
        assert_eq!(frame.get_pixel(2, 1), &Rgb([1, 2, 3]));
    }

    #[test]
    fn test_file_source_missing_file() {
        let err = ImageFileSource::new("missing-frame.png").grab(None).unwrap_err();
        assert!(matches!(err, ObserverError::ImageLoad { .. }));
    }
}
