//! Capture region restricting the observed area of a frame

use crate::error::{ObserverError, ObserverResult};
use image::RgbImage;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CaptureRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Parse `x,y,width,height` (e.g. "300,1682,50,50"); whitespace around numbers is allowed
    pub fn parse(text: &str) -> Option<CaptureRegion> {
        let mut fields = text.split(',').map(|field| field.trim().parse::<u32>().ok());
        let region = CaptureRegion::new(
            fields.next()??,
            fields.next()??,
            fields.next()??,
            fields.next()??,
        );
        fields.next().is_none().then_some(region)
    }

    /// Clip region to frame boundaries, `None` when nothing of it is inside
    pub fn clip_to_frame(&self, frame_width: u32, frame_height: u32) -> Option<CaptureRegion> {
        if self.x >= frame_width || self.y >= frame_height {
            return None;
        }
        let clipped = CaptureRegion {
            x: self.x,
            y: self.y,
            width: self.width.min(frame_width - self.x),
            height: self.height.min(frame_height - self.y),
        };
        clipped.has_area().then_some(clipped)
    }

    /// Cut this region out of a frame, clipping it to the frame first
    pub fn crop(&self, frame: &RgbImage) -> ObserverResult<RgbImage> {
        let (width, height) = frame.dimensions();
        let clipped = self
            .clip_to_frame(width, height)
            .ok_or(ObserverError::RegionOutOfBounds {
                region: *self,
                width,
                height,
            })?;

        Ok(image::imageops::crop_imm(
            frame,
            clipped.x,
            clipped.y,
            clipped.width,
            clipped.height,
        )
        .to_image())
    }

    pub fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}

impl fmt::Display for CaptureRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{},{}]", self.x, self.y, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_parse_region() {
        assert_eq!(
            CaptureRegion::parse("300, 1682,50,50"),
            Some(CaptureRegion::new(300, 1682, 50, 50))
        );
        assert_eq!(CaptureRegion::parse("1,2,3"), None);
        assert_eq!(CaptureRegion::parse("1,2,3,4,5"), None);
        assert_eq!(CaptureRegion::parse("a,b,c,d"), None);
    }

    #[test]
    fn test_clip_to_frame_bounds() {
        let region = CaptureRegion::new(1000, 2200, 200, 200);
        let clipped = region.clip_to_frame(1080, 2280).unwrap();

        assert_eq!(clipped, CaptureRegion::new(1000, 2200, 80, 80));
        assert_eq!(region.clip_to_frame(900, 2280), None);
    }

    #[test]
    fn test_crop_takes_sub_area() {
        let frame = RgbImage::from_fn(10, 10, |x, y| Rgb([x as u8, y as u8, 0]));
        let cropped = CaptureRegion::new(2, 3, 4, 5).crop(&frame).unwrap();

        assert_eq!(cropped.dimensions(), (4, 5));
        assert_eq!(cropped.get_pixel(0, 0), &Rgb([2, 3, 0]));
    }

    #[test]
    fn test_crop_outside_frame_fails() {
        let frame = RgbImage::new(10, 10);
        let err = CaptureRegion::new(20, 0, 5, 5).crop(&frame).unwrap_err();
        assert!(matches!(err, ObserverError::RegionOutOfBounds { .. }));
    }

    #[test]
    fn test_zero_sized_region_has_no_area() {
        assert!(CaptureRegion::new(0, 0, 1, 1).has_area());
        assert!(!CaptureRegion::new(5, 5, 0, 3).has_area());
        assert_eq!(CaptureRegion::new(2, 2, 0, 4).clip_to_frame(10, 10), None);
    }
}
