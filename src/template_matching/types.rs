/// Template matching data types
use crate::error::{ObserverError, ObserverResult};
use image::{DynamicImage, ImageBuffer, Luma, RgbImage, RgbaImage};
use std::fmt;
use std::path::Path;

/// Per-pixel match weights in [0,1], taken from the template's alpha channel
pub type Mask = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Pixel position of a match inside the captured frame (top-left corner of the template)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub x: u32,
    pub y: u32,
}

impl Location {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl From<(u32, u32)> for Location {
    fn from((x, y): (u32, u32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Best placement found by a matcher, before normalization
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RawMatch {
    pub location: Location,
    /// Sum of (mask-weighted) squared differences over all three channels
    pub raw_distance: f64,
}

/// Normalized result of one check
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResult {
    pub location: Location,
    /// Similarity score (0.0-1.0), 1.0 is a perfect match
    pub similarity: f64,
}

impl MatchResult {
    pub fn new(location: Location, similarity: f64) -> Self {
        Self {
            location,
            similarity,
        }
    }

    /// Format match with similarity percentage
    pub fn describe(&self) -> String {
        format!("{} - {:.1}%", self.location, self.similarity * 100.0)
    }
}

/// Image searched for in every captured frame.
///
/// Built from 3-channel (RGB) or 4-channel (RGBA) input. With an alpha channel the
/// alpha becomes a weight mask and `sq_alpha` is the sum of squared weights; without
/// one `sq_alpha` is the pixel count. A template whose mask sums to zero is
/// degenerate: it matches everything perfectly.
#[derive(Clone, Debug)]
pub struct Template {
    label: Option<String>,
    color: RgbImage,
    mask: Option<Mask>,
    sq_alpha: f64,
}

impl Template {
    /// Load a template from an image file, labelled with the file stem
    pub fn open(path: impl AsRef<Path>) -> ObserverResult<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| ObserverError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;

        let mut template = Self::from_dynamic(image)?;
        template.label = path
            .file_stem()
            .and_then(|s| s.to_str())
            .map(str::to_string);
        Ok(template)
    }

    /// Build from a decoded image, dispatching on its channel count
    pub fn from_dynamic(image: DynamicImage) -> ObserverResult<Self> {
        match image.color().channel_count() {
            4 => Ok(Self::from_rgba(&image.to_rgba8())),
            3 => Ok(Self::from_rgb(image.to_rgb8())),
            channels => Err(ObserverError::InvalidTemplate { channels }),
        }
    }

    /// Unmasked template; every pixel has weight 1
    pub fn from_rgb(color: RgbImage) -> Self {
        let sq_alpha = color.width() as f64 * color.height() as f64;
        Self {
            label: None,
            color,
            mask: None,
            sq_alpha,
        }
    }

    /// Split color and alpha; alpha scaled to [0,1] becomes the weight mask
    pub fn from_rgba(rgba: &RgbaImage) -> Self {
        let (width, height) = rgba.dimensions();
        let color = RgbImage::from_fn(width, height, |x, y| {
            let [r, g, b, _] = rgba.get_pixel(x, y).0;
            image::Rgb([r, g, b])
        });
        let mask = Mask::from_fn(width, height, |x, y| {
            let alpha = rgba.get_pixel(x, y).0[3] as f32 * (1.0 / 255.0);
            Luma([alpha.clamp(0.0, 1.0)])
        });
        let sq_alpha = mask.pixels().map(|p| (p.0[0] as f64).powi(2)).sum();

        Self {
            label: None,
            color,
            mask: Some(mask),
            sq_alpha,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn color(&self) -> &RgbImage {
        &self.color
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }

    /// Maximum possible squared-difference energy divided by `MAX_DIFF`
    pub fn sq_alpha(&self) -> f64 {
        self.sq_alpha
    }

    /// Zero total weight: always reported as a perfect match at the sentinel location
    pub fn is_degenerate(&self) -> bool {
        self.sq_alpha == 0.0
    }

    /// Get the template name for display
    pub fn display_name(&self) -> String {
        format!(
            "{}-[{}x{}]",
            self.label.as_deref().unwrap_or("template"),
            self.width(),
            self.height()
        )
    }
}
