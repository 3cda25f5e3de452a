/// Template matching implementation
///
/// Masked sum-of-squared-differences search plus the similarity normalization
/// shared by every matcher.
use super::types::{Location, RawMatch, Template};
use crate::error::{ObserverError, ObserverResult};
use image::{ImageBuffer, Luma, RgbImage};
use imageproc::template_matching::find_extremes;

/// Maximum squared difference of one pixel across its three channels
pub const MAX_DIFF: f64 = 3.0 * 255.0 * 255.0;

/// Location reported for degenerate (zero-weight) templates
pub const DEGENERATE_LOCATION: Location = Location { x: 0, y: 0 };

/// Convert a raw squared-difference distance into a similarity in [0,1].
///
/// `sq_alpha` is the template's total squared weight, so `MAX_DIFF * sq_alpha` is the
/// largest distance the template can produce. Out-of-range or non-finite input is
/// clipped; a non-positive `sq_alpha` is treated as a degenerate template.
pub fn normalize_similarity(raw_distance: f64, sq_alpha: f64) -> f64 {
    if sq_alpha <= 0.0 {
        return 1.0;
    }
    let similarity = 1.0 - raw_distance / MAX_DIFF / sq_alpha;
    if similarity.is_nan() {
        return 0.0;
    }
    similarity.clamp(0.0, 1.0)
}

/// Finds the best placement of a template in a frame
pub trait TemplateMatcher: Send + Sync {
    /// Return the placement with the lowest raw squared-difference distance
    fn find_best(&self, frame: &RgbImage, template: &Template) -> ObserverResult<RawMatch>;
}

/// Exhaustive masked SSD matcher
///
/// For each placement computes `Σ w² · Σc (T - I)²` where `w` is the template's
/// alpha weight (1 without a mask). The score map's minimum is the best match.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqDiffMatcher;

impl SqDiffMatcher {
    pub fn new() -> Self {
        Self
    }

    /// Raw distance of the template placed with its top-left corner at (x, y).
    ///
    /// Walks the whole template window, so a full search costs O(W·H·w·h); keep
    /// templates small or narrow the frame with a capture region.
    fn distance_at(
        &self,
        frame: &RgbImage,
        template: &Template,
        weights: Option<&[f32]>,
        x: u32,
        y: u32,
    ) -> f64 {
        let mut sum_sq_diff = 0.0;

        for (i, (tx, ty, t_pixel)) in template.color().enumerate_pixels().enumerate() {
            let weight = match weights {
                Some(w) if w[i] == 0.0 => continue,
                Some(w) => w[i] as f64,
                None => 1.0,
            };

            let f_pixel = frame.get_pixel(x + tx, y + ty);
            let mut pixel_sq = 0.0;
            for c in 0..3 {
                let diff = (t_pixel.0[c] as i32) - (f_pixel.0[c] as i32);
                pixel_sq += (diff * diff) as f64;
            }
            sum_sq_diff += weight * pixel_sq;
        }

        sum_sq_diff
    }
}

impl TemplateMatcher for SqDiffMatcher {
    fn find_best(&self, frame: &RgbImage, template: &Template) -> ObserverResult<RawMatch> {
        let (frame_width, frame_height) = frame.dimensions();
        if template.width() > frame_width
            || template.height() > frame_height
            || template.width() == 0
            || template.height() == 0
        {
            return Err(ObserverError::FrameTooSmall {
                frame_width,
                frame_height,
                template_width: template.width(),
                template_height: template.height(),
            });
        }

        // Squared mask weights, row-major like enumerate_pixels()
        let weights: Option<Vec<f32>> = template
            .mask()
            .map(|mask| mask.pixels().map(|p| p.0[0] * p.0[0]).collect());

        let map_width = frame_width - template.width() + 1;
        let map_height = frame_height - template.height() + 1;

        let scores: ImageBuffer<Luma<f32>, Vec<f32>> =
            ImageBuffer::from_fn(map_width, map_height, |x, y| {
                Luma([self.distance_at(frame, template, weights.as_deref(), x, y) as f32])
            });

        let extremes = find_extremes(&scores);
        log::trace!(
            "SSD map {}x{} for {}: min={} at {:?}",
            map_width,
            map_height,
            template.display_name(),
            extremes.min_value,
            extremes.min_value_location
        );

        Ok(RawMatch {
            location: extremes.min_value_location.into(),
            raw_distance: extremes.min_value as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbaImage, Rgba};

    fn textured_frame(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 17 % 256) as u8, (y * 29 % 256) as u8, ((x + y) * 7 % 256) as u8])
        })
    }

    #[test]
    fn test_similarity_perfect_and_worst() {
        assert_eq!(normalize_similarity(0.0, 100.0), 1.0);
        assert_eq!(normalize_similarity(MAX_DIFF * 100.0, 100.0), 0.0);
        assert!((normalize_similarity(MAX_DIFF * 25.0, 100.0) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_similarity_clipped_for_adversarial_distances() {
        assert_eq!(normalize_similarity(-5.0, 10.0), 1.0);
        assert_eq!(normalize_similarity(MAX_DIFF * 11.0, 10.0), 0.0);
        assert_eq!(normalize_similarity(f64::INFINITY, 10.0), 0.0);
        assert_eq!(normalize_similarity(f64::NAN, 10.0), 0.0);
        assert_eq!(normalize_similarity(f64::NEG_INFINITY, 10.0), 1.0);
    }

    #[test]
    fn test_similarity_degenerate_is_one() {
        assert_eq!(normalize_similarity(12345.0, 0.0), 1.0);
    }

    #[test]
    fn test_finds_embedded_template() {
        let frame = textured_frame(40, 30);
        let crop = image::imageops::crop_imm(&frame, 13, 7, 6, 5).to_image();
        let template = Template::from_rgb(crop);

        let best = SqDiffMatcher::new().find_best(&frame, &template).unwrap();

        assert_eq!(best.location, Location::new(13, 7));
        assert_eq!(best.raw_distance, 0.0);
        assert_eq!(normalize_similarity(best.raw_distance, template.sq_alpha()), 1.0);
    }

    #[test]
    fn test_transparent_pixels_are_ignored() {
        let frame = textured_frame(30, 30);
        let crop = image::imageops::crop_imm(&frame, 4, 9, 5, 5).to_image();

        // Corrupt one pixel but make it fully transparent
        let mut rgba = RgbaImage::from_fn(5, 5, |x, y| {
            let [r, g, b] = crop.get_pixel(x, y).0;
            Rgba([r, g, b, 255])
        });
        rgba.put_pixel(2, 2, Rgba([255, 255, 255, 0]));
        let template = Template::from_rgba(&rgba);

        let best = SqDiffMatcher::new().find_best(&frame, &template).unwrap();

        assert_eq!(best.location, Location::new(4, 9));
        assert_eq!(best.raw_distance, 0.0);
    }

    #[test]
    fn test_inverted_template_scores_low() {
        let frame = RgbImage::from_pixel(8, 8, Rgb([0, 0, 0]));
        let template = Template::from_rgb(RgbImage::from_pixel(8, 8, Rgb([255, 255, 255])));

        let best = SqDiffMatcher::new().find_best(&frame, &template).unwrap();

        assert_eq!(best.location, Location::new(0, 0));
        assert_eq!(normalize_similarity(best.raw_distance, template.sq_alpha()), 0.0);
    }

    #[test]
    fn test_frame_smaller_than_template() {
        let frame = RgbImage::new(4, 4);
        let template = Template::from_rgb(RgbImage::new(5, 2));

        let err = SqDiffMatcher::new().find_best(&frame, &template).unwrap_err();
        assert!(matches!(err, ObserverError::FrameTooSmall { .. }));
    }
}
