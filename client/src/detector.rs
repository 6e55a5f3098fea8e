//! Circle detection over decoded frames.
//!
//! The detection seam is the [`CircleDetector`] trait; the serving loop only
//! needs "image in, optional center out", so an OpenCV binding or any other
//! external primitive can be dropped in. The provided [`HoughDetector`] is a
//! gradient-voting circular Hough transform: Sobel gradients pick out edge
//! pixels, each edge pixel votes for candidate centers along its gradient
//! direction at every radius in the configured range, and the strongest
//! accumulator cell wins.

use image::GrayImage;
use thiserror::Error;

/// A frame arrived but could not be analyzed. Recovered locally: the caller
/// falls back to "no detection", it never tears down the session.
#[derive(Debug, Error)]
pub enum DetectionError {
    #[error("frame payload is not a decodable image: {0}")]
    DetectionUnavailable(#[source] image::ImageError),
}

/// Locates the most circle-like object in a grayscale frame.
///
/// Returning `None` is not a failure; it is the "no object visible" outcome
/// and callers substitute a default coordinate.
pub trait CircleDetector: Send + Sync {
    fn detect(&self, image: &GrayImage) -> Option<(u32, u32)>;
}

/// Gradient-voting Hough transform over a bounded radius range.
pub struct HoughDetector {
    pub min_radius: u32,
    pub max_radius: u32,
    /// Minimum raw Sobel magnitude for a pixel to count as an edge. A sharp
    /// step of height `d` produces magnitudes up to `4 * d`, so 200 admits
    /// edges with roughly 50 gray levels of contrast and rejects JPEG noise.
    pub edge_threshold: u32,
}

impl HoughDetector {
    pub fn new(min_radius: u32, max_radius: u32) -> Self {
        Self {
            min_radius: min_radius.max(1),
            max_radius: max_radius.max(min_radius.max(1)),
            edge_threshold: 200,
        }
    }
}

impl Default for HoughDetector {
    fn default() -> Self {
        Self::new(shared::MIN_DETECT_RADIUS, shared::MAX_DETECT_RADIUS)
    }
}

impl CircleDetector for HoughDetector {
    fn detect(&self, image: &GrayImage) -> Option<(u32, u32)> {
        let (width, height) = image.dimensions();
        if width < 3 || height < 3 {
            return None;
        }

        let w = width as usize;
        let h = height as usize;
        let raw = image.as_raw();

        let mut votes = vec![0u32; w * h];
        let threshold_sq = (self.edge_threshold * self.edge_threshold) as i32;
        let mut edge_pixels = 0u32;

        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let sample =
                    |dx: isize, dy: isize| raw[(y as isize + dy) as usize * w + (x as isize + dx) as usize] as i32;

                let gx = (sample(1, -1) + 2 * sample(1, 0) + sample(1, 1))
                    - (sample(-1, -1) + 2 * sample(-1, 0) + sample(-1, 1));
                let gy = (sample(-1, 1) + 2 * sample(0, 1) + sample(1, 1))
                    - (sample(-1, -1) + 2 * sample(0, -1) + sample(1, -1));

                let mag_sq = gx * gx + gy * gy;
                if mag_sq < threshold_sq {
                    continue;
                }
                edge_pixels += 1;

                let mag = (mag_sq as f32).sqrt();
                let ux = gx as f32 / mag;
                let uy = gy as f32 / mag;

                // The gradient points from dark to light, so the center lies
                // along the negative direction for a bright ball and the
                // positive one for a dark ball. Vote both ways.
                for r in self.min_radius..=self.max_radius {
                    let rf = r as f32;
                    for sign in [-1.0f32, 1.0] {
                        let cx = (x as f32 + sign * ux * rf).round();
                        let cy = (y as f32 + sign * uy * rf).round();
                        if cx >= 0.0 && cy >= 0.0 && (cx as usize) < w && (cy as usize) < h {
                            votes[cy as usize * w + cx as usize] += 1;
                        }
                    }
                }
            }
        }

        if edge_pixels == 0 {
            return None;
        }

        // Rounding spreads a peak over neighboring cells; score each cell by
        // its 3x3 vote sum before picking the winner.
        let mut best = (0usize, 0usize, 0u32);
        for y in 1..h - 1 {
            for x in 1..w - 1 {
                let mut sum = 0u32;
                for dy in 0..3 {
                    for dx in 0..3 {
                        sum += votes[(y + dy - 1) * w + (x + dx - 1)];
                    }
                }
                if sum > best.2 {
                    best = (x, y, sum);
                }
            }
        }

        // A real circle of the smallest admissible radius contributes on the
        // order of its circumference in votes; anything weaker is noise.
        let min_votes = (2.0 * std::f32::consts::PI * self.min_radius as f32) as u32;
        if best.2 < min_votes {
            return None;
        }
        Some((best.0 as u32, best.1 as u32))
    }
}

/// Decodes a received frame payload and runs the detector on it.
pub fn detect_in_payload(
    detector: &dyn CircleDetector,
    payload: &[u8],
) -> Result<Option<(u32, u32)>, DetectionError> {
    let gray = image::load_from_memory(payload)
        .map_err(DetectionError::DetectionUnavailable)?
        .to_luma8();
    Ok(detector.detect(&gray))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn synthetic_circle(width: u32, height: u32, cx: i32, cy: i32, radius: i32) -> GrayImage {
        let mut img = GrayImage::from_pixel(width, height, Luma([255]));
        for y in 0..height as i32 {
            for x in 0..width as i32 {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= radius * radius {
                    img.put_pixel(x as u32, y as u32, Luma([0]));
                }
            }
        }
        img
    }

    fn assert_near(found: (u32, u32), expected: (i32, i32), tolerance: i32) {
        let (fx, fy) = (found.0 as i32, found.1 as i32);
        assert!(
            (fx - expected.0).abs() <= tolerance && (fy - expected.1).abs() <= tolerance,
            "detected ({}, {}), expected within {}px of {:?}",
            fx,
            fy,
            tolerance,
            expected
        );
    }

    #[test]
    fn finds_synthetic_circle_center() {
        let detector = HoughDetector::new(5, 30);
        let img = synthetic_circle(100, 100, 50, 50, 20);
        let found = detector.detect(&img).expect("circle should be detected");
        assert_near(found, (50, 50), 3);
    }

    #[test]
    fn finds_off_center_circle() {
        let detector = HoughDetector::new(5, 30);
        let img = synthetic_circle(200, 150, 140, 40, 12);
        let found = detector.detect(&img).expect("circle should be detected");
        assert_near(found, (140, 40), 3);
    }

    #[test]
    fn finds_bright_circle_on_dark_background() {
        let detector = HoughDetector::new(5, 30);
        let mut img = GrayImage::from_pixel(100, 100, Luma([0]));
        for y in 0..100i32 {
            for x in 0..100i32 {
                let (dx, dy) = (x - 60, y - 55);
                if dx * dx + dy * dy <= 15 * 15 {
                    img.put_pixel(x as u32, y as u32, Luma([255]));
                }
            }
        }
        let found = detector.detect(&img).expect("circle should be detected");
        assert_near(found, (60, 55), 3);
    }

    #[test]
    fn blank_image_detects_nothing() {
        let detector = HoughDetector::new(5, 30);
        let img = GrayImage::from_pixel(100, 100, Luma([255]));
        assert_eq!(detector.detect(&img), None);
    }

    #[test]
    fn tiny_image_detects_nothing() {
        let detector = HoughDetector::new(5, 30);
        let img = GrayImage::from_pixel(2, 2, Luma([128]));
        assert_eq!(detector.detect(&img), None);
    }

    #[test]
    fn circle_outside_radius_range_is_ignored() {
        // The ball-sized voting range cannot lock onto a huge disc's edge.
        let detector = HoughDetector::new(5, 10);
        let img = synthetic_circle(200, 200, 100, 100, 80);
        if let Some(found) = detector.detect(&img) {
            let (dx, dy) = (found.0 as i32 - 100, found.1 as i32 - 100);
            assert!(dx * dx + dy * dy > 9, "should not report the true center");
        }
    }

    #[test]
    fn undecodable_payload_is_detection_unavailable() {
        let detector = HoughDetector::default();
        match detect_in_payload(&detector, b"not an image") {
            Err(DetectionError::DetectionUnavailable(_)) => {}
            other => panic!("expected DetectionUnavailable, got {:?}", other),
        }
    }
}
