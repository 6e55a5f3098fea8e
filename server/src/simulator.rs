//! Renders the bouncing ball into JPEG frames, one per tick.

use image::{codecs::jpeg::JpegEncoder, ExtendedColorType, Rgb, RgbImage};
use shared::Ball;

pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
pub const BALL_COLOR: Rgb<u8> = Rgb([255, 0, 0]);

const JPEG_QUALITY: u8 = 90;

/// Owns the ball state and a reusable canvas. One instance lives inside each
/// serving loop; nothing here is shared between tasks.
pub struct BallSimulator {
    ball: Ball,
    canvas: RgbImage,
}

impl BallSimulator {
    pub fn new(width: u32, height: u32, radius: f32, speed: f32) -> Self {
        Self {
            ball: Ball::new(width, height, radius, speed),
            canvas: RgbImage::new(width, height),
        }
    }

    /// The current ball state, for error measurement against reports.
    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    /// Advances the simulation one tick and returns the rendered frame as
    /// JPEG bytes. Deterministic for a fixed tick count.
    pub fn tick(&mut self) -> Result<Vec<u8>, image::ImageError> {
        self.ball.step();
        self.render();
        self.encode()
    }

    fn render(&mut self) {
        for pixel in self.canvas.pixels_mut() {
            *pixel = BACKGROUND;
        }
        draw_filled_circle(
            &mut self.canvas,
            self.ball.x,
            self.ball.y,
            self.ball.radius,
            BALL_COLOR,
        );
    }

    fn encode(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut out = Vec::new();
        JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).encode(
            self.canvas.as_raw(),
            self.canvas.width(),
            self.canvas.height(),
            ExtendedColorType::Rgb8,
        )?;
        Ok(out)
    }
}

/// Rasterizes a filled circle onto the canvas, clipped to its bounds.
pub fn draw_filled_circle(canvas: &mut RgbImage, cx: f32, cy: f32, radius: f32, color: Rgb<u8>) {
    let (width, height) = canvas.dimensions();
    let min_x = (cx - radius).floor().max(0.0) as u32;
    let min_y = (cy - radius).floor().max(0.0) as u32;
    let max_x = (((cx + radius).ceil() as i64).min(width as i64 - 1)).max(0) as u32;
    let max_y = (((cy + radius).ceil() as i64).min(height as i64 - 1)).max(0) as u32;

    let r_sq = radius * radius;
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dx = x as f32 - cx;
            let dy = y as f32 - cy;
            if dx * dx + dy * dy <= r_sq {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn tick_produces_jpeg_bytes() {
        let mut sim = BallSimulator::new(800, 600, 25.0, 2.5);
        let frame = sim.tick().unwrap();
        // JPEG start-of-image marker.
        assert_eq!(&frame[..2], &[0xFF, 0xD8]);
        assert!(frame.len() > 100);
    }

    #[test]
    fn tick_advances_the_ball() {
        let mut sim = BallSimulator::new(800, 600, 25.0, 2.5);
        let before = *sim.ball();
        sim.tick().unwrap();
        assert_approx_eq!(sim.ball().x, before.x + before.vx);
        assert_approx_eq!(sim.ball().y, before.y + before.vy);
    }

    #[test]
    fn frames_are_deterministic() {
        let mut a = BallSimulator::new(800, 600, 25.0, 2.5);
        let mut b = BallSimulator::new(800, 600, 25.0, 2.5);
        for _ in 0..5 {
            assert_eq!(a.tick().unwrap(), b.tick().unwrap());
        }
    }

    #[test]
    fn frame_decodes_to_arena_dimensions() {
        let mut sim = BallSimulator::new(320, 240, 20.0, 2.5);
        let frame = sim.tick().unwrap();
        let decoded = image::load_from_memory(&frame).unwrap();
        assert_eq!(decoded.width(), 320);
        assert_eq!(decoded.height(), 240);
    }

    #[test]
    fn circle_fills_center_and_spares_corners() {
        let mut canvas = RgbImage::from_pixel(100, 100, BACKGROUND);
        draw_filled_circle(&mut canvas, 50.0, 50.0, 10.0, BALL_COLOR);
        assert_eq!(*canvas.get_pixel(50, 50), BALL_COLOR);
        assert_eq!(*canvas.get_pixel(55, 50), BALL_COLOR);
        assert_eq!(*canvas.get_pixel(0, 0), BACKGROUND);
        assert_eq!(*canvas.get_pixel(50, 65), BACKGROUND);
    }

    #[test]
    fn circle_clips_at_canvas_edges() {
        let mut canvas = RgbImage::from_pixel(100, 100, BACKGROUND);
        draw_filled_circle(&mut canvas, 0.0, 0.0, 30.0, BALL_COLOR);
        draw_filled_circle(&mut canvas, 99.0, 99.0, 30.0, BALL_COLOR);
        assert_eq!(*canvas.get_pixel(0, 0), BALL_COLOR);
        assert_eq!(*canvas.get_pixel(99, 99), BALL_COLOR);
    }
}
