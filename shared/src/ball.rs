//! Bouncing-ball physics. One instance is owned exclusively by the server's
//! serving loop; nothing here is shared or synchronized.

/// A ball bouncing elastically inside a fixed arena.
#[derive(Debug, Clone, Copy)]
pub struct Ball {
    /// Center position in pixels.
    pub x: f32,
    pub y: f32,
    /// Velocity in pixels per tick.
    pub vx: f32,
    pub vy: f32,
    pub radius: f32,
    pub width: f32,
    pub height: f32,
}

impl Ball {
    /// Places the ball at a quarter of the arena with velocity
    /// `(speed, 2 * speed)`.
    pub fn new(width: u32, height: u32, radius: f32, speed: f32) -> Self {
        Self {
            x: width as f32 / 4.0,
            y: height as f32 / 4.0,
            vx: speed,
            vy: 2.0 * speed,
            radius,
            width: width as f32,
            height: height as f32,
        }
    }

    /// Advances one tick: move by the velocity, then flip the velocity on any
    /// axis whose leading edge crossed a wall. The reflection happens after
    /// the move, so a fast ball may overshoot the wall by a fraction of a
    /// step before turning around.
    pub fn step(&mut self) {
        self.x += self.vx;
        self.y += self.vy;

        if self.x - self.radius < 0.0 || self.x + self.radius > self.width {
            self.vx = -self.vx;
        }
        if self.y - self.radius < 0.0 || self.y + self.radius > self.height {
            self.vy = -self.vy;
        }
    }

    /// Euclidean distance from the ball's center to a reported position.
    pub fn error_to(&self, x: f32, y: f32) -> f32 {
        ((x - self.x).powi(2) + (y - self.y).powi(2)).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn starts_at_quarter_arena() {
        let ball = Ball::new(800, 600, 25.0, 2.5);
        assert_approx_eq!(ball.x, 200.0);
        assert_approx_eq!(ball.y, 150.0);
        assert_approx_eq!(ball.vx, 2.5);
        assert_approx_eq!(ball.vy, 5.0);
    }

    #[test]
    fn reflects_off_left_wall() {
        let mut ball = Ball::new(800, 600, 25.0, 2.5);
        ball.x = ball.radius;
        ball.vx = -2.5;
        ball.step();
        assert!(ball.vx > 0.0);
    }

    #[test]
    fn reflects_off_right_wall() {
        let mut ball = Ball::new(800, 600, 25.0, 2.5);
        ball.x = ball.width - ball.radius;
        ball.vx = 2.5;
        ball.step();
        assert!(ball.vx < 0.0);
    }

    #[test]
    fn reflects_off_top_and_bottom() {
        let mut ball = Ball::new(800, 600, 25.0, 2.5);
        ball.y = ball.radius;
        ball.vy = -5.0;
        ball.step();
        assert!(ball.vy > 0.0);

        ball.y = ball.height - ball.radius;
        ball.vy = 5.0;
        ball.step();
        assert!(ball.vy < 0.0);
    }

    #[test]
    fn free_flight_is_straight() {
        let mut ball = Ball::new(800, 600, 25.0, 2.5);
        let (x0, y0) = (ball.x, ball.y);
        for _ in 0..10 {
            ball.step();
        }
        assert_approx_eq!(ball.x, x0 + 10.0 * 2.5);
        assert_approx_eq!(ball.y, y0 + 10.0 * 5.0);
    }

    #[test]
    fn trajectory_is_deterministic() {
        let mut a = Ball::new(800, 600, 25.0, 2.5);
        let mut b = Ball::new(800, 600, 25.0, 2.5);
        for _ in 0..10_000 {
            a.step();
            b.step();
        }
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.y.to_bits(), b.y.to_bits());
    }

    #[test]
    fn stays_near_arena_for_long_runs() {
        let mut ball = Ball::new(800, 600, 25.0, 2.5);
        for _ in 0..100_000 {
            ball.step();
            // Reflection happens after the move, so allow one step of
            // overshoot beyond the strict bound.
            assert!(ball.x >= ball.radius - ball.vx.abs());
            assert!(ball.x <= ball.width - ball.radius + ball.vx.abs());
            assert!(ball.y >= ball.radius - ball.vy.abs());
            assert!(ball.y <= ball.height - ball.radius + ball.vy.abs());
        }
    }

    #[test]
    fn error_to_is_euclidean() {
        let ball = Ball::new(800, 600, 25.0, 2.5);
        assert_approx_eq!(ball.error_to(ball.x + 3.0, ball.y + 4.0), 5.0);
        assert_approx_eq!(ball.error_to(ball.x, ball.y), 0.0);
    }
}
