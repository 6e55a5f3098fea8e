//! Shared pieces of the ball-stream feedback loop: the wire codecs spoken by
//! both processes, the protocol error type, the bouncing-ball physics the
//! server simulates, and the text signaling codec used by the WebRTC-style
//! transport negotiation.
//!
//! The wire protocol is a single TCP connection carrying length-prefixed
//! frames in one direction and fixed-width ASCII coordinates in the other:
//!
//! - Server -> Client: `u32` big-endian length + that many bytes of image data
//! - Client -> Server: 9 ASCII bytes, `"XXXX,YYYY"` (zero-padded decimal)

pub mod ball;
pub mod codec;
pub mod error;
pub mod signal;

pub use ball::Ball;
pub use codec::{Coordinate, COORD_WIRE_LEN, MAX_FRAME_LEN};
pub use error::ProtocolError;

/// Address both binaries default to.
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 9001;

/// Default arena and ball geometry.
pub const FRAME_WIDTH: u32 = 800;
pub const FRAME_HEIGHT: u32 = 600;
pub const BALL_RADIUS: f32 = 25.0;
pub const BALL_SPEED: f32 = 2.5;

/// Server simulation/transmission rate.
pub const SERVER_TICK_HZ: u32 = 60;
/// Period between coordinate reports from the client.
pub const SEND_INTERVAL_MS: u64 = 30;

/// Radius bounds the client's circle detector searches within.
pub const MIN_DETECT_RADIUS: u32 = 5;
pub const MAX_DETECT_RADIUS: u32 = 30;
