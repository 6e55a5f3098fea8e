//! # Ball-Stream Client Library
//!
//! The client side of the video feedback loop. It connects to the streaming
//! server, decodes length-prefixed JPEG frames, locates the ball with a
//! circle detector running off the I/O path, and reports the detected
//! coordinates back on a fixed period.
//!
//! ## Module Organization
//!
//! ### Detector Module (`detector`)
//! The pluggable [`detector::CircleDetector`] seam and the built-in
//! gradient-voting Hough implementation. Detection misses are a valid
//! outcome, not an error.
//!
//! ### Network Module (`network`)
//! Connection setup and the three streaming tasks (read, detect, send). The
//! read and detect tasks hand frames over through a single-slot mailbox, so
//! a slow detection never stalls frame intake; unconsumed frames are simply
//! overwritten.

pub mod detector;
pub mod network;
