//! # Ball-Stream Server Library
//!
//! The server side of the video feedback loop. It simulates a bouncing ball,
//! renders each tick into a JPEG frame, streams the frames to a connected
//! client as length-prefixed messages, and reads back the client's detected
//! ball coordinates to measure tracking error.
//!
//! ## Module Organization
//!
//! ### Simulator Module (`simulator`)
//! Owns the ball state and the frame pipeline: advance the physics one step,
//! rasterize a filled circle onto a cleared canvas, JPEG-encode the result.
//!
//! ### Network Module (`network`)
//! The TCP accept and serving loops. One connection is served at a time; each
//! tick writes one frame and blocking-reads one coordinate report. Socket or
//! framing failures end that connection's loop without touching the process.

pub mod network;
pub mod simulator;
