//! Streaming TCP client: three tasks over one connection.
//!
//! - the **read task** owns the read half and publishes every decoded frame
//!   as the latest value of a single-slot mailbox (`tokio::sync::watch`);
//!   a newer frame silently overwrites an unconsumed one, so the reader
//!   never waits for the detector,
//! - the **detect task** waits for the mailbox to change, pulls the newest
//!   frame, and runs the CPU-bound decode + detection on the blocking pool,
//!   storing the result in the shared last-known coordinate,
//! - the **send task** owns the write half and reports the last-known
//!   coordinate on a fixed period, uncorrelated with frame arrival.

use crate::detector::{detect_in_payload, CircleDetector};
use log::{debug, error, info, warn};
use shared::{codec, Coordinate, ProtocolError};
use std::io::ErrorKind;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::task;
use tokio::time::{interval, timeout, MissedTickBehavior};

pub struct StreamClient {
    server_addr: String,
    connect_timeout: Duration,
    send_interval: Duration,
    detector: Arc<dyn CircleDetector>,
}

impl StreamClient {
    pub fn new(
        server_addr: &str,
        connect_timeout: Duration,
        send_interval: Duration,
        detector: Arc<dyn CircleDetector>,
    ) -> Self {
        Self {
            server_addr: server_addr.to_string(),
            connect_timeout,
            send_interval,
            detector,
        }
    }

    /// Connects, spawns the three streaming tasks, and runs until the server
    /// hangs up, a protocol error occurs, or Ctrl+C arrives. In-flight socket
    /// operations are abandoned on shutdown, not drained.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("Connecting to {}...", self.server_addr);
        let stream = timeout(self.connect_timeout, TcpStream::connect(&self.server_addr))
            .await
            .map_err(|_| {
                std::io::Error::new(
                    ErrorKind::TimedOut,
                    format!("connection to {} timed out", self.server_addr),
                )
            })??;
        stream.set_nodelay(true)?;
        info!("Connected");

        let (read_half, write_half) = stream.into_split();
        let (frame_tx, frame_rx) = watch::channel::<Option<Vec<u8>>>(None);
        let last_known = Arc::new(Mutex::new(Coordinate::default()));

        let mut reader = task::spawn(read_loop(read_half, frame_tx));
        let mut detect = task::spawn(detect_loop(
            frame_rx,
            Arc::clone(&self.detector),
            Arc::clone(&last_known),
        ));
        let mut sender = task::spawn(send_loop(
            write_half,
            Arc::clone(&last_known),
            self.send_interval,
        ));

        let outcome: Result<(), ProtocolError> = tokio::select! {
            result = &mut reader => flatten_task("read", result),
            result = &mut sender => flatten_task("send", result),
            result = &mut detect => {
                if let Err(err) = result {
                    error!("detect task panicked: {}", err);
                }
                Ok(())
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
                Ok(())
            }
        };

        reader.abort();
        detect.abort();
        sender.abort();

        match outcome {
            Ok(()) => Ok(()),
            Err(err) if err.is_clean_close() => {
                info!("Server closed the stream");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

fn flatten_task(
    name: &str,
    result: Result<Result<(), ProtocolError>, task::JoinError>,
) -> Result<(), ProtocolError> {
    match result {
        Ok(outcome) => outcome,
        Err(err) => {
            error!("{} task panicked: {}", name, err);
            Ok(())
        }
    }
}

/// Decodes incoming frames and makes each one the mailbox's latest value.
async fn read_loop(
    mut reader: OwnedReadHalf,
    frames: watch::Sender<Option<Vec<u8>>>,
) -> Result<(), ProtocolError> {
    loop {
        let payload = codec::read_frame(&mut reader).await?;
        debug!("received {} byte frame", payload.len());
        if frames.send(Some(payload)).is_err() {
            // Detector is gone; nothing left to feed.
            return Ok(());
        }
    }
}

/// Pulls the newest frame after every mailbox change and updates the shared
/// coordinate. Frames published while a detection runs are overwritten and
/// never seen; the send loop always reports the freshest result available.
async fn detect_loop(
    mut frames: watch::Receiver<Option<Vec<u8>>>,
    detector: Arc<dyn CircleDetector>,
    last_known: Arc<Mutex<Coordinate>>,
) {
    while frames.changed().await.is_ok() {
        // Clone out of the borrow guard before awaiting anything.
        let latest = frames.borrow_and_update().clone();
        let payload = match latest {
            Some(payload) => payload,
            None => continue,
        };

        let detector = Arc::clone(&detector);
        let outcome =
            task::spawn_blocking(move || detect_in_payload(detector.as_ref(), &payload)).await;

        let found = match outcome {
            Ok(Ok(found)) => found,
            Ok(Err(err)) => {
                warn!("{}", err);
                None
            }
            Err(err) => {
                error!("detection worker failed: {}", err);
                None
            }
        };

        // A miss reports (0, 0).
        let coord = found
            .map(|(x, y)| Coordinate::saturating(x, y))
            .unwrap_or_default();
        *last_known.lock().unwrap_or_else(PoisonError::into_inner) = coord;
        debug!("detected ball at ({}, {})", coord.x, coord.y);
    }
}

/// Reports the last-known coordinate every `period`, regardless of how many
/// frames arrived in between.
async fn send_loop(
    mut writer: OwnedWriteHalf,
    last_known: Arc<Mutex<Coordinate>>,
    period: Duration,
) -> Result<(), ProtocolError> {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let coord = *last_known.lock().unwrap_or_else(PoisonError::into_inner);
        codec::write_coordinate(&mut writer, coord).await?;
    }
}
