//! Streaming TCP server: one connection at a time, one frame per tick, one
//! coordinate report read back after every frame.

use crate::simulator::BallSimulator;
use log::{debug, error, info};
use shared::{codec, ProtocolError};
use std::time::Duration;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{interval, MissedTickBehavior};

/// Arena and timing parameters for one serving loop.
#[derive(Debug, Clone, Copy)]
pub struct StreamConfig {
    pub width: u32,
    pub height: u32,
    pub ball_radius: f32,
    pub ball_speed: f32,
    pub tick_hz: u32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            width: shared::FRAME_WIDTH,
            height: shared::FRAME_HEIGHT,
            ball_radius: shared::BALL_RADIUS,
            ball_speed: shared::BALL_SPEED,
            tick_hz: shared::SERVER_TICK_HZ,
        }
    }
}

/// Why a serving loop ended.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("frame encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

impl ServeError {
    fn is_clean_close(&self) -> bool {
        matches!(self, ServeError::Protocol(err) if err.is_clean_close())
    }
}

/// Accepts connections and streams rendered frames to each in turn. The ball
/// state lives inside the serving loop; a fresh simulation starts with every
/// connection.
pub struct StreamServer {
    listener: TcpListener,
    config: StreamConfig,
}

impl StreamServer {
    pub async fn bind(addr: &str, config: StreamConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        info!("server listening on {}", listener.local_addr()?);
        Ok(Self { listener, config })
    }

    /// The bound address, useful when binding to port 0.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept loop. Serves one connection until it closes or fails, then
    /// accepts the next; a connection failure never takes down the process.
    pub async fn run(&self) -> std::io::Result<()> {
        loop {
            let (stream, peer) = self.listener.accept().await?;
            info!("client connected from {}", peer);
            stream.set_nodelay(true)?;

            match self.serve(stream).await {
                Ok(()) => info!("client {} finished", peer),
                Err(err) if err.is_clean_close() => info!("client {} disconnected", peer),
                Err(err) => error!("connection to {} failed: {}", peer, err),
            }
        }
    }

    async fn serve(&self, mut stream: TcpStream) -> Result<(), ServeError> {
        serve_stream(&mut stream, self.config).await
    }
}

/// One streaming session over any bidirectional byte stream. Each tick:
/// advance the simulation, write the frame, then block on the 9-byte
/// coordinate report and log the tracking error.
pub async fn serve_stream<S>(stream: &mut S, config: StreamConfig) -> Result<(), ServeError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut simulator = BallSimulator::new(
        config.width,
        config.height,
        config.ball_radius,
        config.ball_speed,
    );

    let mut ticker = interval(Duration::from_secs_f64(1.0 / config.tick_hz.max(1) as f64));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut tick: u64 = 0;
    loop {
        ticker.tick().await;

        let frame = simulator.tick()?;
        codec::write_frame(stream, &frame).await?;

        let reported = codec::read_coordinate(stream).await?;
        let ball = simulator.ball();
        let error = ball.error_to(reported.x as f32, reported.y as f32);

        tick += 1;
        debug!(
            "tick {}: reported ({}, {}), actual ({:.1}, {:.1}), error {:.2}px",
            tick, reported.x, reported.y, ball.x, ball.y, error
        );
        if tick % u64::from(config.tick_hz.max(1)) == 0 {
            info!("tick {}: tracking error {:.2}px", tick, error);
        }
    }
}
