use clap::Parser;
use log::info;
use server::network::{StreamConfig, StreamServer};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server IP address to bind to
    #[arg(short = 'H', long, default_value = shared::DEFAULT_HOST)]
    host: String,

    /// Server port to listen on
    #[arg(short, long, default_value_t = shared::DEFAULT_PORT)]
    port: u16,

    /// Tick rate (frames per second)
    #[arg(short, long, default_value_t = shared::SERVER_TICK_HZ)]
    tick_rate: u32,

    /// Frame width in pixels
    #[arg(long, default_value_t = shared::FRAME_WIDTH)]
    width: u32,

    /// Frame height in pixels
    #[arg(long, default_value_t = shared::FRAME_HEIGHT)]
    height: u32,

    /// Ball radius in pixels
    #[arg(long, default_value_t = shared::BALL_RADIUS)]
    ball_radius: f32,

    /// Ball speed in pixels per tick
    #[arg(long, default_value_t = shared::BALL_SPEED)]
    ball_speed: f32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting server...");
    info!(
        "Arena {}x{}, ball radius {}, {} ticks/s",
        args.width, args.height, args.ball_radius, args.tick_rate
    );

    let config = StreamConfig {
        width: args.width,
        height: args.height,
        ball_radius: args.ball_radius,
        ball_speed: args.ball_speed,
        tick_hz: args.tick_rate,
    };

    let address = format!("{}:{}", args.host, args.port);
    let server = StreamServer::bind(&address, config).await?;

    tokio::select! {
        result = server.run() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
