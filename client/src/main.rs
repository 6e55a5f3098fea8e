use clap::Parser;
use client::detector::HoughDetector;
use client::network::StreamClient;
use log::info;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value_t = format!("{}:{}", shared::DEFAULT_HOST, shared::DEFAULT_PORT))]
    server: String,

    /// Period between coordinate reports, in milliseconds
    #[arg(long, default_value_t = shared::SEND_INTERVAL_MS)]
    send_interval: u64,

    /// Smallest ball radius the detector searches for, in pixels
    #[arg(long, default_value_t = shared::MIN_DETECT_RADIUS)]
    min_radius: u32,

    /// Largest ball radius the detector searches for, in pixels
    #[arg(long, default_value_t = shared::MAX_DETECT_RADIUS)]
    max_radius: u32,

    /// Connection timeout in seconds
    #[arg(long, default_value = "5")]
    connect_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!(
        "Detecting circles with radii {}..={}px, reporting every {}ms",
        args.min_radius, args.max_radius, args.send_interval
    );

    let detector = Arc::new(HoughDetector::new(args.min_radius, args.max_radius));
    let client = StreamClient::new(
        &args.server,
        Duration::from_secs(args.connect_timeout),
        Duration::from_millis(args.send_interval),
        detector,
    );

    client.run().await
}
