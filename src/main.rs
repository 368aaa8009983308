//! # Rover Bridge
//!
//! Drive a two-motor differential-drive rover from on-screen touch controls.
//!
//! This binary is thin glue around the library: it wires a neutral input
//! feed, the configured mixer strategy, and a tracing-backed link into one
//! control-loop session and runs it until Ctrl+C. The real application
//! replaces the input feed with its touch widgets and the link with its
//! wireless session.

use anyhow::Result;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber;

use rover_bridge::config::Config;
use rover_bridge::input::{input_channel, ControlFrame};
use rover_bridge::link::{TraceLink, VehicleLink};
use rover_bridge::mixer::build_mixer;
use rover_bridge::protocol::ColorCommand;
use rover_bridge::scheduler::{DriveLoop, DriveSession, IntervalTicker};

/// Default configuration file path
const CONFIG_PATH: &str = "config/default.toml";

/// Startup body color shown while the session is live
const SESSION_COLOR: ColorCommand = ColorCommand { r: 0, g: 160, b: 255 };

/// Main entry point for Rover Bridge
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load configuration (falling back to defaults if the file is absent)
///    - Open the vehicle link and set the session color
///
/// 2. **Main Loop**
///    - Spawn one drive session sending motor packets at 20 Hz
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Graceful Shutdown**
///    - Stop the session at its next wait point
///    - Log total packet count
///    - Clean exit
///
/// # Errors
///
/// Returns error if an invalid configuration file is present or the link
/// rejects the startup color write.
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Rover Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = match Config::load(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            warn!("Could not load {}: {} (using defaults)", CONFIG_PATH, e);
            Config::default()
        }
    };

    // The demo link logs frames instead of radioing them; connecting a real
    // vehicle is the surrounding application's job.
    let mut link = TraceLink::new();
    link.write_color(&SESSION_COLOR).await?;

    let (feed, source) = input_channel(ControlFrame::neutral());
    let (config_tx, config_rx) = watch::channel(config.mixer_config());

    let mixer = build_mixer(&config.mixer);
    let ticker = IntervalTicker::with_period(config.tick_period());
    let drive_loop = DriveLoop::new(mixer, source, link, ticker, config_rx)
        .log_every(config.control.log_every_packets);
    let session = DriveSession::spawn(drive_loop);

    info!(
        "Drive session running at {}Hz (neutral input)",
        config.control.tick_rate_hz
    );
    info!("Press Ctrl+C to exit");

    tokio::signal::ctrl_c().await?;
    info!("Received Ctrl+C, shutting down...");

    let stats = session.stop().await;
    info!(
        "Session stopped: {} packets sent, {} transient failures",
        stats.packets_sent, stats.send_failures
    );

    // Keep the UI-side handles alive for the session's whole lifetime.
    drop(feed);
    drop(config_tx);

    Ok(())
}
