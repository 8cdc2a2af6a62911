use leapmotion_sources::{ClientConfig, DeviceEvent, Frame, StreamClient};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // Read service URL from environment or default
    let config = match std::env::var("LEAPMOTION_URL") {
        Ok(url) => ClientConfig::new(url),
        Err(_) => ClientConfig::default(),
    };

    info!("Connecting to {}", config.url);

    let client = StreamClient::builder(config)
        .on_frame(log_frame)
        .on_device_event(|event: DeviceEvent| {
            info!(
                "Device {} ({}) attached: {} streaming: {}",
                event.id, event.kind, event.attached, event.streaming
            );
        })
        .connect()
        .await?;

    let done = client.done();
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Interrupted, closing"),
        _ = done.wait() => warn!("Connection to tracking service lost"),
    }

    if let Err(e) = client.close().await {
        warn!("Close failed: {}", e);
    }
    done.wait().await;

    let stats = client.stats();
    info!(
        "Received {} frames, {} device events, skipped {} messages",
        stats.frames_received, stats.device_events, stats.messages_skipped
    );

    Ok(())
}

fn log_frame(frame: Frame) {
    let palms: Vec<String> = frame
        .hands
        .iter()
        .filter_map(|hand| {
            let palm = frame.interaction_box.normalize_point(&hand.palm_position, true).ok()?;
            Some(format!("{} [{:.3}, {:.3}, {:.3}]", hand.kind, palm[0], palm[1], palm[2]))
        })
        .collect();

    info!(
        "frame {} @ {:.1} fps, {} hand(s) {}",
        frame.id,
        frame.current_frame_rate,
        frame.hands.len(),
        palms.join(" ")
    );
}
