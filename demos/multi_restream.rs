//! Multi-destination restream demo
//!
//! Feeds synthetic frames to every destination configured via environment
//! variables. Keys are read from TWITCH_KEY / YOUTUBE_KEY; without either,
//! the demo falls back to a local custom RTMP ingest so it can run against
//! e.g. `ffmpeg -listen 1 -f flv rtmp://127.0.0.1:1935/live/demo`.
//!
//! Run with: cargo run --example multi_restream

use std::time::Duration;

use bytes::Bytes;

use restream::{Platform, RawFrame, RelayConfig, RelayManager, Resolution, StreamConfig};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;
const FPS: u32 = 30;

/// Solid color frame cycling through hues, packed BGR
fn synthetic_frame(tick: u32) -> RawFrame {
    let b = ((tick * 3) % 256) as u8;
    let g = ((tick * 5) % 256) as u8;
    let r = ((tick * 7) % 256) as u8;

    let mut data = Vec::with_capacity((WIDTH * HEIGHT * 3) as usize);
    for _ in 0..WIDTH * HEIGHT {
        data.extend_from_slice(&[b, g, r]);
    }

    RawFrame {
        width: WIDTH,
        height: HEIGHT,
        data: Bytes::from(data),
    }
}

#[tokio::main]
async fn main() -> restream::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "restream=info".into()),
        )
        .init();

    let manager = RelayManager::new(RelayConfig::default());

    let resolution = Resolution::new(WIDTH, HEIGHT);
    let mut configured = false;

    if let Ok(key) = std::env::var("TWITCH_KEY") {
        manager
            .set_config(
                StreamConfig::new(Platform::Twitch)
                    .stream_key(key)
                    .enabled(true)
                    .resolution(resolution)
                    .fps(FPS)
                    .bitrate_kbps(2500),
            )
            .await?;
        configured = true;
    }

    if let Ok(key) = std::env::var("YOUTUBE_KEY") {
        manager
            .set_config(
                StreamConfig::new(Platform::YouTube)
                    .stream_key(key)
                    .enabled(true)
                    .resolution(resolution)
                    .fps(FPS)
                    .bitrate_kbps(4000),
            )
            .await?;
        configured = true;
    }

    if !configured {
        tracing::info!("No platform keys set, publishing to local custom ingest");
        manager
            .set_config(
                StreamConfig::new(Platform::Custom)
                    .stream_key("demo")
                    .server_url("rtmp://127.0.0.1:1935/live")
                    .enabled(true)
                    .resolution(resolution)
                    .fps(FPS)
                    .bitrate_kbps(2500),
            )
            .await?;
    }

    let started = manager.start().await?;
    tracing::info!(outlets = started, "Streaming");

    let mut ticker = tokio::time::interval(Duration::from_millis(1000 / FPS as u64));
    let mut tick = 0u32;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                manager.send_frame(synthetic_frame(tick));
                tick = tick.wrapping_add(1);

                if tick % (FPS * 10) == 0 {
                    let stats = manager.stats().await;
                    for outlet in &stats.outlets {
                        tracing::info!(
                            platform = %outlet.platform,
                            fps = format!("{:.1}", outlet.fps()),
                            frames = outlet.frames_sent,
                            reconnects = outlet.reconnect_attempts,
                            "Outlet stats"
                        );
                    }
                    tracing::info!(dropped = stats.frames_dropped, "Queue stats");
                }
            }
        }
    }

    tracing::info!("Shutting down");
    manager.stop().await;
    Ok(())
}
