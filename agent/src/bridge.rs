use bytes::BytesMut;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use vision_agent_common::config::BridgeConfig;
use vision_agent_common::event::{EventError, SessionEvent};

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("bridge connection failed: {0}")]
    Connect(reqwest::Error),
    #[error("bridge stream error: {0}")]
    Stream(reqwest::Error),
    #[error("bridge returned HTTP {0}")]
    Status(u16),
    #[error("bridge stream desynchronized: {0}")]
    Decode(#[from] EventError),
}

/// Subscribe to the media bridge's event stream for the configured room and
/// forward decoded events into `tx` until the platform closes the stream.
/// The receiver dropping ends consumption early; the stream is never
/// reconnected.
pub async fn run_bridge(
    config: &BridgeConfig,
    tx: mpsc::Sender<SessionEvent>,
) -> Result<(), BridgeError> {
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .build()
        .map_err(BridgeError::Connect)?;

    let url = format!(
        "{}/rooms/{}/events?quality={}",
        config.url.trim_end_matches('/'),
        config.room,
        config.quality
    );
    info!(url, room = config.room, "connecting to media bridge");

    let response = client.get(&url).send().await.map_err(BridgeError::Connect)?;
    if !response.status().is_success() {
        return Err(BridgeError::Status(response.status().as_u16()));
    }
    info!(status = %response.status(), "subscribed to bridge event stream");

    let mut byte_stream = response.bytes_stream();
    let mut buffer = BytesMut::with_capacity(256 * 1024);
    let mut total: u64 = 0;

    while let Some(chunk) = byte_stream.next().await {
        let chunk = chunk.map_err(BridgeError::Stream)?;
        buffer.extend_from_slice(&chunk);

        while let Some((event, consumed)) = SessionEvent::decode(&buffer)? {
            let _ = buffer.split_to(consumed);
            total += 1;
            if total % 100 == 0 {
                debug!(total, "events received from bridge");
            }
            if tx.send(event).await.is_err() {
                debug!("event channel closed, stopping bridge");
                return Ok(());
            }
        }
    }

    if !buffer.is_empty() {
        warn!(remaining = buffer.len(), "bridge stream ended mid-event");
    }
    info!(total, "bridge stream ended");
    Ok(())
}
