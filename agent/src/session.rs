use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use vision_agent_common::config::ModelConfig;
use vision_agent_common::event::VideoFrame;

/// Downstream consumer of sampled frames: the hosted model session in
/// production, a recording double in tests.
pub trait ModelSink {
    fn push_video(
        &mut self,
        frame: &VideoFrame,
    ) -> impl std::future::Future<Output = Result<(), SessionError>> + Send;
}

/// Client for one hosted realtime model session.
pub struct RealtimeSession {
    client: reqwest::Client,
    video_url: String,
}

#[derive(Debug, Deserialize)]
struct OpenResponse {
    session_id: String,
}

impl RealtimeSession {
    /// Open a model session for `room` with the given instructions. The
    /// returned session accepts video frames until the process exits.
    pub async fn open(
        config: &ModelConfig,
        room: &str,
        instructions: &str,
    ) -> Result<Self, SessionError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(SessionError::Http)?;

        let endpoint = config.endpoint.trim_end_matches('/');
        let response = client
            .post(format!("{endpoint}/v1/sessions"))
            .json(&serde_json::json!({
                "room": room,
                "voice": config.voice,
                "temperature": config.temperature,
                "instructions": instructions,
            }))
            .send()
            .await
            .map_err(SessionError::Http)?;

        if !response.status().is_success() {
            return Err(SessionError::Status(response.status().as_u16()));
        }

        let body: OpenResponse = response.json().await.map_err(SessionError::Http)?;
        info!(
            session_id = body.session_id,
            voice = config.voice,
            temperature = config.temperature,
            "model session opened"
        );

        Ok(Self {
            video_url: format!("{endpoint}/v1/sessions/{}/video", body.session_id),
            client,
        })
    }
}

impl ModelSink for RealtimeSession {
    async fn push_video(&mut self, frame: &VideoFrame) -> Result<(), SessionError> {
        let response = self
            .client
            .post(&self.video_url)
            .header("content-type", "image/jpeg")
            .header("x-frame-seq", frame.seq)
            .header("x-captured-at-ms", frame.captured_at_ms)
            .body(frame.jpeg.clone())
            .send()
            .await
            .map_err(SessionError::Http)?;

        if !response.status().is_success() {
            return Err(SessionError::Status(response.status().as_u16()));
        }

        debug!(seq = frame.seq, bytes = frame.jpeg.len(), "queued frame");
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session request failed: {0}")]
    Http(reqwest::Error),
    #[error("session endpoint returned HTTP {0}")]
    Status(u16),
}
