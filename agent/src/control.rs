use tokio::sync::mpsc;
use tracing::{debug, error, info};
use vision_agent_common::event::SessionEvent;

use crate::sampler::FrameSampler;
use crate::session::ModelSink;
use crate::transcript::Transcript;

/// Consume session events until the channel closes.
///
/// Frames are evaluated in arrival order against the sampler; forwarded
/// frames are pushed to the sink best-effort, with per-frame failures logged
/// by sequence number and the stream continuing. Speaking toggles update the
/// sampler state for subsequent frames; transcript items accumulate in
/// `transcript`.
pub async fn run<S: ModelSink>(
    mut rx: mpsc::Receiver<SessionEvent>,
    mut sampler: FrameSampler,
    sink: &mut S,
    transcript: &mut Transcript,
) {
    let mut forwarded: u64 = 0;
    let mut dropped: u64 = 0;

    while let Some(event) = rx.recv().await {
        match event {
            SessionEvent::SpeakingStarted { .. } => {
                sampler.set_speaking(true);
                debug!(state = ?sampler.state(), "user started speaking");
            }
            SessionEvent::SpeakingStopped { .. } => {
                sampler.set_speaking(false);
                debug!(state = ?sampler.state(), "user stopped speaking");
            }
            SessionEvent::Frame(frame) => {
                if !sampler.observe(frame.captured_at_ms) {
                    dropped += 1;
                    continue;
                }
                forwarded += 1;
                if let Err(e) = sink.push_video(&frame).await {
                    error!(error = %e, seq = frame.seq, "failed to push frame to model session");
                }
            }
            SessionEvent::Transcript { role, text, at_ms } => {
                transcript.record(role, text, at_ms);
            }
        }
    }

    info!(
        forwarded,
        dropped,
        entries = transcript.len(),
        "session event stream closed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionError;
    use vision_agent_common::config::SamplerConfig;
    use vision_agent_common::event::{Role, VideoFrame};

    /// Sink that records pushed sequence numbers, optionally failing each push.
    struct RecordingSink {
        pushed: Vec<u64>,
        fail: bool,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                pushed: Vec::new(),
                fail: false,
            }
        }
    }

    impl ModelSink for RecordingSink {
        async fn push_video(&mut self, frame: &VideoFrame) -> Result<(), SessionError> {
            self.pushed.push(frame.seq);
            if self.fail {
                Err(SessionError::Status(503))
            } else {
                Ok(())
            }
        }
    }

    fn frame(seq: u64, at_ms: i64) -> SessionEvent {
        SessionEvent::Frame(VideoFrame {
            jpeg: vec![0xFF, 0xD8],
            captured_at_ms: at_ms,
            seq,
        })
    }

    async fn run_with_events(events: Vec<SessionEvent>, sink: &mut RecordingSink) -> Transcript {
        let (tx, rx) = mpsc::channel(16);
        let mut transcript = Transcript::new("test-room");
        let sampler = FrameSampler::new(&SamplerConfig::default());
        let producer = tokio::spawn(async move {
            for event in events {
                tx.send(event).await.unwrap();
            }
        });
        run(rx, sampler, sink, &mut transcript).await;
        producer.await.unwrap();
        transcript
    }

    #[tokio::test]
    async fn forwards_only_sampled_frames_while_idle() {
        let mut sink = RecordingSink::new();
        let events = vec![
            frame(0, 0),
            frame(1, 300),
            frame(2, 600),
            frame(3, 1000),
            frame(4, 1300),
        ];
        run_with_events(events, &mut sink).await;
        assert_eq!(sink.pushed, vec![0]);
    }

    #[tokio::test]
    async fn speaking_toggle_changes_interval_for_next_frames() {
        let mut sink = RecordingSink::new();
        let events = vec![
            SessionEvent::SpeakingStarted { at_ms: 0 },
            frame(0, 0),
            frame(1, 300),
            frame(2, 600),
            frame(3, 1000),
            frame(4, 1300),
            SessionEvent::SpeakingStopped { at_ms: 1400 },
            frame(5, 2100),
            frame(6, 3000),
        ];
        run_with_events(events, &mut sink).await;
        // Speaking: 0 and 1000 pass. After stopping, the 2000ms interval
        // applies from the last forward at 1000: 2100 dropped, 3000 forwarded.
        assert_eq!(sink.pushed, vec![0, 3, 6]);
    }

    #[tokio::test]
    async fn sink_failure_does_not_stop_the_stream() {
        let mut sink = RecordingSink::new();
        sink.fail = true;
        let events = vec![frame(0, 0), frame(1, 2000), frame(2, 4000)];
        run_with_events(events, &mut sink).await;
        assert_eq!(sink.pushed, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn transcript_items_are_recorded_in_order() {
        let mut sink = RecordingSink::new();
        let events = vec![
            SessionEvent::Transcript {
                role: Role::Assistant,
                text: "Ready to train?".to_string(),
                at_ms: 100,
            },
            frame(0, 200),
            SessionEvent::Transcript {
                role: Role::User,
                text: "Leg day".to_string(),
                at_ms: 900,
            },
        ];
        let transcript = run_with_events(events, &mut sink).await;
        assert_eq!(transcript.len(), 2);
        assert_eq!(sink.pushed, vec![0]);
    }
}
