use vision_agent_common::config::SamplerConfig;

/// Whether the user is currently speaking, as reported by the platform's
/// voice-activity events. Sessions start in `NotSpeaking`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpeakingState {
    Speaking,
    #[default]
    NotSpeaking,
}

/// Forward iff at least `interval_ms` has elapsed since the last forwarded
/// frame. The first frame of a stream has no prior forward and always passes.
pub fn should_forward(now_ms: i64, last_forwarded_ms: Option<i64>, interval_ms: i64) -> bool {
    match last_forwarded_ms {
        None => true,
        Some(last) => now_ms - last >= interval_ms,
    }
}

/// Adaptive frame sampler: frames are forwarded at most once per interval,
/// with the interval chosen by the speaking state at the moment the frame
/// arrives. Speaking-state changes apply to the next frame, never
/// retroactively.
#[derive(Debug)]
pub struct FrameSampler {
    speaking_interval_ms: i64,
    idle_interval_ms: i64,
    state: SpeakingState,
    last_forwarded_ms: Option<i64>,
}

impl FrameSampler {
    pub fn new(config: &SamplerConfig) -> Self {
        Self {
            speaking_interval_ms: (1000.0 / config.speaking_fps).round() as i64,
            idle_interval_ms: (1000.0 / config.idle_fps).round() as i64,
            state: SpeakingState::default(),
            last_forwarded_ms: None,
        }
    }

    /// The only transition entry point for the speaking state.
    pub fn set_speaking(&mut self, speaking: bool) {
        self.state = if speaking {
            SpeakingState::Speaking
        } else {
            SpeakingState::NotSpeaking
        };
    }

    pub fn state(&self) -> SpeakingState {
        self.state
    }

    /// Evaluate one frame arrival. On `true` the arrival time is recorded as
    /// the new baseline for subsequent decisions.
    pub fn observe(&mut self, now_ms: i64) -> bool {
        let interval_ms = match self.state {
            SpeakingState::Speaking => self.speaking_interval_ms,
            SpeakingState::NotSpeaking => self.idle_interval_ms,
        };
        let forward = should_forward(now_ms, self.last_forwarded_ms, interval_ms);
        if forward {
            self.last_forwarded_ms = Some(now_ms);
        }
        forward
    }
}
