use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
    pub model: ModelConfig,
    #[serde(default)]
    pub transcript: TranscriptConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The media bridge that delivers the room's event stream.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    pub url: String,
    pub room: String,
    #[serde(default = "default_quality")]
    pub quality: u32,
}

/// Frame-sampling rates, in frames per second, for the two speaking states.
#[derive(Debug, Clone, Deserialize)]
pub struct SamplerConfig {
    #[serde(default = "default_speaking_fps")]
    pub speaking_fps: f64,
    #[serde(default = "default_idle_fps")]
    pub idle_fps: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            speaking_fps: default_speaking_fps(),
            idle_fps: default_idle_fps(),
        }
    }
}

/// The hosted realtime model session endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelConfig {
    pub endpoint: String,
    #[serde(default = "default_voice")]
    pub voice: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptConfig {
    #[serde(default = "default_transcript_dir")]
    pub dir: String,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            dir: default_transcript_dir(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFile(path.display().to_string(), e))?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    ReadFile(String, std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(String),
}

// Default value functions
fn default_quality() -> u32 {
    80
}
fn default_speaking_fps() -> f64 {
    1.0
}
fn default_idle_fps() -> f64 {
    0.5
}
fn default_voice() -> String {
    "Puck".into()
}
fn default_temperature() -> f64 {
    0.8
}
fn default_transcript_dir() -> String {
    "/tmp".into()
}
fn default_log_level() -> String {
    "info".into()
}
