mod bridge;
mod control;
mod prompt;
mod sampler;
mod session;
mod transcript;

use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{error, info};
use vision_agent_common::config::Config;

#[tokio::main]
async fn main() {
    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.toml"));

    let config = match Config::load(&config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config from {}: {e}", config_path.display());
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.parse().unwrap_or_default()),
        )
        .init();

    info!(
        bridge = config.bridge.url,
        room = config.bridge.room,
        model = config.model.endpoint,
        speaking_fps = config.sampler.speaking_fps,
        idle_fps = config.sampler.idle_fps,
        "starting vision-agent"
    );

    let context = prompt::PromptContext::from_env();
    if !context.is_empty() {
        info!("candidate/job context present in environment, injecting into instructions");
    }
    let instructions = prompt::build_instructions(prompt::BASE_INSTRUCTIONS, &context);

    let mut session =
        match session::RealtimeSession::open(&config.model, &config.bridge.room, &instructions)
            .await
        {
            Ok(s) => s,
            Err(e) => {
                error!(error = %e, "failed to open model session");
                std::process::exit(1);
            }
        };

    let sampler = sampler::FrameSampler::new(&config.sampler);
    let mut transcript = transcript::Transcript::new(&config.bridge.room);

    let (tx, rx) = mpsc::channel(64);
    let bridge_config = config.bridge.clone();
    let bridge_task = tokio::spawn(async move {
        if let Err(e) = bridge::run_bridge(&bridge_config, tx).await {
            error!(error = %e, "bridge stream failed");
        }
    });

    tokio::select! {
        _ = control::run(rx, sampler, &mut session, &mut transcript) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
        }
    }
    bridge_task.abort();

    if transcript.is_empty() {
        info!("session ended with no transcript entries");
    }
    match transcript.write(Path::new(&config.transcript.dir)) {
        Ok(path) => info!(
            path = %path.display(),
            entries = transcript.len(),
            "transcript written"
        ),
        Err(e) => error!(error = %e, "failed to write transcript"),
    }
}
