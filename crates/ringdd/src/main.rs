//! ringdd - the ringd alarm service
//!
//! This is the main entry point for the alarm service. It wires together:
//! - Configuration loading
//! - The desktop playback and notification hosts
//! - The alarm session manager
//! - An interactive trigger bridge on stdin
//! - Signal-driven teardown that releases resources like an explicit stop

mod bridge;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use ringd_api::{BridgeCommand, BridgeReply, ErrorCode, StartParams};
use ringd_core::{AlarmManager, StartOutcome, StopOutcome};
use ringd_host_desktop::{DesktopNotifier, DesktopPlayback};
use ringd_util::{RingError, default_config_path};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::Mutex;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::bridge::{BridgeInput, parse_line, render_reply};
use crate::config::{Config, load_config};

/// ringdd - persistent alarm notification plus looping audio until stopped
#[derive(Parser, Debug)]
#[command(name = "ringdd")]
#[command(about = "Alarm service: sticky notification and looping audio until stopped", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/ringd/config.toml)
    #[arg(short, long, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Alarm volume override, 0.0..=1.0 (or set RINGD_VOLUME env var)
    #[arg(short, long, env = "RINGD_VOLUME")]
    volume: Option<f32>,

    /// Log level
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .init();

    let mut config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {:?}", args.config))?;
    if let Some(volume) = args.volume {
        config.alarm_volume = volume.clamp(0.0, 1.0);
    }

    info!(
        config_path = %args.config.display(),
        alarm_volume = config.alarm_volume,
        "Configuration loaded"
    );

    let playback = Arc::new(DesktopPlayback::new(config.alarm_volume));
    let notifier = Arc::new(DesktopNotifier::new());
    let manager = Arc::new(Mutex::new(AlarmManager::new(
        playback,
        notifier,
        config.channel.clone(),
    )));

    run(manager, config).await
}

async fn run(manager: Arc<Mutex<AlarmManager>>, config: Config) -> Result<()> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to create SIGTERM handler")?;
    let mut sigint = signal(SignalKind::interrupt()).context("Failed to create SIGINT handler")?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    info!("Service running, triggers: start [@source] [note] | stop | status | quit");

    loop {
        tokio::select! {
            // Signals: graceful shutdown, releasing resources on the way out
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down gracefully");
                break;
            }
            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down gracefully");
                break;
            }

            // Trigger bridge input
            line = lines.next_line() => {
                match line {
                    Ok(Some(line)) => match parse_line(&line) {
                        BridgeInput::Command(cmd) => {
                            let reply = {
                                let mut manager = manager.lock().await;
                                dispatch(&mut manager, cmd, &config)
                            };
                            println!("{}", render_reply(&reply));
                        }
                        BridgeInput::Quit => break,
                        BridgeInput::Empty => {}
                        BridgeInput::Unknown(word) => {
                            println!("unknown trigger {word:?}, expected start/stop/status/quit");
                        }
                    },
                    Ok(None) => {
                        info!("Trigger input closed, shutting down");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read trigger input");
                        break;
                    }
                }
            }
        }
    }

    // Forced teardown goes through the same path as an explicit stop
    {
        let mut manager = manager.lock().await;
        if let StopOutcome::Stopped { session_id } = manager.stop() {
            info!(session_id = %session_id, "Stopped active alarm before exit");
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Map a bridge command onto the session manager
fn dispatch(manager: &mut AlarmManager, cmd: BridgeCommand, config: &Config) -> BridgeReply {
    match cmd {
        BridgeCommand::Start(params) => {
            let params = with_default_sound(params, config);
            match manager.start(params) {
                Ok(StartOutcome::Started { session_id }) => BridgeReply::Started { session_id },
                Ok(StartOutcome::Refreshed { session_id }) => BridgeReply::Refreshed { session_id },
                Err(e @ RingError::ConflictingTransition) => BridgeReply::Error {
                    code: ErrorCode::ConflictingTransition,
                    message: e.to_string(),
                },
                Err(e) => BridgeReply::Error {
                    code: ErrorCode::StartFailed,
                    message: e.to_string(),
                },
            }
        }

        BridgeCommand::Stop => match manager.stop() {
            StopOutcome::Stopped { session_id } => BridgeReply::Stopped { session_id },
            StopOutcome::NotRunning => BridgeReply::NotRunning,
        },

        BridgeCommand::Status => BridgeReply::Status(manager.snapshot()),
    }
}

/// A start without an explicit source uses the configured default sound
/// file when one is set; the built-in tone otherwise.
fn with_default_sound(mut params: StartParams, config: &Config) -> StartParams {
    if params.audio_source.is_none()
        && let Some(sound) = &config.default_sound
    {
        params.audio_source = Some(sound.to_string_lossy().into_owned());
    }
    params
}
