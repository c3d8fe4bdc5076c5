//! gesture-pointer - hand-gesture driven virtual pointer
//!
//! Entry point for the replay binary.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gesture_pointer::config::{Config, LoggingConfig};
use gesture_pointer::document::MemoryDocument;
use gesture_pointer::input::Viewport;
use gesture_pointer::session::{
    FrameLoop, Pacing, Recording, ReplayFrameSource, ReplayRecognizer, SessionError,
};
use gesture_pointer::utils::format_user_error;

/// Command-line arguments for gesture-pointer
#[derive(Parser, Debug)]
#[command(name = "gesture-pointer")]
#[command(version, about = "Hand-gesture driven virtual pointer", long_about = None)]
pub struct Args {
    /// Configuration file path (default: <config dir>/gesture-pointer/config.toml)
    #[arg(short, long, env = "GESTURE_POINTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Replay a recorded session instead of the camera
    #[arg(short, long)]
    pub recording: Option<PathBuf>,

    /// Document layout (JSON); defaults to an empty page
    #[arg(short = 'L', long)]
    pub layout: Option<PathBuf>,

    /// Viewport size as WIDTHxHEIGHT
    #[arg(long, default_value = "1280x720", value_parser = parse_viewport)]
    pub viewport: Viewport,

    /// Verbose logging (can be specified multiple times)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log format (json|pretty|compact)
    #[arg(long, default_value = "pretty")]
    pub log_format: String,

    /// Override the configured log level
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override the configured display refresh rate
    #[arg(long)]
    pub refresh_hz: Option<u32>,
}

fn parse_viewport(value: &str) -> std::result::Result<Viewport, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", value))?;
    let width: f64 = width
        .trim()
        .parse()
        .map_err(|e| format!("invalid width '{}': {}", width, e))?;
    let height: f64 = height
        .trim()
        .parse()
        .map_err(|e| format!("invalid height '{}': {}", height, e))?;
    Viewport::new(width, height).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let loaded = Config::load_or_default(args.config.as_deref()).and_then(|config| {
        let config = config.with_overrides(args.log_level.clone(), args.refresh_hz);
        config.validate()?;
        Ok(config)
    });
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    let _log_guard = init_logging(&args, &logging)?;

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", format_user_error(&e));
            return Err(e);
        }
    };

    info!("════════════════════════════════════════════════════════");
    info!("  gesture-pointer v{}", env!("CARGO_PKG_VERSION"));
    info!("  Profile: {}", if cfg!(debug_assertions) { "debug" } else { "release" });
    info!("════════════════════════════════════════════════════════");
    debug!("Config: {:?}", config);

    if let Err(e) = run(args, config).await {
        eprintln!("{}", format_user_error(&e));
        return Err(e);
    }

    info!("gesture-pointer shut down");
    Ok(())
}

async fn run(args: Args, config: Config) -> Result<()> {
    let document = match &args.layout {
        Some(path) => MemoryDocument::load(path, args.viewport, config.class_names())
            .with_context(|| format!("Failed to load layout {}", path.display()))?,
        None => MemoryDocument::new(args.viewport, config.class_names()),
    };

    let recording = match &args.recording {
        Some(path) => Some(Arc::new(Recording::load(path).await?)),
        None => None,
    };

    let source = ReplayFrameSource::new(
        recording
            .clone()
            .unwrap_or_else(|| Arc::new(Recording::new(0, Vec::new()))),
        Pacing::RealTime,
    );
    let mut frame_loop = FrameLoop::new(source, document, &config);

    let init = async move {
        match recording {
            Some(recording) => ReplayRecognizer::load(recording).await,
            None => Err(SessionError::CameraUnavailable(
                "no camera backend in this build; pass --recording".to_string(),
            )),
        }
    };

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received shutdown signal");
            shutdown.cancel();
        }
    });

    let (keys_tx, keys_rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = FramedRead::new(tokio::io::stdin(), LinesCodec::new());
        while let Some(line) = lines.next().await {
            match line {
                Ok(line) => {
                    if keys_tx.send(line).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("Stopped reading keys: {}", e);
                    break;
                }
            }
        }
    });

    info!(
        "Press '{}' + Enter to click at the pointer, Ctrl+C to stop",
        config.keyboard.primary_key
    );
    let result = frame_loop.run(init, keys_rx, cancel).await;

    for url in frame_loop.document().opened_urls() {
        info!("Opened link: {}", url);
    }

    // Logs go to stderr so stdout carries only the summary
    let summary = result?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn init_logging(args: &Args, logging: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let log_level = match args.verbose {
        0 => logging.level.as_str(),
        1 => "debug",
        _ => "trace",
    };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new(format!("gesture_pointer={},warn", log_level))
    });

    // If a log directory is configured, write to both stderr and a daily file
    if let Some(log_dir) = &logging.log_dir {
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;
        let appender = tracing_appender::rolling::daily(log_dir, "gesture-pointer.log");
        let (file, guard) = tracing_appender::non_blocking(appender);

        match args.log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(std::io::stderr),
                    )
                    .with(
                        tracing_subscriber::fmt::layer()
                            .with_writer(file)
                            .with_ansi(false),
                    )
                    .init();
            }
        }
        info!("Logging to directory: {}", log_dir.display());
        Ok(Some(guard))
    } else {
        match args.log_format.as_str() {
            "json" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .json()
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
            "compact" => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .compact()
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
            _ => {
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(
                        tracing_subscriber::fmt::layer()
                            .pretty()
                            .with_writer(std::io::stderr),
                    )
                    .init();
            }
        }
        Ok(None)
    }
}
