//! Configuration management
//!
//! Handles loading, validation, and merging of configuration from:
//! - TOML files
//! - CLI arguments
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working setup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub mod types;

pub use types::{
    DispatchConfig, FrameLoopConfig, GestureConfig, HoverConfig, KeyboardConfig, LoggingConfig,
    MappingConfig,
};

use crate::cursor::MotionConfig;
use crate::document::ClassNames;
use crate::input::{ActionKind, CoordinateMapper, GestureBinding, GestureDebouncer, GestureLabel};

/// Upper bound for the frame loop rate
pub const MAX_REFRESH_HZ: u32 = 1000;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Coordinate mapping
    #[serde(default)]
    pub mapping: MappingConfig,
    /// Gesture bindings
    #[serde(default)]
    pub gestures: GestureConfig,
    /// Hover markers
    #[serde(default)]
    pub hover: HoverConfig,
    /// Action dispatch
    #[serde(default)]
    pub dispatch: DispatchConfig,
    /// Pointer motion tracking
    #[serde(default)]
    pub motion: MotionConfig,
    /// Frame loop scheduling
    #[serde(default)]
    pub frame_loop: FrameLoopConfig,
    /// Keyboard fallback
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else the default location, else built-in defaults
    ///
    /// An explicitly named file must exist; a missing default file only warns.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.exists() => {
                info!("Loading configuration from {}", path.display());
                Self::load(&path)
            }
            Some(path) => {
                warn!("No configuration at {}, using defaults", path.display());
                Self::default_config()
            }
            None => {
                warn!("No configuration directory on this platform, using defaults");
                Self::default_config()
            }
        }
    }

    /// `<config dir>/gesture-pointer/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gesture-pointer").join("config.toml"))
    }

    /// Create default configuration
    pub fn default_config() -> Result<Self> {
        Ok(Config::default())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let gestures = &self.gestures;
        if gestures.primary_label.trim().is_empty() {
            anyhow::bail!("gestures.primary_label must not be empty");
        }
        if gestures.context_label.trim().is_empty() {
            anyhow::bail!("gestures.context_label must not be empty");
        }
        if gestures.primary_label == gestures.context_label {
            anyhow::bail!(
                "Primary and context gestures are both bound to '{}'",
                gestures.primary_label
            );
        }

        for (name, margin) in [
            ("mapping.margin_x", self.mapping.margin_x),
            ("mapping.margin_y", self.mapping.margin_y),
        ] {
            if !margin.is_finite() || margin < 0.0 {
                anyhow::bail!("{} must be a non-negative number, got {}", name, margin);
            }
        }

        let smoothing = self.motion.velocity_smoothing;
        if !(smoothing > 0.0 && smoothing <= 1.0) {
            anyhow::bail!(
                "motion.velocity_smoothing must be in (0, 1], got {}",
                smoothing
            );
        }
        if !self.motion.splatter_speed_threshold.is_finite()
            || self.motion.splatter_speed_threshold < 0.0
        {
            anyhow::bail!(
                "motion.splatter_speed_threshold must be a non-negative number, got {}",
                self.motion.splatter_speed_threshold
            );
        }

        if self.frame_loop.refresh_hz == 0 || self.frame_loop.refresh_hz > MAX_REFRESH_HZ {
            anyhow::bail!(
                "frame_loop.refresh_hz must be between 1 and {}, got {}",
                MAX_REFRESH_HZ,
                self.frame_loop.refresh_hz
            );
        }

        if self.dispatch.pulse_ms == 0 {
            anyhow::bail!("dispatch.pulse_ms must be greater than 0");
        }

        if self.keyboard.primary_key.is_empty() {
            anyhow::bail!("keyboard.primary_key must not be empty");
        }

        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!("Invalid log level: {}", self.logging.level),
        }

        Ok(())
    }

    /// Override config with CLI arguments
    pub fn with_overrides(mut self, log_level: Option<String>, refresh_hz: Option<u32>) -> Self {
        if let Some(level) = log_level {
            self.logging.level = level;
        }
        if let Some(hz) = refresh_hz {
            self.frame_loop.refresh_hz = hz;
        }
        self
    }

    /// Mapper for the configured margins
    pub fn mapper(&self) -> CoordinateMapper {
        CoordinateMapper::new(
            self.mapping.margin_x,
            self.mapping.margin_y,
            self.mapping.mirror_x,
        )
    }

    /// Debouncer for the configured bindings
    pub fn debouncer(&self) -> GestureDebouncer {
        GestureDebouncer::new([
            GestureBinding {
                kind: ActionKind::Primary,
                label: GestureLabel::from(self.gestures.primary_label.as_str()),
                cooldown: Duration::from_millis(self.gestures.primary_cooldown_ms),
            },
            GestureBinding {
                kind: ActionKind::Context,
                label: GestureLabel::from(self.gestures.context_label.as_str()),
                cooldown: Duration::from_millis(self.gestures.context_cooldown_ms),
            },
        ])
    }

    /// Marker class names for the in-memory document
    pub fn class_names(&self) -> ClassNames {
        ClassNames {
            interactive: self.hover.interactive_class.clone(),
            hovering: self.hover.hover_class.clone(),
            activated: self.dispatch.activated_class.clone(),
        }
    }

    /// Interval between frame loop ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_loop.refresh_hz.max(1)))
    }
}
