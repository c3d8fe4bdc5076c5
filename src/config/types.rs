//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Normalized-to-pixel mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Horizontal extrapolation margin in pixels
    #[serde(default = "default_margin_x")]
    pub margin_x: f64,

    /// Vertical extrapolation margin in pixels
    #[serde(default = "default_margin_y")]
    pub margin_y: f64,

    /// Mirror horizontally (front-facing camera)
    #[serde(default = "default_true")]
    pub mirror_x: bool,
}

fn default_margin_x() -> f64 {
    100.0
}
fn default_margin_y() -> f64 {
    200.0
}
fn default_true() -> bool {
    true
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            margin_x: default_margin_x(),
            margin_y: default_margin_y(),
            mirror_x: default_true(),
        }
    }
}

/// Gesture-to-action bindings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Label that fires the primary (click) action
    #[serde(default = "default_primary_label")]
    pub primary_label: String,

    /// Label that fires the context-menu action
    #[serde(default = "default_context_label")]
    pub context_label: String,

    /// Minimum interval between context actions (ms)
    #[serde(default = "default_context_cooldown_ms")]
    pub context_cooldown_ms: u64,

    /// Minimum interval between primary actions (ms, 0 = none)
    #[serde(default)]
    pub primary_cooldown_ms: u64,
}

fn default_primary_label() -> String {
    "Closed_Fist".to_string()
}
fn default_context_label() -> String {
    "ILoveYou".to_string()
}
fn default_context_cooldown_ms() -> u64 {
    1000
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            primary_label: default_primary_label(),
            context_label: default_context_label(),
            context_cooldown_ms: default_context_cooldown_ms(),
            primary_cooldown_ms: 0,
        }
    }
}

/// Hover marker classes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoverConfig {
    /// Class that marks an element as interactive
    #[serde(default = "default_interactive_class")]
    pub interactive_class: String,

    /// Class applied to hovered interactive elements
    #[serde(default = "default_hover_class")]
    pub hover_class: String,
}

fn default_interactive_class() -> String {
    "clickable".to_string()
}
fn default_hover_class() -> String {
    "hovering".to_string()
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            interactive_class: default_interactive_class(),
            hover_class: default_hover_class(),
        }
    }
}

/// Action dispatch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Class applied briefly to the action target
    #[serde(default = "default_activated_class")]
    pub activated_class: String,

    /// How long the activated class stays on (ms)
    #[serde(default = "default_pulse_ms")]
    pub pulse_ms: u64,

    /// Open link destinations on primary actions
    #[serde(default = "default_true")]
    pub open_links: bool,
}

fn default_activated_class() -> String {
    "active".to_string()
}
fn default_pulse_ms() -> u64 {
    100
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            activated_class: default_activated_class(),
            pulse_ms: default_pulse_ms(),
            open_links: default_true(),
        }
    }
}

/// Frame loop scheduling
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameLoopConfig {
    /// Display refresh rate the loop ticks at
    #[serde(default = "default_refresh_hz")]
    pub refresh_hz: u32,
}

fn default_refresh_hz() -> u32 {
    60
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            refresh_hz: default_refresh_hz(),
        }
    }
}

/// Keyboard fallback
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyboardConfig {
    /// Key that fires the primary action at the pointer
    #[serde(default = "default_primary_key")]
    pub primary_key: String,
}

fn default_primary_key() -> String {
    "q".to_string()
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            primary_key: default_primary_key(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level ("trace", "debug", "info", "warn", "error")
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file directory (None = stdout only)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            log_dir: None,
        }
    }
}
