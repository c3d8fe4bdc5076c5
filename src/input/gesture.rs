//! Gesture Debouncing
//!
//! Turns the per-frame top gesture label into edge-triggered actions. Each
//! action kind owns an independent latch:
//!
//! ```text
//!            label == bound && cooldown elapsed  → fire
//!   idle ────────────────────────────────────────────▶ active
//!    ▲      label == bound && cooldown pending  → swallow
//!    │                                                   │
//!    └──────────────── label != bound ───────────────────┘
//! ```
//!
//! Holding a pose fires once; a single frame with a different label re-arms
//! the latch.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Closed vocabulary of recognizer labels, with an escape hatch
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum GestureLabel {
    /// Hand visible, no recognised pose
    None,
    /// Closed fist
    ClosedFist,
    /// Open palm
    OpenPalm,
    /// Index finger pointing up
    PointingUp,
    /// Thumb down
    ThumbDown,
    /// Thumb up
    ThumbUp,
    /// Index and middle finger spread
    Victory,
    /// Thumb, index and pinky extended
    ILoveYou,
    /// Anything the recognizer reports outside the known set
    Other(String),
}

impl GestureLabel {
    /// Label string as used by the recognizer
    pub fn as_str(&self) -> &str {
        match self {
            GestureLabel::None => "None",
            GestureLabel::ClosedFist => "Closed_Fist",
            GestureLabel::OpenPalm => "Open_Palm",
            GestureLabel::PointingUp => "Pointing_Up",
            GestureLabel::ThumbDown => "Thumb_Down",
            GestureLabel::ThumbUp => "Thumb_Up",
            GestureLabel::Victory => "Victory",
            GestureLabel::ILoveYou => "ILoveYou",
            GestureLabel::Other(name) => name,
        }
    }
}

impl From<&str> for GestureLabel {
    fn from(name: &str) -> Self {
        match name {
            "None" | "" => GestureLabel::None,
            "Closed_Fist" => GestureLabel::ClosedFist,
            "Open_Palm" => GestureLabel::OpenPalm,
            "Pointing_Up" => GestureLabel::PointingUp,
            "Thumb_Down" => GestureLabel::ThumbDown,
            "Thumb_Up" => GestureLabel::ThumbUp,
            "Victory" => GestureLabel::Victory,
            "ILoveYou" => GestureLabel::ILoveYou,
            other => GestureLabel::Other(other.to_string()),
        }
    }
}

impl From<String> for GestureLabel {
    fn from(name: String) -> Self {
        GestureLabel::from(name.as_str())
    }
}

impl From<GestureLabel> for String {
    fn from(label: GestureLabel) -> Self {
        label.as_str().to_string()
    }
}

impl fmt::Display for GestureLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pointer action a gesture can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Primary click
    Primary,
    /// Context menu
    Context,
}

impl ActionKind {
    /// Both kinds, in evaluation order
    pub const ALL: [ActionKind; 2] = [ActionKind::Primary, ActionKind::Context];
}

/// Binds a label to an action kind
#[derive(Debug, Clone)]
pub struct GestureBinding {
    /// Action fired on the rising edge
    pub kind: ActionKind,
    /// Label that asserts this action
    pub label: GestureLabel,
    /// Minimum interval between firings (zero disables the guard)
    pub cooldown: Duration,
}

/// Edge latch and cooldown bookkeeping for one binding
#[derive(Debug, Clone)]
struct EdgeLatch {
    binding: GestureBinding,
    active: bool,
    last_fired: Option<Instant>,
}

impl EdgeLatch {
    fn new(binding: GestureBinding) -> Self {
        Self {
            binding,
            active: false,
            last_fired: None,
        }
    }

    fn cooldown_elapsed(&self, now: Instant) -> bool {
        match self.last_fired {
            Some(last) => now.saturating_duration_since(last) >= self.binding.cooldown,
            None => true,
        }
    }

    /// Returns true when this frame fires the action
    fn update(&mut self, label: &GestureLabel, now: Instant) -> bool {
        if *label != self.binding.label {
            if self.active {
                debug!("{:?} gesture released", self.binding.kind);
            }
            self.active = false;
            return false;
        }

        if self.active {
            return false;
        }
        self.active = true;

        if !self.cooldown_elapsed(now) {
            debug!(
                "{:?} gesture edge swallowed by cooldown ({:?})",
                self.binding.kind, self.binding.cooldown
            );
            return false;
        }

        self.last_fired = Some(now);
        true
    }
}

/// Edge-triggered gesture state machine for all action kinds
#[derive(Debug, Clone)]
pub struct GestureDebouncer {
    latches: Vec<EdgeLatch>,
}

impl GestureDebouncer {
    /// Default context-action cooldown
    pub const DEFAULT_CONTEXT_COOLDOWN: Duration = Duration::from_millis(1000);

    /// Create a debouncer from explicit bindings
    pub fn new(bindings: impl IntoIterator<Item = GestureBinding>) -> Self {
        Self {
            latches: bindings.into_iter().map(EdgeLatch::new).collect(),
        }
    }

    /// Closed fist clicks; "I love you" opens the context menu with a 1 s cooldown
    pub fn with_defaults() -> Self {
        Self::new([
            GestureBinding {
                kind: ActionKind::Primary,
                label: GestureLabel::ClosedFist,
                cooldown: Duration::ZERO,
            },
            GestureBinding {
                kind: ActionKind::Context,
                label: GestureLabel::ILoveYou,
                cooldown: Self::DEFAULT_CONTEXT_COOLDOWN,
            },
        ])
    }

    /// Feed this frame's top label; returns the actions that fire
    pub fn update(&mut self, label: &GestureLabel, now: Instant) -> Vec<ActionKind> {
        let mut fired = Vec::new();
        for latch in &mut self.latches {
            if latch.update(label, now) {
                info!("{:?} action fired by {}", latch.binding.kind, label);
                fired.push(latch.binding.kind);
            }
        }
        fired
    }

    /// Whether the latch for `kind` is currently held
    pub fn is_active(&self, kind: ActionKind) -> bool {
        self.latches
            .iter()
            .any(|latch| latch.binding.kind == kind && latch.active)
    }

    /// Release every latch (cooldown timestamps are kept)
    pub fn reset(&mut self) {
        for latch in &mut self.latches {
            latch.active = false;
        }
    }
}

impl Default for GestureDebouncer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
