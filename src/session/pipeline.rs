//! Per-frame pointer pipeline
//!
//! Owns all session state that survives between frames and runs one
//! recognition result through aggregation, mapping, hover tracking, gesture
//! debouncing and dispatch.
//!
//! ```text
//! RecognitionResult ──▶ palm centre ──▶ viewport point ──▶ PointerState
//!        │                                                     │
//!        │                                  HoverTracker ◀─────┤
//!        │                                  MotionTracker ◀────┘
//!        └──▶ top label ──▶ GestureDebouncer ──▶ ActionDispatcher
//! ```
//!
//! Missing data never propagates: the frame is skipped and all state is left
//! exactly as it was.

use std::time::Instant;

use serde::Serialize;
use tracing::{debug, trace};

use crate::config::Config;
use crate::cursor::{MotionTracker, PointerState, SplatterTrigger};
use crate::document::DocumentHost;
use crate::input::{
    classify_error, recovery_action, ActionKind, CoordinateMapper, ErrorType, GestureDebouncer,
    InputError, LandmarkAggregator, Point, RecognitionResult, RecoveryAction, Result, Viewport,
};
use crate::pointer::{ActionDispatcher, Dispatched, HoverTracker, HoverUpdate};

/// Counters accumulated over a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineStats {
    /// Frames that moved the pointer
    pub frames_processed: u64,
    /// Frames dropped for missing data
    pub frames_skipped: u64,
    /// Primary actions delivered to an element
    pub primary_actions: u64,
    /// Context actions delivered to an element
    pub context_actions: u64,
    /// Fired actions with nothing under the pointer
    pub untargeted_actions: u64,
    /// Links opened by primary actions
    pub links_opened: u64,
    /// Splatter effects requested
    pub splatters: u64,
}

impl PipelineStats {
    /// Delivered actions of one kind
    pub fn actions(&self, kind: ActionKind) -> u64 {
        match kind {
            ActionKind::Primary => self.primary_actions,
            ActionKind::Context => self.context_actions,
        }
    }
}

/// What one processed frame did
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport<N> {
    /// New pointer position
    pub position: Point,
    /// Hover tracking result
    pub hover: HoverUpdate<N>,
    /// Actions that fired and found a target
    pub dispatched: Vec<Dispatched<N>>,
    /// Cosmetic effect requested this frame
    pub splatter: Option<SplatterTrigger>,
}

/// Result of feeding one recognition result
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome<N> {
    /// Nothing changed
    Skipped(ErrorType),
    /// Pointer moved, possibly with actions
    Processed(FrameReport<N>),
}

impl<N> FrameOutcome<N> {
    /// Whether the frame moved the pointer
    pub fn is_processed(&self) -> bool {
        matches!(self, FrameOutcome::Processed(_))
    }
}

/// Session state plus the per-frame steps
pub struct PointerPipeline<N> {
    aggregator: LandmarkAggregator,
    mapper: CoordinateMapper,
    debouncer: GestureDebouncer,
    motion: MotionTracker,
    dispatcher: ActionDispatcher<N>,
    hover: HoverTracker<N>,
    state: PointerState<N>,
    primary_key: String,
    stats: PipelineStats,
}

impl<N: Copy + Eq + std::fmt::Debug + 'static> PointerPipeline<N> {
    /// Build a pipeline from configuration
    pub fn new(config: &Config) -> Self {
        Self {
            aggregator: LandmarkAggregator::palm(),
            mapper: config.mapper(),
            debouncer: config.debouncer(),
            motion: MotionTracker::new(config.motion.clone()),
            dispatcher: ActionDispatcher::new(&config.dispatch),
            hover: HoverTracker::new(),
            state: PointerState::new(),
            primary_key: config.keyboard.primary_key.clone(),
            stats: PipelineStats::default(),
        }
    }

    /// Current pointer state
    pub fn state(&self) -> &PointerState<N> {
        &self.state
    }

    /// Counters so far
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Run one recognition result through the pipeline
    ///
    /// Only errors classified as unrecoverable are returned; missing data
    /// yields [`FrameOutcome::Skipped`].
    pub fn process<D>(
        &mut self,
        document: &mut D,
        result: &RecognitionResult,
        now: Instant,
    ) -> Result<FrameOutcome<N>>
    where
        D: DocumentHost<Node = N>,
    {
        let position = match self.locate(document.viewport(), result) {
            Ok(position) => position,
            Err(e) => return self.skip(e),
        };

        self.state.move_to(position, now);
        debug!("Pointer at ({:.1}, {:.1})", position.x, position.y);

        let splatter = self.motion.update(position, now);
        if let Some(trigger) = &splatter {
            debug!("Splatter at speed {:.0} px/s", trigger.speed);
            document.on_splatter(trigger);
            self.stats.splatters += 1;
        }

        let hover = self.hover.update(document, position);
        self.state.hovered_element = hover.hovered;
        self.state.is_hovering_clickable = hover.clickable;

        // No gesture this frame leaves every latch untouched
        let fired = match result.top_gesture() {
            Ok(label) => self.debouncer.update(&label, now),
            Err(e) => {
                trace!("{}", e);
                Vec::new()
            }
        };

        let mut dispatched = Vec::with_capacity(fired.len());
        for kind in fired {
            if let Some(done) = self.fire(document, kind, now)? {
                dispatched.push(done);
            }
        }

        self.stats.frames_processed += 1;
        Ok(FrameOutcome::Processed(FrameReport {
            position,
            hover,
            dispatched,
            splatter,
        }))
    }

    /// Keyboard fallback: the primary key clicks at the pointer
    pub fn handle_key<D>(
        &mut self,
        document: &mut D,
        key: &str,
        now: Instant,
    ) -> Result<Option<Dispatched<N>>>
    where
        D: DocumentHost<Node = N>,
    {
        if key != self.primary_key {
            trace!("Ignoring key {:?}", key);
            return Ok(None);
        }
        debug!("Primary key pressed");
        self.fire(document, ActionKind::Primary, now)
    }

    /// Remove activated markers whose pulse has run out
    pub fn expire_pulses<D>(&mut self, document: &mut D, now: Instant)
    where
        D: DocumentHost<Node = N>,
    {
        self.dispatcher.expire_pulses(document, now);
    }

    /// Clear every marker the pipeline set on the document
    pub fn teardown<D>(&mut self, document: &mut D)
    where
        D: DocumentHost<Node = N>,
    {
        self.hover.clear(document);
        self.dispatcher.clear(document);
        self.state.hovered_element = None;
        self.state.is_hovering_clickable = false;
        self.debouncer.reset();
        self.motion.reset();
    }

    fn locate(&self, viewport: Viewport, result: &RecognitionResult) -> Result<Point> {
        let normalized = self.aggregator.aggregate_result(result)?;
        match self.mapper.map(normalized, viewport) {
            Err(e) if recovery_action(&e) == RecoveryAction::ClampCoordinates => self
                .mapper
                .map(normalized, Viewport::clamped(viewport.width, viewport.height)),
            other => other,
        }
    }

    fn skip(&mut self, error: InputError) -> Result<FrameOutcome<N>> {
        match recovery_action(&error) {
            RecoveryAction::Fail => Err(error),
            _ => {
                trace!("Skipping frame: {}", error);
                self.stats.frames_skipped += 1;
                Ok(FrameOutcome::Skipped(classify_error(&error)))
            }
        }
    }

    fn fire<D>(
        &mut self,
        document: &mut D,
        kind: ActionKind,
        now: Instant,
    ) -> Result<Option<Dispatched<N>>>
    where
        D: DocumentHost<Node = N>,
    {
        match self
            .dispatcher
            .dispatch(document, kind, self.state.position, now)
        {
            Ok(done) => {
                match kind {
                    ActionKind::Primary => self.stats.primary_actions += 1,
                    ActionKind::Context => self.stats.context_actions += 1,
                }
                if done.opened_url.is_some() {
                    self.stats.links_opened += 1;
                }
                Ok(Some(done))
            }
            Err(e) if recovery_action(&e) == RecoveryAction::NoOp => {
                debug!("{:?} action had no target: {}", kind, e);
                self.stats.untargeted_actions += 1;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
