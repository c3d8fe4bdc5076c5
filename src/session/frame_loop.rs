//! Frame loop driver
//!
//! Two-phase lifecycle: an initialization future (model load) gates a
//! recurring tick at the display refresh rate. Each tick handles at most one
//! video frame and awaits its recognition before the next tick can start, so
//! there is never more than one recognition in flight. When recognition is
//! slower than the refresh rate, intermediate frames are simply never seen.
//!
//! ```text
//!  init ──────────────▶ recognizer ready
//!                             │
//!  interval.tick() ──▶ expire pulses ──▶ new frame? ──▶ recognize ──▶ pipeline
//!  keys.recv()     ──▶ primary key fallback
//!  cancel          ──▶ teardown (release camera, clear markers)
//! ```
//!
//! Errors are routed through [`recovery_action`]: frame-local conditions are
//! dropped, while `ReportToUser` (camera or model failure) and `Fail` end the
//! session and come back to the caller as a [`SessionError`].

use std::future::Future;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};

use super::pipeline::{FrameOutcome, PipelineStats, PointerPipeline};
use super::source::{FrameSource, GestureRecognizer, SessionError};
use crate::config::Config;
use crate::document::DocumentHost;
use crate::input::{classify_error, recovery_action, InputError, RecoveryAction, Result};

/// What a single tick did
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome<N> {
    /// Model still loading
    NotReady,
    /// No frame newer than the last processed one
    NoNewFrame,
    /// Recognizer failed on this frame
    RecognitionFailed,
    /// Frame went through the pipeline
    Recognized(FrameOutcome<N>),
}

/// End-of-session report
#[derive(Debug, Clone, Default, Serialize)]
pub struct SessionSummary {
    /// Pipeline counters
    pub stats: PipelineStats,
    /// Ticks run
    pub ticks: u64,
    /// Ticks that found nothing to do
    pub idle_ticks: u64,
    /// Frames the recognizer failed on
    pub recognition_errors: u64,
    /// Wall time from start to teardown
    pub duration: Duration,
}

/// Frames-per-second bookkeeping for periodic logging
#[derive(Debug)]
struct FpsCounter {
    window_start: Instant,
    frames: u32,
}

impl FpsCounter {
    fn new(now: Instant) -> Self {
        Self {
            window_start: now,
            frames: 0,
        }
    }

    fn record(&mut self, now: Instant) {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.window_start);
        if elapsed >= Duration::from_secs(1) {
            debug!(
                "Frame loop: {:.1} fps",
                f64::from(self.frames) / elapsed.as_secs_f64()
            );
            self.window_start = now;
            self.frames = 0;
        }
    }
}

/// Drives the pipeline from a frame source and recognizer
pub struct FrameLoop<S, R, D: DocumentHost> {
    source: S,
    recognizer: Option<R>,
    document: D,
    pipeline: PointerPipeline<D::Node>,
    tick_interval: Duration,
    last_processed_time: Option<f64>,
    last_timestamp_ms: Option<i64>,
    ticks: u64,
    idle_ticks: u64,
    recognition_errors: u64,
    fps: FpsCounter,
    released: bool,
}

impl<S, R, D> FrameLoop<S, R, D>
where
    S: FrameSource,
    R: GestureRecognizer,
    D: DocumentHost,
{
    /// Create a loop; ticks are no-ops until a recognizer is installed
    pub fn new(source: S, document: D, config: &Config) -> Self {
        Self {
            source,
            recognizer: None,
            document,
            pipeline: PointerPipeline::new(config),
            tick_interval: config.tick_interval(),
            last_processed_time: None,
            last_timestamp_ms: None,
            ticks: 0,
            idle_ticks: 0,
            recognition_errors: 0,
            fps: FpsCounter::new(now()),
            released: false,
        }
    }

    /// Install a loaded recognizer
    pub fn set_recognizer(&mut self, recognizer: R) {
        info!("Recognizer ready, frame processing enabled");
        self.recognizer = Some(recognizer);
    }

    /// Whether the recognizer has been installed
    pub fn is_ready(&self) -> bool {
        self.recognizer.is_some()
    }

    /// The host document
    pub fn document(&self) -> &D {
        &self.document
    }

    /// The pipeline and its pointer state
    pub fn pipeline(&self) -> &PointerPipeline<D::Node> {
        &self.pipeline
    }

    /// Run one tick
    pub async fn tick(&mut self) -> Result<TickOutcome<D::Node>> {
        self.ticks += 1;
        self.pipeline.expire_pulses(&mut self.document, now());

        let Some(recognizer) = self.recognizer.as_mut() else {
            trace!("Tick skipped: model not ready");
            self.idle_ticks += 1;
            return Ok(TickOutcome::NotReady);
        };

        let frame = match self.source.current_frame() {
            Some(frame) if Some(frame.current_time) != self.last_processed_time => frame,
            _ => {
                trace!("Tick skipped: no new frame");
                self.idle_ticks += 1;
                return Ok(TickOutcome::NoNewFrame);
            }
        };

        // Recognizers reject timestamps that do not increase
        let mut timestamp_ms = chrono::Utc::now().timestamp_millis();
        if let Some(last) = self.last_timestamp_ms {
            timestamp_ms = timestamp_ms.max(last + 1);
        }
        self.last_timestamp_ms = Some(timestamp_ms);

        let recognized = recognizer.recognize(&frame, timestamp_ms).await;
        self.last_processed_time = Some(frame.current_time);

        let result = match recognized {
            Ok(result) => result,
            Err(e) => return self.recognition_failed(e),
        };

        // Recognition may have taken several refresh intervals
        let now = now();
        let outcome = self.pipeline.process(&mut self.document, &result, now)?;
        if outcome.is_processed() {
            self.fps.record(now);
        }
        Ok(TickOutcome::Recognized(outcome))
    }

    /// Keyboard fallback, handled between ticks
    pub fn handle_key(&mut self, key: &str) -> Result<()> {
        if let Some(done) = self.pipeline.handle_key(&mut self.document, key, now())? {
            info!("Key {:?} dispatched primary action to {:?}", key, done.target);
        }
        Ok(())
    }

    /// Run until cancelled, the source runs dry, or an error ends the session
    ///
    /// `init` resolves to the loaded recognizer; until then ticks are no-ops.
    /// Teardown always runs before returning, also on error.
    pub async fn run<F>(
        &mut self,
        init: F,
        mut keys: mpsc::Receiver<String>,
        cancel: CancellationToken,
    ) -> std::result::Result<SessionSummary, SessionError>
    where
        F: Future<Output = std::result::Result<R, SessionError>>,
    {
        let started = now();
        let mut failure = None;
        let mut init_pending = !self.is_ready();
        let mut keys_open = true;

        let mut interval = tokio::time::interval(self.tick_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(init);
        info!("Frame loop started ({:?} per tick)", self.tick_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Frame loop cancelled");
                    break;
                }
                loaded = &mut init, if init_pending => {
                    init_pending = false;
                    match loaded {
                        Ok(recognizer) => self.set_recognizer(recognizer),
                        Err(e) => {
                            // Nothing to run without a recognizer
                            report(&e.to_input_error());
                            failure = Some(e);
                            break;
                        }
                    }
                }
                key = keys.recv(), if keys_open => {
                    match key {
                        Some(key) => {
                            if let Err(e) = self.handle_key(key.trim()) {
                                report(&e);
                                failure = Some(SessionError::Stopped(e));
                                break;
                            }
                        }
                        None => {
                            debug!("Key channel closed");
                            keys_open = false;
                        }
                    }
                }
                _ = interval.tick() => {
                    match self.tick().await {
                        Ok(TickOutcome::NoNewFrame) if self.source.is_exhausted() => {
                            info!("Frame source exhausted");
                            break;
                        }
                        Ok(_) => {}
                        Err(e) => {
                            report(&e);
                            failure = Some(SessionError::Stopped(e));
                            break;
                        }
                    }
                }
            }
        }

        let mut summary = self.teardown();
        summary.duration = now().saturating_duration_since(started);
        match failure {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }

    /// Release the camera and clear every marker; safe to call twice
    pub fn teardown(&mut self) -> SessionSummary {
        if !self.released {
            self.source.release();
            self.released = true;
            info!("Camera released");
        }
        self.pipeline.teardown(&mut self.document);

        let summary = SessionSummary {
            stats: self.pipeline.stats().clone(),
            ticks: self.ticks,
            idle_ticks: self.idle_ticks,
            recognition_errors: self.recognition_errors,
            duration: Duration::ZERO,
        };
        info!(
            "Session ended: {} frames processed, {} skipped, {} clicks, {} context menus",
            summary.stats.frames_processed,
            summary.stats.frames_skipped,
            summary.stats.primary_actions,
            summary.stats.context_actions
        );
        summary
    }

    fn recognition_failed(&mut self, error: InputError) -> Result<TickOutcome<D::Node>> {
        match recovery_action(&error) {
            RecoveryAction::SkipFrame | RecoveryAction::NoOp => {
                warn!("Recognition failed, frame dropped: {}", error);
                self.recognition_errors += 1;
                Ok(TickOutcome::RecognitionFailed)
            }
            _ => Err(error),
        }
    }
}

/// Log an error that ends the session at the severity its class calls for
fn report(error: &InputError) {
    match recovery_action(error) {
        RecoveryAction::ReportToUser => {
            warn!("Pointer inactive: {}", error);
        }
        action => {
            error!(
                "Frame loop stopped ({:?}, {:?}): {}",
                classify_error(error),
                action,
                error
            );
        }
    }
}

/// Current time on the runtime clock (follows paused time in tests)
fn now() -> Instant {
    tokio::time::Instant::now().into_std()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ClassNames, Element, ElementId, MemoryDocument, Rect};
    use crate::input::{
        GestureCategory, Landmark, RecognitionResult, Viewport, HAND_LANDMARK_COUNT,
    };
    use crate::session::source::{MockFrameSource, VideoFrame};
    use async_trait::async_trait;

    struct FixedRecognizer {
        result: RecognitionResult,
        calls: usize,
    }

    impl FixedRecognizer {
        fn new(label: &str) -> Self {
            Self {
                result: RecognitionResult {
                    landmarks: vec![vec![Landmark::new(0.5, 0.5); HAND_LANDMARK_COUNT]],
                    gestures: vec![vec![GestureCategory {
                        category_name: label.to_string(),
                        score: 0.9,
                    }]],
                },
                calls: 0,
            }
        }
    }

    #[async_trait]
    impl GestureRecognizer for FixedRecognizer {
        async fn recognize(
            &mut self,
            _frame: &VideoFrame,
            _timestamp_ms: i64,
        ) -> std::result::Result<RecognitionResult, InputError> {
            self.calls += 1;
            Ok(self.result.clone())
        }
    }

    /// Recognizer that takes `delay` per frame
    struct SlowRecognizer {
        inner: FixedRecognizer,
        delay: Duration,
    }

    #[async_trait]
    impl GestureRecognizer for SlowRecognizer {
        async fn recognize(
            &mut self,
            frame: &VideoFrame,
            timestamp_ms: i64,
        ) -> std::result::Result<RecognitionResult, InputError> {
            tokio::time::sleep(self.delay).await;
            self.inner.recognize(frame, timestamp_ms).await
        }
    }

    /// Recognizer that always fails with `error`
    struct FailingRecognizer {
        error: InputError,
    }

    #[async_trait]
    impl GestureRecognizer for FailingRecognizer {
        async fn recognize(
            &mut self,
            _frame: &VideoFrame,
            _timestamp_ms: i64,
        ) -> std::result::Result<RecognitionResult, InputError> {
            Err(self.error.clone())
        }
    }

    fn document() -> (MemoryDocument, ElementId) {
        let mut doc =
            MemoryDocument::new(Viewport::new(1000.0, 800.0).unwrap(), ClassNames::default());
        let root = doc.root();
        let button = doc.append(
            root,
            Element::new("button", Rect::new(400.0, 300.0, 200.0, 200.0)),
        );
        (doc, button)
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_is_noop_until_ready() {
        let mut source = MockFrameSource::new();
        source.expect_current_frame().times(0);
        let (doc, _) = document();

        let mut frame_loop: FrameLoop<_, FixedRecognizer, _> =
            FrameLoop::new(source, doc, &Config::default());

        assert_eq!(frame_loop.tick().await.unwrap(), TickOutcome::NotReady);
        assert!(!frame_loop.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_frame_is_processed_once() {
        let mut source = MockFrameSource::new();
        source
            .expect_current_frame()
            .returning(|| Some(VideoFrame::empty(0, 0.25)));
        let (doc, _) = document();

        let mut frame_loop = FrameLoop::new(source, doc, &Config::default());
        frame_loop.set_recognizer(FixedRecognizer::new("None"));

        assert!(matches!(
            frame_loop.tick().await.unwrap(),
            TickOutcome::Recognized(_)
        ));
        assert_eq!(frame_loop.tick().await.unwrap(), TickOutcome::NoNewFrame);
        assert_eq!(frame_loop.recognizer.as_ref().unwrap().calls, 1);
        assert_eq!(frame_loop.pipeline().stats().frames_processed, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_init_failure_reports_and_releases() {
        let mut source = MockFrameSource::new();
        source.expect_current_frame().times(0);
        source.expect_is_exhausted().return_const(false);
        source.expect_release().times(1).return_const(());
        let (doc, _) = document();

        let mut frame_loop: FrameLoop<_, FixedRecognizer, _> =
            FrameLoop::new(source, doc, &Config::default());
        let (_keys_tx, keys_rx) = mpsc::channel(4);

        let result = frame_loop
            .run(
                async { Err(SessionError::CameraUnavailable("permission denied".into())) },
                keys_rx,
                CancellationToken::new(),
            )
            .await;

        match result {
            Err(SessionError::CameraUnavailable(reason)) => {
                assert_eq!(reason, "permission denied")
            }
            other => panic!("expected camera failure, got {:?}", other),
        }
        assert_eq!(frame_loop.pipeline().stats().frames_processed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_tears_down_hover() {
        let mut source = MockFrameSource::new();
        let mut time = 0.0;
        source.expect_current_frame().returning(move || {
            time += 0.016;
            Some(VideoFrame::empty(0, time))
        });
        source.expect_is_exhausted().return_const(false);
        source.expect_release().times(1).return_const(());
        let (doc, button) = document();

        let mut frame_loop = FrameLoop::new(source, doc, &Config::default());
        let (_keys_tx, keys_rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            canceller.cancel();
        });

        let summary = frame_loop
            .run(async { Ok(FixedRecognizer::new("None")) }, keys_rx, cancel)
            .await
            .unwrap();

        assert!(summary.stats.frames_processed > 0);
        assert!(!frame_loop.document().has_class(button, "hovering"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_key_fallback_clicks() {
        let mut source = MockFrameSource::new();
        source
            .expect_current_frame()
            .returning(|| Some(VideoFrame::empty(0, 0.0)));
        source.expect_is_exhausted().return_const(false);
        source.expect_release().return_const(());
        let (doc, button) = document();

        let mut frame_loop = FrameLoop::new(source, doc, &Config::default());
        let (keys_tx, keys_rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            keys_tx.send("q\n".to_string()).await.unwrap();
            tokio::time::sleep(Duration::from_millis(100)).await;
            canceller.cancel();
        });

        let summary = frame_loop
            .run(async { Ok(FixedRecognizer::new("None")) }, keys_rx, cancel)
            .await
            .unwrap();

        assert_eq!(summary.stats.primary_actions, 1);
        let dispatched = frame_loop.document().dispatched();
        assert_eq!(dispatched.len(), 1);
        assert_eq!(dispatched[0].0, button);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pulse_measured_from_end_of_slow_recognition() {
        let mut source = MockFrameSource::new();
        source
            .expect_current_frame()
            .returning(|| Some(VideoFrame::empty(0, 0.0)));
        let (doc, button) = document();

        let mut frame_loop = FrameLoop::new(source, doc, &Config::default());
        frame_loop.set_recognizer(SlowRecognizer {
            inner: FixedRecognizer::new("Closed_Fist"),
            delay: Duration::from_millis(80),
        });

        assert!(matches!(
            frame_loop.tick().await.unwrap(),
            TickOutcome::Recognized(_)
        ));
        assert!(frame_loop.document().has_class(button, "active"));
        let clicked_at = frame_loop.document().dispatched()[0].1.timestamp;
        assert_eq!(
            frame_loop.pipeline().state().last_frame_timestamp,
            Some(clicked_at)
        );

        // 30 ms after the click the 100 ms pulse is still on
        tokio::time::advance(Duration::from_millis(30)).await;
        assert_eq!(frame_loop.tick().await.unwrap(), TickOutcome::NoNewFrame);
        assert!(frame_loop.document().has_class(button, "active"));

        tokio::time::advance(Duration::from_millis(80)).await;
        frame_loop.tick().await.unwrap();
        assert!(!frame_loop.document().has_class(button, "active"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_local_recognition_failure_is_dropped() {
        let mut source = MockFrameSource::new();
        source
            .expect_current_frame()
            .returning(|| Some(VideoFrame::empty(0, 0.0)));
        let (doc, _) = document();

        let mut frame_loop = FrameLoop::new(source, doc, &Config::default());
        frame_loop.set_recognizer(FailingRecognizer {
            error: InputError::RecognitionFailed("blurry".into()),
        });

        assert_eq!(
            frame_loop.tick().await.unwrap(),
            TickOutcome::RecognitionFailed
        );
        assert_eq!(frame_loop.recognition_errors, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_camera_lost_mid_session_ends_run() {
        let mut source = MockFrameSource::new();
        let mut time = 0.0;
        source.expect_current_frame().returning(move || {
            time += 0.016;
            Some(VideoFrame::empty(0, time))
        });
        source.expect_is_exhausted().return_const(false);
        source.expect_release().times(1).return_const(());
        let (doc, _) = document();

        let mut frame_loop = FrameLoop::new(source, doc, &Config::default());
        let (_keys_tx, keys_rx) = mpsc::channel(4);

        let result = frame_loop
            .run(
                async {
                    Ok(FailingRecognizer {
                        error: InputError::CameraUnavailable("unplugged".into()),
                    })
                },
                keys_rx,
                CancellationToken::new(),
            )
            .await;

        match result {
            Err(SessionError::Stopped(InputError::CameraUnavailable(reason))) => {
                assert_eq!(reason, "unplugged")
            }
            other => panic!("expected the session to stop, got {:?}", other.map(|s| s.ticks)),
        }
    }
}
