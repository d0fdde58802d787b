//! The tracking session: lifecycle and the per-refresh control loop.
//!
//! A session is driven from outside by one call per display refresh. Each
//! refresh runs two independent tasks, the tracking tick and the animation
//! step, and both check the session's liveness flag before doing anything.

use crate::{
    calibration::{Calibration, Calibrator},
    constants::{
        DEFAULT_EYE_LINE_RATIO, DEFAULT_MIN_SKIN_SAMPLES, DEFAULT_SAMPLE_STRIDE, DEFAULT_SCROLL_CAP_PX,
        DEFAULT_SCROLL_DURATION_MS, DEFAULT_SCROLL_GAIN, DEFAULT_THROTTLE_MS,
    },
    face_estimation::FaceEstimator,
    frame::FrameSource,
    scroll_decider::{Decision, Direction, ScrollDecider, ScrollIntent},
    settings::SettingsProvider,
    smooth_scroll::{ScrollSink, SmoothScroller},
};
use log::{debug, info, warn};
use std::{
    cell::Cell,
    fmt,
    rc::Rc,
    time::{Duration, Instant},
};

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not tracking
    Idle,
    /// Tracking, waiting for the first detection
    Calibrating,
    /// Tracking with a baseline
    Active,
}

/// Status reported to whatever UI is attached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackingStatus {
    /// Session started, no baseline yet
    Calibrating,
    /// A baseline was just captured
    BaselineSet,
    /// No face in the current frame
    FaceLost,
    /// A scroll up was issued
    ScrollingUp,
    /// A scroll down was issued
    ScrollingDown,
    /// Face found, no scroll this tick
    Tracking,
    /// Session stopped
    Idle,
}

impl fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::Calibrating => "Camera ready! Setting baseline...",
            Self::BaselineSet => "Baseline set! Look up/down to scroll.",
            Self::FaceLost => "No face detected. Position yourself.",
            Self::ScrollingUp => "Scrolling UP",
            Self::ScrollingDown => "Scrolling DOWN",
            Self::Tracking => "Tracking... Look up/down",
            Self::Idle => "Tracking stopped.",
        };
        f.write_str(message)
    }
}

/// Receiver of status changes
pub trait FeedbackSink {
    /// Called whenever the status differs from the previous one
    fn status(&mut self, status: TrackingStatus);
}

/// Records every status, in order
impl FeedbackSink for Vec<TrackingStatus> {
    fn status(&mut self, status: TrackingStatus) {
        self.push(status);
    }
}

/// Writes status changes to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback;

impl FeedbackSink for LogFeedback {
    fn status(&mut self, status: TrackingStatus) {
        info!("{status}");
    }
}

/// Handle that stops a run from anywhere on the tracking thread.
///
/// The session notices at the start of its next task and releases the source
/// there. A handle only ever affects the run it was taken from.
#[derive(Debug, Clone)]
pub struct StopHandle {
    live: Rc<Cell<bool>>,
}

impl StopHandle {
    /// Stop the run
    pub fn stop(&self) {
        self.live.set(false);
    }

    /// Whether the run is still going
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live.get()
    }
}

/// What a single tick did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// The session is not running
    Stopped,
    /// No frame this tick
    Skipped,
    /// The frame source ended
    SourceClosed,
    /// No face found
    FaceLost,
    /// First detection became the baseline
    BaselineSet(f64),
    /// Face inside the deadband
    Hold,
    /// Deviation large enough but too soon after the last scroll
    Throttled,
    /// A scroll was started
    Scrolled(ScrollIntent),
}

/// Tunables of the control loop
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingConfig {
    /// Minimum time between two scroll intents
    pub throttle: Duration,
    /// Pixels per unit of normalized deviation per speed step
    pub gain: f64,
    /// Largest distance of one animation
    pub scroll_cap: f64,
    /// Length of one scroll animation
    pub scroll_duration: Duration,
    /// Pixel sampling stride of the estimator
    pub sample_stride: usize,
    /// Skin samples needed for a detection
    pub min_skin_samples: usize,
    /// Eye line position inside the detected region
    pub eye_line_ratio: f64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            throttle: Duration::from_millis(DEFAULT_THROTTLE_MS),
            gain: DEFAULT_SCROLL_GAIN,
            scroll_cap: DEFAULT_SCROLL_CAP_PX,
            scroll_duration: Duration::from_millis(DEFAULT_SCROLL_DURATION_MS),
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            min_skin_samples: DEFAULT_MIN_SKIN_SAMPLES,
            eye_line_ratio: DEFAULT_EYE_LINE_RATIO,
        }
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Ticks that asked the source for a frame
    pub ticks: u64,
    /// Ticks without a usable frame
    pub skipped: u64,
    /// Frames with a face estimate
    pub detections: u64,
    /// Scroll intents issued
    pub intents: u64,
}

/// Owns every piece of tracking state for one page
pub struct TrackingSession<S, F> {
    estimator: FaceEstimator,
    calibrator: Calibrator,
    decider: ScrollDecider,
    scroller: SmoothScroller<S>,
    feedback: F,
    settings: Box<dyn SettingsProvider>,
    source: Option<Box<dyn FrameSource>>,
    live: Rc<Cell<bool>>,
    last_scroll_at: Option<Instant>,
    last_status: Option<TrackingStatus>,
    stats: SessionStats,
}

impl<S: ScrollSink, F: FeedbackSink> TrackingSession<S, F> {
    /// Create an idle session
    pub fn new(config: &TrackingConfig, sink: S, feedback: F, settings: impl SettingsProvider + 'static) -> Self {
        Self {
            estimator: FaceEstimator::new(config.sample_stride, config.min_skin_samples, config.eye_line_ratio),
            calibrator: Calibrator::new(),
            decider: ScrollDecider::new(config.throttle, config.gain),
            scroller: SmoothScroller::with_limits(sink, config.scroll_cap, config.scroll_duration),
            feedback,
            settings: Box::new(settings),
            source: None,
            live: Rc::new(Cell::new(false)),
            last_scroll_at: None,
            last_status: None,
            stats: SessionStats::default(),
        }
    }

    /// Begin tracking with an already acquired frame source.
    ///
    /// Starting a running session restarts it: the old source is released and
    /// calibration begins again.
    pub fn start<Src: FrameSource + 'static>(&mut self, source: Src) {
        if self.source.is_some() {
            info!("Restarting tracking session");
            self.live.set(false);
            self.shutdown();
        }
        info!("Tracking started with {}", source.describe());

        self.live = Rc::new(Cell::new(true));
        self.source = Some(Box::new(source));
        self.calibrator.reset();
        self.last_scroll_at = None;
        self.stats = SessionStats::default();
        self.emit(TrackingStatus::Calibrating);
    }

    /// Stop tracking, release the source and forget the baseline
    pub fn stop(&mut self) {
        if self.source.is_none() && !self.live.get() {
            return;
        }
        self.live.set(false);
        self.shutdown();
        self.announce(TrackingStatus::Idle);
    }

    /// Handle that can stop the current run mid-tick
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle { live: Rc::clone(&self.live) }
    }

    /// Current lifecycle state
    #[must_use]
    pub fn state(&self) -> SessionState {
        if !self.live.get() || self.source.is_none() {
            SessionState::Idle
        } else if self.calibrator.is_calibrated() {
            SessionState::Active
        } else {
            SessionState::Calibrating
        }
    }

    /// Baseline of the current run; only defined while active
    #[must_use]
    pub fn baseline(&self) -> Option<f64> {
        match self.state() {
            SessionState::Active => self.calibrator.baseline(),
            _ => None,
        }
    }

    /// Counters of the current (or last) run
    #[must_use]
    pub const fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The scroller and its sink
    #[must_use]
    pub const fn scroller(&self) -> &SmoothScroller<S> {
        &self.scroller
    }

    /// The feedback sink
    #[must_use]
    pub const fn feedback(&self) -> &F {
        &self.feedback
    }

    /// Run both per-refresh tasks: the tracking tick, then the animation step
    pub fn on_refresh(&mut self, now: Instant) -> TickOutcome {
        let outcome = self.tick(now);
        self.animate(now);
        outcome
    }

    /// Tracking task: one frame in, at most one scroll intent out
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        if !self.live.get() {
            self.finish_halt();
            return TickOutcome::Stopped;
        }
        let Some(source) = self.source.as_mut() else {
            return TickOutcome::Stopped;
        };

        self.stats.ticks += 1;
        let frame = match source.next_frame() {
            Ok(frame) => frame,
            Err(e) if !e.is_transient() => {
                info!("Frame source closed");
                return TickOutcome::SourceClosed;
            }
            Err(e) => {
                warn!("Skipping tick: {e}");
                self.stats.skipped += 1;
                return TickOutcome::Skipped;
            }
        };

        let estimate = self.estimator.estimate(&frame);
        if estimate.is_some() {
            self.stats.detections += 1;
        }

        // The source may have stopped the run while delivering
        if !self.live.get() {
            self.finish_halt();
            return TickOutcome::Stopped;
        }

        let Some(baseline) = self.calibrator.baseline() else {
            return match self.calibrator.observe(estimate.as_ref()) {
                Calibration::BaselineSet(value) | Calibration::Calibrated(value) => {
                    self.emit(TrackingStatus::BaselineSet);
                    TickOutcome::BaselineSet(value)
                }
                Calibration::Pending => {
                    self.emit(TrackingStatus::FaceLost);
                    TickOutcome::FaceLost
                }
            };
        };

        let settings = self.settings.current().sanitized();
        let decision = self
            .decider
            .decide(estimate.as_ref(), baseline, &settings, now, self.last_scroll_at);

        match decision {
            Decision::FaceLost => {
                self.emit(TrackingStatus::FaceLost);
                TickOutcome::FaceLost
            }
            Decision::Hold { .. } => {
                self.emit(TrackingStatus::Tracking);
                TickOutcome::Hold
            }
            Decision::Throttled { .. } => {
                self.emit(TrackingStatus::Tracking);
                TickOutcome::Throttled
            }
            Decision::Scroll(intent) => {
                debug!("Scroll intent {:?} {}px", intent.direction, intent.magnitude);
                self.last_scroll_at = Some(now);
                self.stats.intents += 1;
                self.scroller
                    .scroll(intent.direction, intent.magnitude, self.scroller.duration());
                self.emit(match intent.direction {
                    Direction::Up => TrackingStatus::ScrollingUp,
                    Direction::Down => TrackingStatus::ScrollingDown,
                });
                TickOutcome::Scrolled(intent)
            }
        }
    }

    /// Animation task: advance the scroll animation by one frame
    pub fn animate(&mut self, now: Instant) -> bool {
        if !self.live.get() {
            self.scroller.cancel();
            return false;
        }
        self.scroller.step(now)
    }

    /// Send a status change, unless the run is over
    fn emit(&mut self, status: TrackingStatus) {
        if self.live.get() {
            self.announce(status);
        }
    }

    fn announce(&mut self, status: TrackingStatus) {
        if self.last_status == Some(status) {
            return;
        }
        self.last_status = Some(status);
        self.feedback.status(status);
    }

    /// Complete a stop requested through a [`StopHandle`]
    fn finish_halt(&mut self) {
        if self.source.is_some() {
            self.shutdown();
            self.announce(TrackingStatus::Idle);
        }
    }

    fn shutdown(&mut self) {
        self.scroller.cancel();
        if let Some(source) = self.source.take() {
            info!(
                "Releasing {} after {} ticks ({} skipped, {} detections, {} scrolls)",
                source.describe(),
                self.stats.ticks,
                self.stats.skipped,
                self.stats.detections,
                self.stats.intents
            );
        }
        self.calibrator.reset();
        self.last_scroll_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        frame::{Frame, FrameQueue},
        settings::Settings,
        smooth_scroll::PageScroll,
        Error,
    };

    fn session() -> TrackingSession<PageScroll, Vec<TrackingStatus>> {
        TrackingSession::new(&TrackingConfig::default(), PageScroll::new(0.0), Vec::new(), Settings::default())
    }

    #[test]
    fn test_new_session_is_idle() {
        let mut session = session();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.tick(Instant::now()), TickOutcome::Stopped);
        assert!(session.feedback().is_empty());
    }

    #[test]
    fn test_stop_on_idle_session_is_silent() {
        let mut session = session();
        session.stop();
        assert!(session.feedback().is_empty());
    }

    #[test]
    fn test_unavailable_frame_skips_tick() {
        let mut session = session();
        let mut queue = FrameQueue::new();
        queue.push_error(Error::FrameUnavailable("camera busy".to_string()));
        queue.push(Frame::filled(16, 16, [0, 0, 0, 255]).unwrap());
        session.start(queue);

        assert_eq!(session.tick(Instant::now()), TickOutcome::Skipped);
        assert_eq!(session.tick(Instant::now()), TickOutcome::FaceLost);
        assert_eq!(session.tick(Instant::now()), TickOutcome::SourceClosed);
        assert_eq!(session.state(), SessionState::Calibrating);
        assert_eq!(session.stats().skipped, 1);
    }

    #[test]
    fn test_status_changes_are_deduplicated() {
        let mut session = session();
        let black = Frame::filled(16, 16, [0, 0, 0, 255]).unwrap();
        session.start(FrameQueue::from_iter(vec![black.clone(), black.clone(), black]));

        for _ in 0..3 {
            session.tick(Instant::now());
        }
        assert_eq!(
            session.feedback(),
            &vec![TrackingStatus::Calibrating, TrackingStatus::FaceLost]
        );
    }

    #[test]
    fn test_status_messages() {
        assert_eq!(TrackingStatus::BaselineSet.to_string(), "Baseline set! Look up/down to scroll.");
        assert_eq!(TrackingStatus::ScrollingDown.to_string(), "Scrolling DOWN");
    }
}
