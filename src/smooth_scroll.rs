//! Eased scroll animation over a scroll sink.

use crate::{
    constants::{DEFAULT_SCROLL_CAP_PX, DEFAULT_SCROLL_DURATION_MS},
    scroll_decider::Direction,
};
use log::debug;
use std::time::{Duration, Instant};

/// Something with a vertical scroll position
pub trait ScrollSink {
    /// Current vertical offset in pixels
    fn scroll_offset(&self) -> f64;

    /// Move to an absolute vertical offset
    fn set_scroll_offset(&mut self, offset: f64);
}

impl<S: ScrollSink + ?Sized> ScrollSink for Box<S> {
    fn scroll_offset(&self) -> f64 {
        (**self).scroll_offset()
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        (**self).set_scroll_offset(offset);
    }
}

/// In-memory page scroll position, clamped like a browser viewport.
///
/// Every write is recorded in [`PageScroll::history`] and the record is never
/// trimmed, so use a fresh page per run.
#[derive(Debug, Clone, Default)]
pub struct PageScroll {
    offset: f64,
    max_offset: Option<f64>,
    history: Vec<f64>,
}

impl PageScroll {
    /// Unbounded page starting at `offset`
    #[must_use]
    pub fn new(offset: f64) -> Self {
        Self {
            offset: offset.max(0.0),
            max_offset: None,
            history: Vec::new(),
        }
    }

    /// Page that cannot scroll past `max_offset`
    #[must_use]
    pub fn with_max(offset: f64, max_offset: f64) -> Self {
        let max_offset = max_offset.max(0.0);
        Self {
            offset: offset.clamp(0.0, max_offset),
            max_offset: Some(max_offset),
            history: Vec::new(),
        }
    }

    /// Every offset written so far, after clamping
    #[must_use]
    pub fn history(&self) -> &[f64] {
        &self.history
    }
}

impl ScrollSink for PageScroll {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        let upper = self.max_offset.unwrap_or(f64::INFINITY);
        self.offset = offset.clamp(0.0, upper);
        self.history.push(self.offset);
    }
}

/// Quadratic ease-in-out on normalized progress
#[must_use]
pub fn ease_in_out_quad(progress: f64) -> f64 {
    let t = progress.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0f64).mul_add(t, 2.0).powi(2) / 2.0
    }
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    from: f64,
    distance: f64,
    duration: Duration,
    // Fixed by the first animation frame, not by the request
    started: Option<Instant>,
}

impl Animation {
    fn target(&self) -> f64 {
        self.from + self.distance
    }
}

/// Animates a [`ScrollSink`] towards a target offset.
///
/// A request arriving while another animation runs replaces it: the new
/// animation starts from wherever the page is now. Requests never stack.
#[derive(Debug)]
pub struct SmoothScroller<S> {
    sink: S,
    cap: f64,
    duration: Duration,
    animation: Option<Animation>,
}

impl<S: ScrollSink> SmoothScroller<S> {
    /// Scroller with the default cap and duration
    pub fn new(sink: S) -> Self {
        Self::with_limits(
            sink,
            DEFAULT_SCROLL_CAP_PX,
            Duration::from_millis(DEFAULT_SCROLL_DURATION_MS),
        )
    }

    /// Scroller with an explicit per-request cap and default duration
    pub fn with_limits(sink: S, cap: f64, duration: Duration) -> Self {
        Self {
            sink,
            cap: cap.max(0.0),
            duration,
            animation: None,
        }
    }

    /// Default animation length
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Start (or retarget) an animation lasting the default duration
    pub fn scroll_by(&mut self, direction: Direction, magnitude: u32) {
        self.scroll(direction, magnitude, self.duration);
    }

    /// Start (or retarget) an animation towards `current ± min(magnitude, cap)`
    pub fn scroll(&mut self, direction: Direction, magnitude: u32, duration: Duration) {
        let from = self.sink.scroll_offset();
        let distance = direction.sign() * f64::from(magnitude).clamp(0.0, self.cap);
        if self.animation.is_some() {
            debug!("Retargeting scroll animation from {from:.1}");
        }
        debug!("Scrolling {direction:?} by {:.1}px over {}ms", distance.abs(), duration.as_millis());
        self.animation = Some(Animation {
            from,
            distance,
            duration,
            started: None,
        });
    }

    /// Advance the animation to `now`.
    ///
    /// Returns whether an animation is still in flight afterwards.
    pub fn step(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation.as_mut() else {
            return false;
        };
        let started = *animation.started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);

        if elapsed >= animation.duration {
            let target = animation.target();
            self.animation = None;
            self.sink.set_scroll_offset(target);
            return false;
        }

        let progress = elapsed.as_secs_f64() / animation.duration.as_secs_f64();
        let position = animation.distance.mul_add(ease_in_out_quad(progress), animation.from);
        self.sink.set_scroll_offset(position);
        true
    }

    /// Drop any animation in flight without touching the sink
    pub fn cancel(&mut self) {
        self.animation = None;
    }

    /// Whether an animation is in flight
    pub const fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Offset the current animation will end at
    pub fn target(&self) -> Option<f64> {
        self.animation.as_ref().map(Animation::target)
    }

    /// The underlying sink
    pub const fn sink(&self) -> &S {
        &self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easing_endpoints_and_midpoint() {
        assert_eq!(ease_in_out_quad(0.0), 0.0);
        assert!((ease_in_out_quad(0.5) - 0.5).abs() < 1e-12);
        assert!((ease_in_out_quad(1.0) - 1.0).abs() < 1e-12);
        assert!((ease_in_out_quad(0.25) - 0.125).abs() < 1e-12);
        assert!((ease_in_out_quad(0.75) - 0.875).abs() < 1e-12);
        // Out of range progress is clamped
        assert!((ease_in_out_quad(3.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_first_frame_fixes_start_time() {
        let mut scroller = SmoothScroller::with_limits(PageScroll::new(100.0), 150.0, Duration::from_millis(100));
        let t0 = Instant::now();
        scroller.scroll(Direction::Down, 80, Duration::from_millis(100));

        // Request time does not count; the first frame sits at the start
        assert!(scroller.step(t0 + Duration::from_millis(500)));
        assert!((scroller.sink().scroll_offset() - 100.0).abs() < 1e-9);

        assert!(scroller.step(t0 + Duration::from_millis(550)));
        assert!((scroller.sink().scroll_offset() - 140.0).abs() < 1e-9);

        assert!(!scroller.step(t0 + Duration::from_millis(600)));
        assert_eq!(scroller.sink().scroll_offset(), 180.0);
        assert!(!scroller.is_animating());
    }

    #[test]
    fn test_magnitude_is_capped() {
        let mut scroller = SmoothScroller::with_limits(PageScroll::new(0.0), 150.0, Duration::ZERO);
        scroller.scroll_by(Direction::Down, 1000);
        assert_eq!(scroller.target(), Some(150.0));
        assert!(!scroller.step(Instant::now()));
        assert_eq!(scroller.sink().scroll_offset(), 150.0);
    }

    #[test]
    fn test_scroll_up_stops_at_top() {
        let mut scroller = SmoothScroller::with_limits(PageScroll::new(30.0), 150.0, Duration::ZERO);
        scroller.scroll_by(Direction::Up, 100);
        scroller.step(Instant::now());
        assert_eq!(scroller.sink().scroll_offset(), 0.0);
    }

    #[test]
    fn test_new_request_retargets_from_current_offset() {
        let mut scroller = SmoothScroller::with_limits(PageScroll::new(0.0), 150.0, Duration::from_millis(100));
        let t0 = Instant::now();
        scroller.scroll_by(Direction::Down, 100);
        scroller.step(t0);
        scroller.step(t0 + Duration::from_millis(50));
        let midway = scroller.sink().scroll_offset();
        assert!((midway - 50.0).abs() < 1e-9);

        scroller.scroll_by(Direction::Down, 100);
        assert_eq!(scroller.target(), Some(midway + 100.0));

        scroller.step(t0 + Duration::from_millis(60));
        assert!(!scroller.step(t0 + Duration::from_millis(160)));
        assert!((scroller.sink().scroll_offset() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_leaves_offset() {
        let mut scroller = SmoothScroller::new(PageScroll::new(10.0));
        scroller.scroll_by(Direction::Down, 50);
        scroller.cancel();
        assert!(!scroller.step(Instant::now()));
        assert_eq!(scroller.sink().scroll_offset(), 10.0);
        assert!(scroller.sink().history().is_empty());
    }
}
