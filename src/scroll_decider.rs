//! Deadband and throttle logic turning eye-line movement into scroll intents.

use crate::{
    constants::{DEFAULT_SCROLL_GAIN, DEFAULT_THROTTLE_MS, SENSITIVITY_DIVISOR},
    face_estimation::FaceEstimate,
    settings::Settings,
    utils::safe_cast::f64_to_u32_saturating,
};
use std::time::{Duration, Instant};

/// Scroll direction relative to the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards the top of the page
    Up,
    /// Towards the bottom of the page
    Down,
}

impl Direction {
    /// +1 for down, -1 for up
    #[must_use]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Up => -1.0,
            Self::Down => 1.0,
        }
    }
}

/// Request to scroll the page by `magnitude` pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollIntent {
    /// Which way to scroll
    pub direction: Direction,
    /// Requested distance in pixels
    pub magnitude: u32,
}

/// Outcome of one decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Decision {
    /// No face this tick
    FaceLost,
    /// Movement stays inside the deadband
    Hold {
        /// Signed deviation from baseline
        delta: f64,
    },
    /// Movement is large enough but the previous intent was too recent
    Throttled {
        /// Signed deviation from baseline
        delta: f64,
    },
    /// Scroll now
    Scroll(ScrollIntent),
}

impl Decision {
    /// The intent, if this decision scrolls
    #[must_use]
    pub const fn intent(&self) -> Option<ScrollIntent> {
        match self {
            Self::Scroll(intent) => Some(*intent),
            _ => None,
        }
    }
}

/// Normalized deviation needed before a scroll triggers
#[must_use]
pub fn threshold_for(settings: &Settings) -> f64 {
    f64::from(settings.sensitivity) / SENSITIVITY_DIVISOR
}

/// Compares estimates against the baseline
#[derive(Debug, Clone)]
pub struct ScrollDecider {
    throttle: Duration,
    gain: f64,
}

impl Default for ScrollDecider {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_THROTTLE_MS), DEFAULT_SCROLL_GAIN)
    }
}

impl ScrollDecider {
    /// Create a decider with a throttle window and a pixel gain
    #[must_use]
    pub fn new(throttle: Duration, gain: f64) -> Self {
        Self {
            throttle,
            gain: gain.max(0.0),
        }
    }

    /// Decide what to do this tick.
    ///
    /// The caller owns `last_scroll` and must only move it forward when the
    /// result is [`Decision::Scroll`].
    #[must_use]
    pub fn decide(
        &self,
        estimate: Option<&FaceEstimate>,
        baseline: f64,
        settings: &Settings,
        now: Instant,
        last_scroll: Option<Instant>,
    ) -> Decision {
        let Some(estimate) = estimate else {
            return Decision::FaceLost;
        };

        let delta = estimate.normalized_y - baseline;
        if delta.abs() <= threshold_for(settings) {
            return Decision::Hold { delta };
        }

        let throttled = last_scroll.is_some_and(|last| now.saturating_duration_since(last) <= self.throttle);
        if throttled {
            return Decision::Throttled { delta };
        }

        let direction = if delta > 0.0 { Direction::Down } else { Direction::Up };
        let magnitude = f64_to_u32_saturating((delta.abs() * f64::from(settings.scroll_speed) * self.gain).round());

        Decision::Scroll(ScrollIntent { direction, magnitude })
    }
}
