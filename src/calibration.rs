//! Baseline calibration.

use crate::face_estimation::FaceEstimate;
use log::info;

/// Result of feeding one estimate to the calibrator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Calibration {
    /// Still waiting for a detection
    Pending,
    /// This estimate became the baseline
    BaselineSet(f64),
    /// The baseline was already fixed earlier
    Calibrated(f64),
}

impl Calibration {
    /// The baseline, if one exists
    #[must_use]
    pub const fn baseline(self) -> Option<f64> {
        match self {
            Self::Pending => None,
            Self::BaselineSet(value) | Self::Calibrated(value) => Some(value),
        }
    }
}

/// Captures the first detection after a (re)start as the reference eye line.
///
/// No averaging: one sample is the whole calibration.
#[derive(Debug, Clone, Default)]
pub struct Calibrator {
    baseline: Option<f64>,
}

impl Calibrator {
    /// Create an uncalibrated calibrator
    #[must_use]
    pub const fn new() -> Self {
        Self { baseline: None }
    }

    /// Feed one tick's estimate
    pub fn observe(&mut self, estimate: Option<&FaceEstimate>) -> Calibration {
        if let Some(baseline) = self.baseline {
            return Calibration::Calibrated(baseline);
        }
        match estimate {
            Some(estimate) => {
                info!("Baseline set at {:.3}", estimate.normalized_y);
                self.baseline = Some(estimate.normalized_y);
                Calibration::BaselineSet(estimate.normalized_y)
            }
            None => Calibration::Pending,
        }
    }

    /// Frozen baseline, if calibrated
    #[must_use]
    pub const fn baseline(&self) -> Option<f64> {
        self.baseline
    }

    /// Whether a baseline has been captured
    #[must_use]
    pub const fn is_calibrated(&self) -> bool {
        self.baseline.is_some()
    }

    /// Forget the baseline
    pub fn reset(&mut self) {
        self.baseline = None;
    }
}
