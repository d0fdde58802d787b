//! Skin-tone face estimation on raw RGBA frames.
//!
//! This is an approximation, not a face detector. Every `stride`-th pixel on
//! every `stride`-th row is classified by a fixed RGB rule, the bounding box of
//! the skin-like samples is taken as "the face", and the eye line is assumed to
//! sit a fixed fraction of the way down that box. Anything warm-coloured in
//! view (hands, wood, orange walls) will widen the box; that is accepted.

use crate::{
    constants::{
        DEFAULT_EYE_LINE_RATIO, DEFAULT_MIN_SKIN_SAMPLES, DEFAULT_SAMPLE_STRIDE, SKIN_MIN_BLUE, SKIN_MIN_GREEN,
        SKIN_MIN_RED, SKIN_MIN_RED_GREEN_GAP, SKIN_MIN_SPREAD,
    },
    frame::Frame,
};

/// Bounding box of the skin-like samples, inclusive pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Leftmost sampled column
    pub min_x: u32,
    /// Topmost sampled row
    pub min_y: u32,
    /// Rightmost sampled column
    pub max_x: u32,
    /// Bottommost sampled row
    pub max_y: u32,
}

impl Region {
    fn at(x: u32, y: u32) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.max_x = self.max_x.max(x);
        self.min_y = self.min_y.min(y);
        self.max_y = self.max_y.max(y);
    }

    /// Height of the region in pixels (distance between extreme rows)
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.max_y - self.min_y
    }
}

/// Estimated eye line of the user for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceEstimate {
    /// Eye line as a fraction of frame height, in [0, 1]
    pub normalized_y: f64,
    /// Eye line in pixel rows
    pub eye_y: f64,
    /// Horizontal centre of the detected region in pixels
    pub center_x: f64,
    /// Bounding box of the qualifying samples
    pub region: Region,
    /// Number of samples classified as skin
    pub sample_count: usize,
}

/// Fixed RGB rule for "looks like skin"
#[must_use]
pub fn is_skin_like(r: u8, g: u8, b: u8) -> bool {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);

    r > SKIN_MIN_RED
        && g > SKIN_MIN_GREEN
        && b > SKIN_MIN_BLUE
        && max - min > SKIN_MIN_SPREAD
        && r.abs_diff(g) > SKIN_MIN_RED_GREEN_GAP
        && r > g
        && r > b
}

/// Subsampling skin-tone estimator
#[derive(Debug, Clone)]
pub struct FaceEstimator {
    stride: usize,
    min_samples: usize,
    eye_line_ratio: f64,
}

impl Default for FaceEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_STRIDE, DEFAULT_MIN_SKIN_SAMPLES, DEFAULT_EYE_LINE_RATIO)
    }
}

impl FaceEstimator {
    /// Create an estimator
    ///
    /// A zero stride is treated as 1 and the eye line ratio is clamped to [0, 1].
    #[must_use]
    pub fn new(stride: usize, min_samples: usize, eye_line_ratio: f64) -> Self {
        Self {
            stride: stride.max(1),
            min_samples,
            eye_line_ratio: eye_line_ratio.clamp(0.0, 1.0),
        }
    }

    /// Sampling stride in pixels
    #[must_use]
    pub const fn stride(&self) -> usize {
        self.stride
    }

    /// Estimate the eye line, or `None` when too few skin-like samples were seen
    #[must_use]
    pub fn estimate(&self, frame: &Frame) -> Option<FaceEstimate> {
        let height = frame.height();
        if frame.width() == 0 || height == 0 {
            return None;
        }

        let mut region: Option<Region> = None;
        let mut sample_count = 0usize;

        for y in (0..height).step_by(self.stride) {
            for x in (0..frame.width()).step_by(self.stride) {
                let Some((r, g, b)) = frame.rgb_at(x, y) else {
                    continue;
                };
                if !is_skin_like(r, g, b) {
                    continue;
                }
                sample_count += 1;
                match region.as_mut() {
                    Some(region) => region.include(x, y),
                    None => region = Some(Region::at(x, y)),
                }
            }
        }

        // No skin at all is a miss even with min_samples == 0
        let region = region?;
        if sample_count < self.min_samples {
            return None;
        }

        let eye_y = f64::from(region.height()).mul_add(self.eye_line_ratio, f64::from(region.min_y));
        let center_x = (f64::from(region.min_x) + f64::from(region.max_x)) / 2.0;

        Some(FaceEstimate {
            normalized_y: (eye_y / f64::from(height)).clamp(0.0, 1.0),
            eye_y,
            center_x,
            region,
            sample_count,
        })
    }
}
