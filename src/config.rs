//! Configuration management for the head scroll application

use crate::{
    constants::{
        DEFAULT_CAMERA_HEIGHT, DEFAULT_CAMERA_OPEN_TIMEOUT_MS, DEFAULT_CAMERA_WIDTH, DEFAULT_EYE_LINE_RATIO,
        DEFAULT_MIN_SKIN_SAMPLES, DEFAULT_PIXELS_PER_NOTCH, DEFAULT_SAMPLE_STRIDE, DEFAULT_SCROLL_CAP_PX,
        DEFAULT_SCROLL_DURATION_MS, DEFAULT_SCROLL_GAIN, DEFAULT_TARGET_FPS, DEFAULT_THROTTLE_MS, THROTTLE_MAX_MS,
        THROTTLE_MIN_MS,
    },
    session::TrackingConfig,
    settings::Settings,
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Control loop tuning
    pub tracking: TrackingSection,

    /// Skin-tone estimator parameters
    pub detection: DetectionConfig,

    /// Initial user settings
    pub settings: Settings,

    /// Webcam capture request
    pub camera: CameraConfig,

    /// Refresh driver configuration
    pub display: DisplayConfig,

    /// X11 wheel injection
    pub wheel: WheelConfig,
}

/// Control loop tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingSection {
    /// Minimum milliseconds between two scroll intents (50-100)
    pub throttle_ms: u64,

    /// Scroll gain: pixels per unit of normalized deviation per speed step
    pub gain: f64,

    /// Largest distance of one scroll animation in pixels
    pub scroll_cap_px: f64,

    /// Length of one scroll animation in milliseconds
    pub scroll_duration_ms: u64,
}

/// Skin-tone estimator parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Sample every Nth row and column
    pub sample_stride: usize,

    /// Skin samples needed for a detection
    pub min_skin_samples: usize,

    /// Eye line position inside the detected region (0.0-1.0)
    pub eye_line_ratio: f64,
}

/// Webcam capture request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera index
    pub index: i32,

    /// Requested frame width
    pub width: u32,

    /// Requested frame height
    pub height: u32,

    /// Give up opening the camera after this many milliseconds
    pub open_timeout_ms: u64,
}

/// Refresh driver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Refreshes per second
    pub target_fps: u32,
}

/// X11 wheel injection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Page distance of one wheel notch
    pub pixels_per_notch: f64,
}

impl Default for TrackingSection {
    fn default() -> Self {
        Self {
            throttle_ms: DEFAULT_THROTTLE_MS,
            gain: DEFAULT_SCROLL_GAIN,
            scroll_cap_px: DEFAULT_SCROLL_CAP_PX,
            scroll_duration_ms: DEFAULT_SCROLL_DURATION_MS,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            sample_stride: DEFAULT_SAMPLE_STRIDE,
            min_skin_samples: DEFAULT_MIN_SKIN_SAMPLES,
            eye_line_ratio: DEFAULT_EYE_LINE_RATIO,
        }
    }
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            index: 0,
            width: DEFAULT_CAMERA_WIDTH,
            height: DEFAULT_CAMERA_HEIGHT,
            open_timeout_ms: DEFAULT_CAMERA_OPEN_TIMEOUT_MS,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            pixels_per_notch: DEFAULT_PIXELS_PER_NOTCH,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::IoError(e.to_string()))?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_yaml::to_string(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| Error::IoError(e.to_string()))?;

        Ok(())
    }

    /// Control loop parameters derived from this configuration
    #[must_use]
    pub fn tracking_config(&self) -> TrackingConfig {
        TrackingConfig {
            throttle: Duration::from_millis(self.tracking.throttle_ms),
            gain: self.tracking.gain,
            scroll_cap: self.tracking.scroll_cap_px,
            scroll_duration: Duration::from_millis(self.tracking.scroll_duration_ms),
            sample_stride: self.detection.sample_stride,
            min_skin_samples: self.detection.min_skin_samples,
            eye_line_ratio: self.detection.eye_line_ratio,
        }
    }

    /// Time between two refreshes of the driver
    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(1) / self.display.target_fps.max(1)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate control loop
        if !(THROTTLE_MIN_MS..=THROTTLE_MAX_MS).contains(&self.tracking.throttle_ms) {
            return Err(Error::ConfigError(format!(
                "Throttle must be between {THROTTLE_MIN_MS} and {THROTTLE_MAX_MS} ms"
            )));
        }
        if !self.tracking.gain.is_finite() || self.tracking.gain <= 0.0 {
            return Err(Error::ConfigError("Scroll gain must be greater than 0".to_string()));
        }
        if !self.tracking.scroll_cap_px.is_finite() || self.tracking.scroll_cap_px <= 0.0 {
            return Err(Error::ConfigError("Scroll cap must be greater than 0".to_string()));
        }

        // Validate detection
        if self.detection.sample_stride == 0 {
            return Err(Error::ConfigError(
                "Sample stride must be greater than 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.detection.eye_line_ratio) {
            return Err(Error::ConfigError(
                "Eye line ratio must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Validate settings
        if !self.settings.is_valid() {
            return Err(Error::ConfigError(
                "Sensitivity and scroll speed must be between 1 and 10".to_string(),
            ));
        }

        // Validate camera and display
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(Error::ConfigError("Camera size must be non-zero".to_string()));
        }
        if self.display.target_fps == 0 {
            return Err(Error::ConfigError("Target FPS must be greater than 0".to_string()));
        }
        if !self.wheel.pixels_per_notch.is_finite() || self.wheel.pixels_per_notch <= 0.0 {
            return Err(Error::ConfigError(
                "Pixels per notch must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Head Scroll Configuration

# Control loop
tracking:
  throttle_ms: 75
  gain: 40.0
  scroll_cap_px: 150.0
  scroll_duration_ms: 60

# Skin-tone estimator
detection:
  sample_stride: 4
  min_skin_samples: 100
  eye_line_ratio: 0.35

# Initial user settings (1-10)
settings:
  sensitivity: 5
  scroll_speed: 3

# Webcam
camera:
  index: 0
  width: 320
  height: 240
  open_timeout_ms: 5000

# Refresh driver
display:
  target_fps: 60

# X11 wheel injection
wheel:
  pixels_per_notch: 40.0
"#;
