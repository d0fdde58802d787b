//! Constants used throughout the application

/// Sample every Nth row and column when scanning a frame
pub const DEFAULT_SAMPLE_STRIDE: usize = 4;

/// Minimum number of skin-like samples before a frame counts as a detection
pub const DEFAULT_MIN_SKIN_SAMPLES: usize = 100;

/// Eye line position as a fraction of the detected region height
pub const DEFAULT_EYE_LINE_RATIO: f64 = 0.35;

/// Bytes per pixel in an RGBA frame
pub const RGBA_CHANNELS: usize = 4;

/// Skin classification thresholds (RGB channel values)
pub const SKIN_MIN_RED: u8 = 95;
pub const SKIN_MIN_GREEN: u8 = 40;
pub const SKIN_MIN_BLUE: u8 = 20;
pub const SKIN_MIN_SPREAD: u8 = 15;
pub const SKIN_MIN_RED_GREEN_GAP: u8 = 15;

/// Sensitivity is divided by this to get the normalized deadband
pub const SENSITIVITY_DIVISOR: f64 = 200.0;

/// Valid range for user settings
pub const SETTING_MIN: u32 = 1;
pub const SETTING_MAX: u32 = 10;

/// Default user settings
pub const DEFAULT_SENSITIVITY: u32 = 5;
pub const DEFAULT_SCROLL_SPEED: u32 = 3;

/// Default minimum time between two accepted scroll intents
pub const DEFAULT_THROTTLE_MS: u64 = 75;

/// Accepted throttle window bounds
pub const THROTTLE_MIN_MS: u64 = 50;
pub const THROTTLE_MAX_MS: u64 = 100;

/// Default pixels per unit of normalized deviation per speed step
pub const DEFAULT_SCROLL_GAIN: f64 = 40.0;

/// Default largest distance a single animation may travel
pub const DEFAULT_SCROLL_CAP_PX: f64 = 150.0;

/// Default smooth scroll animation length
pub const DEFAULT_SCROLL_DURATION_MS: u64 = 60;

/// Default refresh rate of the tracking driver
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// Default camera capture request
pub const DEFAULT_CAMERA_WIDTH: u32 = 320;
pub const DEFAULT_CAMERA_HEIGHT: u32 = 240;
pub const DEFAULT_CAMERA_OPEN_TIMEOUT_MS: u64 = 5000;

/// Default page distance represented by one wheel notch
pub const DEFAULT_PIXELS_PER_NOTCH: f64 = 40.0;

/// X11 pointer buttons that scroll up and down
pub const WHEEL_UP_BUTTON: u8 = 4;
pub const WHEEL_DOWN_BUTTON: u8 = 5;
