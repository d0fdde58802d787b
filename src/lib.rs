//! Hands-free page scrolling driven by head tilt seen through a webcam.
//!
//! The pipeline runs once per display refresh:
//! 1. A frame source delivers an RGBA frame (webcam or replayed images)
//! 2. The skin-tone estimator locates the face and its eye line
//! 3. The first detection after a start becomes the neutral baseline
//! 4. The decider compares the eye line with the baseline and emits a
//!    throttled scroll intent once the deviation leaves the deadband
//! 5. The smooth scroller eases the page towards the new offset
//!
//! # Examples
//!
//! ```no_run
//! use head_scroll::{
//!     replay::ImageSequenceSource,
//!     session::{LogFeedback, TrackingConfig, TrackingSession},
//!     settings::Settings,
//!     smooth_scroll::PageScroll,
//! };
//! use std::time::Instant;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let source = ImageSequenceSource::from_dir("frames")?;
//! let mut session = TrackingSession::new(
//!     &TrackingConfig::default(),
//!     PageScroll::new(0.0),
//!     LogFeedback,
//!     Settings::default(),
//! );
//!
//! session.start(source);
//! for _ in 0..120 {
//!     session.on_refresh(Instant::now());
//! }
//! session.stop();
//! # Ok(())
//! # }
//! ```

/// Error types and result handling
pub mod error;

/// Constants used throughout the application
pub mod constants;

/// RGBA frames and frame sources
pub mod frame;

/// Skin-tone face and eye line estimation
pub mod face_estimation;

/// Neutral head position calibration
pub mod calibration;

/// Deadband and throttle decision making
pub mod scroll_decider;

/// Eased scroll animation
pub mod smooth_scroll;

/// User settings
pub mod settings;

/// Tracking session lifecycle
pub mod session;

/// Frame source acquisition with a deadline
pub mod capture;

/// Image sequence replay source
pub mod replay;

/// Webcam frame source
#[cfg(feature = "camera")]
pub mod camera;

/// Wheel scrolling for X11 systems
pub mod wheel_control;

/// Configuration management
pub mod config;

/// Main application module
pub mod app;

/// Utility functions
pub mod utils;

pub use error::{Error, Result};
