//! Main application module: frame input, scroll output and the refresh loop.

use crate::{
    capture::log_open_failure,
    config::Config,
    error::Result,
    frame::FrameSource,
    replay::ImageSequenceSource,
    session::{LogFeedback, SessionStats, TickOutcome, TrackingSession},
    smooth_scroll::ScrollSink,
    wheel_control::X11WheelSink,
};
use log::{debug, info, warn};
use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

/// Where frames come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameInput {
    /// Webcam index
    Camera(i32),
    /// Directory of still images
    Replay {
        /// Directory to read
        dir: PathBuf,
        /// Start over at the end instead of stopping
        looping: bool,
    },
}

/// Where scrolling goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// Wheel events on the X11 display
    X11,
    /// A simulated page, only logged
    Virtual,
}

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Frame input
    pub input: FrameInput,
    /// Scroll output
    pub sink: SinkKind,
    /// Loaded configuration file (or defaults)
    pub config: Config,
    /// Stop after this many refreshes
    pub max_frames: Option<u64>,
}

/// Simulated page that logs where it is scrolled to
#[derive(Debug, Default)]
pub struct VirtualPage {
    offset: f64,
}

impl ScrollSink for VirtualPage {
    fn scroll_offset(&self) -> f64 {
        self.offset
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        self.offset = offset.max(0.0);
        debug!("Virtual page offset {:.1}", self.offset);
    }
}

/// Main application struct
pub struct ScrollApp {
    config: AppConfig,
    session: TrackingSession<Box<dyn ScrollSink>, LogFeedback>,
}

impl ScrollApp {
    /// Create the application and its scroll output
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid. A failing X11
    /// connection falls back to the virtual page.
    pub fn new(config: AppConfig) -> Result<Self> {
        info!("Initializing Head Scroll application");
        config.config.validate()?;

        let sink: Box<dyn ScrollSink> = match config.sink {
            SinkKind::X11 => match X11WheelSink::connect(config.config.wheel.pixels_per_notch) {
                Ok(sink) => {
                    info!("X11 wheel scrolling initialized");
                    Box::new(sink)
                }
                Err(e) => {
                    warn!("Failed to initialize wheel scrolling: {}", e);
                    Box::new(VirtualPage::default())
                }
            },
            SinkKind::Virtual => Box::new(VirtualPage::default()),
        };

        let session = TrackingSession::new(
            &config.config.tracking_config(),
            sink,
            LogFeedback,
            config.config.settings.sanitized(),
        );

        Ok(Self { config, session })
    }

    /// Open the configured frame input
    ///
    /// # Errors
    ///
    /// Returns the source's error, or `Error::CameraTimeout` when the camera is
    /// not ready in time
    pub fn open_source(&self) -> Result<Box<dyn FrameSource>> {
        match &self.config.input {
            FrameInput::Replay { dir, looping } => {
                Ok(Box::new(ImageSequenceSource::from_dir(dir)?.looping(*looping)))
            }
            FrameInput::Camera(index) => self.open_camera(*index),
        }
    }

    #[cfg(feature = "camera")]
    fn open_camera(&self, index: i32) -> Result<Box<dyn FrameSource>> {
        use crate::{camera::CameraSource, capture::acquire_source};

        let camera = &self.config.config.camera;
        let (width, height) = (camera.width, camera.height);
        let source = acquire_source(
            move || CameraSource::open(index, width, height),
            Duration::from_millis(camera.open_timeout_ms),
        )?;
        Ok(Box::new(source))
    }

    #[cfg(not(feature = "camera"))]
    fn open_camera(&self, index: i32) -> Result<Box<dyn FrameSource>> {
        Err(crate::Error::Camera(format!(
            "camera {index} requested but this build has no `camera` feature"
        )))
    }

    /// Run the refresh loop until the input ends or the frame limit is hit
    ///
    /// # Errors
    ///
    /// Returns an error if the frame input cannot be opened
    pub fn run(&mut self) -> Result<SessionStats> {
        let source = self.open_source().inspect_err(log_open_failure)?;
        self.session.start(source);

        let interval = self.config.config.refresh_interval();
        info!("Entering refresh loop at {:?} per frame", interval);

        let mut refreshes = 0u64;
        let mut next = Instant::now();
        loop {
            match self.session.on_refresh(Instant::now()) {
                TickOutcome::SourceClosed => {
                    info!("End of frames reached");
                    break;
                }
                TickOutcome::Stopped => break,
                _ => {}
            }

            refreshes += 1;
            if self.config.max_frames.is_some_and(|max| refreshes >= max) {
                info!("Frame limit of {} reached", refreshes);
                break;
            }
            next = pace(next, interval);
        }

        // Let the last scroll land before releasing everything
        while self.session.animate(Instant::now()) {
            next = pace(next, interval);
        }

        let stats = self.session.stats();
        self.session.stop();
        info!(
            "Application shutting down, page offset {:.1}",
            self.session.scroller().sink().scroll_offset()
        );
        Ok(stats)
    }
}

/// Sleep until the next refresh slot; a late loop does not try to catch up
fn pace(next: Instant, interval: Duration) -> Instant {
    let next = next + interval;
    let now = Instant::now();
    if next > now {
        thread::sleep(next - now);
        next
    } else {
        now
    }
}
