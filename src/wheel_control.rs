//! Scroll control for X11-based systems.
//!
//! X11 has no notion of a page scroll offset, only wheel buttons. This sink
//! keeps a virtual offset and turns every change of it into whole wheel
//! notches injected through the XTEST extension, carrying the fractional
//! remainder over to the next change. The virtual offset is relative to where
//! the page was at connect time and may go negative; the real page clamps
//! itself.

use crate::{
    constants::{DEFAULT_PIXELS_PER_NOTCH, WHEEL_DOWN_BUTTON, WHEEL_UP_BUTTON},
    error::{Error, Result},
    smooth_scroll::ScrollSink,
    utils::safe_cast::f64_to_i32,
};
use log::{debug, info, warn};
use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{Window, BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT},
        xtest::ConnectionExt as _,
    },
    rust_connection::RustConnection,
    CURRENT_TIME,
};

/// Converts pixel distances into whole wheel notches
#[derive(Debug, Clone)]
pub struct WheelAccumulator {
    pixels_per_notch: f64,
    remainder: f64,
}

impl WheelAccumulator {
    /// Create an accumulator; non-positive notch sizes fall back to the default
    #[must_use]
    pub fn new(pixels_per_notch: f64) -> Self {
        let pixels_per_notch = if pixels_per_notch > 0.0 {
            pixels_per_notch
        } else {
            DEFAULT_PIXELS_PER_NOTCH
        };
        Self {
            pixels_per_notch,
            remainder: 0.0,
        }
    }

    /// Add a signed pixel distance, returning whole notches (positive = down)
    pub fn push(&mut self, delta: f64) -> i32 {
        if !delta.is_finite() {
            return 0;
        }
        let total = self.remainder + delta;
        let notches = (total / self.pixels_per_notch).trunc();
        self.remainder = notches.mul_add(-self.pixels_per_notch, total);
        f64_to_i32(notches).unwrap_or(0)
    }

    /// Pixels not yet turned into a notch
    #[must_use]
    pub const fn remainder(&self) -> f64 {
        self.remainder
    }
}

/// Virtual scroll offset of a wheel-driven page
#[derive(Debug, Clone)]
pub struct WheelPosition {
    offset: f64,
    wheel: WheelAccumulator,
}

impl WheelPosition {
    /// Start at offset 0
    #[must_use]
    pub fn new(pixels_per_notch: f64) -> Self {
        Self {
            offset: 0.0,
            wheel: WheelAccumulator::new(pixels_per_notch),
        }
    }

    /// Current virtual offset
    #[must_use]
    pub const fn offset(&self) -> f64 {
        self.offset
    }

    /// Move to `offset`, returning the notches that get there (positive = down)
    pub fn notches_for(&mut self, offset: f64) -> i32 {
        if !offset.is_finite() {
            return 0;
        }
        let notches = self.wheel.push(offset - self.offset);
        self.offset = offset;
        notches
    }
}

/// Scroll sink injecting wheel events on an X11 display
pub struct X11WheelSink {
    connection: RustConnection,
    root: Window,
    position: WheelPosition,
}

impl X11WheelSink {
    /// Connect to the default display
    ///
    /// # Errors
    ///
    /// Returns `Error::ScrollControl` if the display or the XTEST extension is unavailable
    pub fn connect(pixels_per_notch: f64) -> Result<Self> {
        info!("Initializing X11 wheel scrolling");

        let (connection, screen_num) = RustConnection::connect(None)
            .map_err(|e| Error::ScrollControl(format!("Failed to connect to X11: {e}")))?;

        let root = connection
            .setup()
            .roots
            .get(screen_num)
            .ok_or_else(|| Error::ScrollControl("Failed to get screen".to_string()))?
            .root;

        connection
            .xtest_get_version(2, 2)
            .map_err(|e| Error::ScrollControl(format!("Failed to query XTEST: {e}")))?
            .reply()
            .map_err(|e| Error::ScrollControl(format!("XTEST extension unavailable: {e}")))?;

        info!("Connected to X11 display, {pixels_per_notch}px per wheel notch");

        Ok(Self {
            connection,
            root,
            position: WheelPosition::new(pixels_per_notch),
        })
    }

    fn click(&self, button: u8) -> Result<()> {
        for event in [BUTTON_PRESS_EVENT, BUTTON_RELEASE_EVENT] {
            self.connection
                .xtest_fake_input(event, button, CURRENT_TIME, self.root, 0, 0, 0)
                .map_err(|e| Error::ScrollControl(format!("Failed to inject wheel event: {e}")))?;
        }
        Ok(())
    }

    /// Send `notches` wheel clicks, positive scrolls down
    ///
    /// # Errors
    ///
    /// Returns `Error::ScrollControl` if the events cannot be sent
    pub fn send_notches(&self, notches: i32) -> Result<()> {
        if notches == 0 {
            return Ok(());
        }
        let button = if notches > 0 { WHEEL_DOWN_BUTTON } else { WHEEL_UP_BUTTON };
        debug!("Sending {} wheel notches on button {button}", notches.unsigned_abs());

        for _ in 0..notches.unsigned_abs() {
            self.click(button)?;
        }
        self.connection
            .flush()
            .map_err(|e| Error::ScrollControl(format!("Failed to flush connection: {e}")))
    }
}

impl ScrollSink for X11WheelSink {
    fn scroll_offset(&self) -> f64 {
        self.position.offset()
    }

    fn set_scroll_offset(&mut self, offset: f64) {
        let notches = self.position.notches_for(offset);
        if let Err(e) = self.send_notches(notches) {
            warn!("{e}");
        }
    }
}
