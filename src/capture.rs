//! Frame source acquisition with a deadline.

use crate::{Error, Result};
use log::{error, info, warn};
use std::{io, path::Path, sync::mpsc, thread, time::Duration};

/// Open a frame source on a helper thread and wait at most `timeout` for it.
///
/// Opening a camera can block for a long time. When the deadline passes this
/// returns `Error::CameraTimeout`; if the opener finishes later, the source it
/// produced is dropped on the helper thread, which releases the device.
///
/// # Errors
///
/// Returns the opener's error, `Error::CameraTimeout` on deadline, or
/// `Error::Camera` if the opener panicked.
pub fn acquire_source<S, F>(open: F, timeout: Duration) -> Result<S>
where
    S: Send + 'static,
    F: FnOnce() -> Result<S> + Send + 'static,
{
    let (tx, rx) = mpsc::sync_channel(1);

    thread::Builder::new()
        .name("frame-source-open".to_string())
        .spawn(move || {
            let opened = open();
            if let Err(mpsc::SendError(late)) = tx.send(opened) {
                if late.is_ok() {
                    warn!("Frame source opened after the deadline; releasing it");
                }
            }
        })?;

    match rx.recv_timeout(timeout) {
        Ok(opened) => {
            if opened.is_ok() {
                info!("Frame source ready");
            }
            opened
        }
        Err(mpsc::RecvTimeoutError::Timeout) => Err(Error::CameraTimeout(timeout_ms(timeout))),
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            Err(Error::Camera("frame source opener exited without a result".to_string()))
        }
    }
}

fn timeout_ms(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// Work out why a video device refused to open by probing its device node
#[must_use]
pub fn classify_open_failure(device: &Path) -> Error {
    match std::fs::File::open(device) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Error::CameraNotFound(device.display().to_string()),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => Error::CameraPermissionDenied,
        Err(e) => Error::Camera(format!("{}: {e}", device.display())),
        Ok(_) => Error::Camera(format!("{} exists but could not be opened", device.display())),
    }
}

/// Log what the user can do about a source that failed to open
pub fn log_open_failure(error: &Error) {
    match error {
        Error::CameraPermissionDenied => {
            error!("Camera permission denied. Make sure your user may read the video device (usually the `video` group)");
        }
        Error::CameraNotFound(device) => {
            error!("No camera found at {device}. Connect a camera or replay frames with --frames");
        }
        Error::CameraTimeout(ms) => {
            error!("Camera did not start within {ms} ms. Another program may be holding it");
        }
        other => error!("Could not open frame source: {other}"),
    }
}
