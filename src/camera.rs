//! Webcam frame source on top of `OpenCV`.

use crate::{
    capture::classify_open_failure,
    frame::{Frame, FrameSource},
    utils::safe_cast::i32_to_u32,
    Error, Result,
};
use log::{info, warn};
use opencv::{
    core::Mat,
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture, CAP_PROP_BUFFERSIZE, CAP_PROP_FRAME_HEIGHT, CAP_PROP_FRAME_WIDTH},
};
use std::path::PathBuf;

/// Live webcam, released when dropped
pub struct CameraSource {
    index: i32,
    capture: VideoCapture,
    bgr: Mat,
}

impl CameraSource {
    /// Open camera `index`, asking for `width` x `height` frames
    ///
    /// # Errors
    ///
    /// Returns `Error::CameraNotFound` or `Error::CameraPermissionDenied` if the
    /// device cannot be opened, or an `OpenCV` error if configuring it fails
    pub fn open(index: i32, width: u32, height: u32) -> Result<Self> {
        info!("Opening camera {index}");
        let mut capture = VideoCapture::new(index, videoio::CAP_ANY)?;
        if !capture.is_opened()? {
            return Err(classify_open_failure(&PathBuf::from(format!("/dev/video{index}"))));
        }

        // The requested size is a hint, drivers pick the closest mode
        capture.set(CAP_PROP_FRAME_WIDTH, f64::from(width))?;
        capture.set(CAP_PROP_FRAME_HEIGHT, f64::from(height))?;
        // Reduce buffer size for lower latency
        capture.set(CAP_PROP_BUFFERSIZE, 1.0)?;

        Ok(Self {
            index,
            capture,
            bgr: Mat::default(),
        })
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Frame> {
        if !self.capture.read(&mut self.bgr)? || self.bgr.empty() {
            return Err(Error::FrameUnavailable(format!("camera {} returned no frame", self.index)));
        }

        let mut rgba = Mat::default();
        imgproc::cvt_color(&self.bgr, &mut rgba, imgproc::COLOR_BGR2RGBA, 0)?;

        let width = i32_to_u32(rgba.cols())?;
        let height = i32_to_u32(rgba.rows())?;
        Frame::new(width, height, rgba.data_bytes()?.to_vec())
    }

    fn describe(&self) -> String {
        format!("camera {}", self.index)
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            warn!("Failed to release camera {}: {e}", self.index);
        } else {
            info!("Camera {} released", self.index);
        }
    }
}
