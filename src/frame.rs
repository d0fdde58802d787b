//! Camera frames and the sources that deliver them.

use crate::{constants::RGBA_CHANNELS, Error, Result};

/// One captured video frame as tightly packed RGBA bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Frame {
    /// Create a frame, checking that the buffer covers every pixel
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFrame` if `data` is not `width * height * 4` bytes long
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = Self::buffer_len(width, height)?;
        if data.len() != expected {
            return Err(Error::InvalidFrame(format!(
                "{width}x{height} frame needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Create a frame filled with a single color
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidFrame` if the dimensions overflow
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let len = Self::buffer_len(width, height)?;
        let data = rgba.iter().copied().cycle().take(len).collect();
        Ok(Self { width, height, data })
    }

    fn buffer_len(width: u32, height: u32) -> Result<usize> {
        (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(RGBA_CHANNELS))
            .ok_or_else(|| Error::InvalidFrame(format!("{width}x{height} is too large")))
    }

    /// Frame width in pixels
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Frame height in pixels
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA bytes, row-major
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGB channels of the pixel at (x, y), if inside the frame
    #[must_use]
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS;
        let px = self.data.get(idx..idx + 3)?;
        Some((px[0], px[1], px[2]))
    }

    /// Paint an axis-aligned rectangle (half-open ranges, clipped to the frame)
    pub fn fill_rect(&mut self, x0: u32, y0: u32, x1: u32, y1: u32, rgba: [u8; 4]) {
        let x1 = x1.min(self.width);
        let y1 = y1.min(self.height);
        for y in y0..y1 {
            for x in x0..x1 {
                let idx = (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS;
                self.data[idx..idx + RGBA_CHANNELS].copy_from_slice(&rgba);
            }
        }
    }
}

/// Anything that can hand the tracking loop its latest frame
///
/// Implementations release their device when dropped.
pub trait FrameSource {
    /// Fetch the most recent frame
    ///
    /// # Errors
    ///
    /// `Error::SourceClosed` once no frame will ever arrive again; any other
    /// error only means this tick has no frame.
    fn next_frame(&mut self) -> Result<Frame>;

    /// Human readable description for logs
    fn describe(&self) -> String;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Frame> {
        (**self).next_frame()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Frame source backed by an in-memory list, used for scripted runs
pub struct FrameQueue {
    frames: std::collections::VecDeque<Result<Frame>>,
}

impl FrameQueue {
    /// Create an empty queue
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: std::collections::VecDeque::new(),
        }
    }

    /// Queue a frame
    pub fn push(&mut self, frame: Frame) {
        self.frames.push_back(Ok(frame));
    }

    /// Queue a delivery failure
    pub fn push_error(&mut self, error: Error) {
        self.frames.push_back(Err(error));
    }

    /// Number of pending deliveries
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether every delivery has been consumed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl Default for FrameQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Frame> for FrameQueue {
    fn from_iter<I: IntoIterator<Item = Frame>>(iter: I) -> Self {
        Self {
            frames: iter.into_iter().map(Ok).collect(),
        }
    }
}

impl FrameSource for FrameQueue {
    fn next_frame(&mut self) -> Result<Frame> {
        self.frames.pop_front().unwrap_or(Err(Error::SourceClosed))
    }

    fn describe(&self) -> String {
        format!("frame queue ({} pending)", self.frames.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_rejects_short_buffer() {
        let result = Frame::new(4, 4, vec![0; 10]);
        assert!(matches!(result, Err(Error::InvalidFrame(_))));
    }

    #[test]
    fn test_filled_frame_and_pixel_access() {
        let mut frame = Frame::filled(8, 6, [1, 2, 3, 255]).unwrap();
        assert_eq!(frame.data().len(), 8 * 6 * 4);
        assert_eq!(frame.rgb_at(7, 5), Some((1, 2, 3)));
        assert_eq!(frame.rgb_at(8, 0), None);

        frame.fill_rect(2, 2, 100, 100, [200, 100, 50, 255]);
        assert_eq!(frame.rgb_at(1, 1), Some((1, 2, 3)));
        assert_eq!(frame.rgb_at(7, 5), Some((200, 100, 50)));
    }

    #[test]
    fn test_frame_queue_closes_when_drained() {
        let mut queue: FrameQueue = std::iter::once(Frame::filled(2, 2, [0; 4]).unwrap()).collect();
        queue.push_error(Error::FrameUnavailable("dropped".to_string()));

        assert!(queue.next_frame().is_ok());
        assert!(matches!(queue.next_frame(), Err(Error::FrameUnavailable(_))));
        assert!(matches!(queue.next_frame(), Err(Error::SourceClosed)));
        assert!(queue.is_empty());
    }
}
