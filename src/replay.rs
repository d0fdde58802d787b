//! Replay a directory of still images as a frame source.

use crate::{
    frame::{Frame, FrameSource},
    Error, Result,
};
use log::info;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Frame source that decodes one image file per tick, in file name order
#[derive(Debug)]
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    next: usize,
    looping: bool,
}

impl ImageSequenceSource {
    /// Collect every PNG/JPEG in `dir`
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory cannot be read, or
    /// `Error::InvalidInput` if it holds no images
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| is_image(path))
            .collect();
        paths.sort();

        if paths.is_empty() {
            return Err(Error::InvalidInput(format!("No images found in {}", dir.display())));
        }
        info!("Replaying {} frames from {}", paths.len(), dir.display());
        Ok(Self::from_paths(paths))
    }

    /// Replay the given files in order
    #[must_use]
    pub const fn from_paths(paths: Vec<PathBuf>) -> Self {
        Self {
            paths,
            next: 0,
            looping: false,
        }
    }

    /// Start over from the first image instead of closing at the end
    #[must_use]
    pub const fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }

    /// Number of images in the sequence
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the sequence is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Decode an image file into an RGBA frame
///
/// # Errors
///
/// Returns `Error::Image` if decoding fails
pub fn load_frame<P: AsRef<Path>>(path: P) -> Result<Frame> {
    let rgba = image::open(path)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    Frame::new(width, height, rgba.into_raw())
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Frame> {
        if self.next >= self.paths.len() {
            if !self.looping || self.paths.is_empty() {
                return Err(Error::SourceClosed);
            }
            self.next = 0;
        }
        let path = &self.paths[self.next];
        self.next += 1;
        load_frame(path)
    }

    fn describe(&self) -> String {
        format!("image sequence ({} frames)", self.paths.len())
    }
}
