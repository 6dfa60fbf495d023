#[cfg(feature = "camera")]
pub mod camera;

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use anyhow::Result;
use image::ImageReader;
use tracing::{debug, info};

use crate::models::Frame;

#[cfg(feature = "camera")]
pub use camera::{CameraSource, HighGuiPreview};

/// Source of color frames
pub trait FrameSource {
    /// Next frame, or `None` once the source can no longer deliver one
    fn read_frame(&mut self) -> Result<Option<Frame>>;
}

/// On-screen (or recorded) output plus keyboard polling
pub trait Preview {
    fn show(&mut self, window: &str, image: &Frame) -> Result<()>;

    /// Key pressed since the last poll, if any
    fn poll_key(&mut self) -> Result<Option<char>>;
}

/// Replays the images of a directory, in file name order, as frames
pub struct ImageSequence {
    paths: VecDeque<PathBuf>,
}

impl ImageSequence {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_image(path))
            .collect();
        paths.sort();

        info!(dir = %dir.display(), frames = paths.len(), "image sequence opened");
        Ok(Self {
            paths: paths.into(),
        })
    }

    pub fn from_paths(paths: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            paths: paths.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.paths.len()
    }
}

impl FrameSource for ImageSequence {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        let Some(path) = self.paths.pop_front() else {
            return Ok(None);
        };

        debug!(path = %path.display(), "reading frame");
        let img = ImageReader::open(&path)?
            .decode()
            .map_err(|e| anyhow::anyhow!("Failed to decode {}: {}", path.display(), e))?;
        Ok(Some(img.to_rgb8()))
    }
}

fn is_image(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("png" | "jpg" | "jpeg" | "bmp" | "tif" | "tiff")
    )
}

/// Preview that draws nothing.
///
/// Remembers the last image per window and hands out keys from a script,
/// one per poll.
#[derive(Default)]
pub struct HeadlessPreview {
    keys: VecDeque<Option<char>>,
    pub shown: Vec<(String, Frame)>,
}

impl HeadlessPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys to report on successive polls; `None` entries mean "no key"
    pub fn with_keys(keys: impl IntoIterator<Item = Option<char>>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            shown: Vec::new(),
        }
    }

    pub fn last_shown(&self, window: &str) -> Option<&Frame> {
        self.shown
            .iter()
            .rev()
            .find(|(name, _)| name == window)
            .map(|(_, image)| image)
    }

    pub fn count_shown(&self, window: &str) -> usize {
        self.shown.iter().filter(|(name, _)| name == window).count()
    }
}

impl Preview for HeadlessPreview {
    fn show(&mut self, window: &str, image: &Frame) -> Result<()> {
        self.shown.push((window.to_string(), image.clone()));
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<char>> {
        Ok(self.keys.pop_front().flatten())
    }
}
