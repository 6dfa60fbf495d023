pub mod preprocessing;
pub mod contours;
pub mod corners;
pub mod warp;

use std::path::PathBuf;

use anyhow::Result;
use image::{DynamicImage, imageops};
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::models::{EdgeMask, Frame, QuadCorners};

/// Everything one pass over a frame produces
#[derive(Debug, Clone)]
pub struct FrameScan {
    /// Binary edge mask
    pub edges: EdgeMask,
    /// Copy of the input frame with the chosen corners marked
    pub annotated: Frame,
    /// Canonically ordered corners of the document, if one was found
    pub corners: Option<QuadCorners>,
    /// Rectified document, if one was found and the transform was solvable
    pub warped: Option<Frame>,
}

impl FrameScan {
    /// Edge mask and annotated frame side by side
    pub fn composite(&self) -> Frame {
        let edges = DynamicImage::ImageLuma8(self.edges.clone()).to_rgb8();
        hstack(&edges, &self.annotated)
    }
}

/// Edge extraction → contour search → corner ordering → perspective warp
pub struct DocumentScanner {
    pub config: ScanConfig,
    debug_dir: Option<PathBuf>,
}

impl DocumentScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            debug_dir: None,
        }
    }

    /// Save intermediate images of every scanned frame to `output_dir`.
    /// The directory must be empty or non-existent.
    pub fn with_debug(mut self, output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            if std::fs::read_dir(&output_dir)?.next().is_some() {
                return Err(ScanError::NotEmpty(output_dir).into());
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        self.debug_dir = Some(output_dir);
        Ok(self)
    }

    /// Run the full pipeline on one frame.
    ///
    /// A degenerate quadrilateral is treated like "no document": `corners` is
    /// kept for inspection but `warped` stays empty.
    pub fn scan(&self, frame: &Frame) -> FrameScan {
        let edges = preprocessing::extract_edges(frame, &self.config);
        let mut annotated = frame.clone();

        let corners = contours::locate_document(&edges, &mut annotated, &self.config)
            .map(|quad| corners::reorder(&quad));

        let warped = corners
            .as_ref()
            .and_then(|quad| self.warp_document(frame, quad));

        match &corners {
            Some(quad) => debug!(
                top_left = ?quad.top_left(),
                top_right = ?quad.top_right(),
                bottom_left = ?quad.bottom_left(),
                bottom_right = ?quad.bottom_right(),
                "document found"
            ),
            None => debug!("no document in frame"),
        }

        FrameScan {
            edges,
            annotated,
            corners,
            warped,
        }
    }

    /// Rectify `frame` using ordered corners; `None` when no transform exists
    pub fn warp_document(&self, frame: &Frame, corners: &QuadCorners) -> Option<Frame> {
        match warp::rectify(frame, corners, &self.config) {
            Ok(warped) => Some(warped),
            Err(e) => {
                warn!(corners = ?corners.points, "skipping frame: {}", e);
                None
            }
        }
    }

    /// Like [`scan`](Self::scan), also writing stage images when debug output is on
    pub fn scan_with_debug(&self, frame: &Frame, frame_index: usize) -> Result<FrameScan> {
        let result = self.scan(frame);

        if let Some(dir) = &self.debug_dir {
            let prefix = format!("{:04}", frame_index);
            frame.save(dir.join(format!("{}_00_input.png", prefix)))?;
            result.edges.save(dir.join(format!("{}_01_edges.png", prefix)))?;
            result.annotated.save(dir.join(format!("{}_02_contour.png", prefix)))?;
            if let Some(warped) = &result.warped {
                warped.save(dir.join(format!("{}_03_warped.png", prefix)))?;
            }
            info!(dir = %dir.display(), frame = frame_index, "debug images saved");
        }

        Ok(result)
    }
}

impl Default for DocumentScanner {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

/// Place two frames next to each other, top-aligned
pub fn hstack(left: &Frame, right: &Frame) -> Frame {
    let width = left.width() + right.width();
    let height = left.height().max(right.height());
    let mut canvas = Frame::new(width, height);
    imageops::replace(&mut canvas, left, 0, 0);
    imageops::replace(&mut canvas, right, left.width() as i64, 0);
    canvas
}
