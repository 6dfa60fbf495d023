use anyhow::{Context, Result};
use opencv::core::{CV_8UC3, Mat, Scalar};
use opencv::prelude::*;
use opencv::{highgui, videoio};
use tracing::{info, warn};

use super::{FrameSource, Preview};
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::models::Frame;

/// Webcam opened through OpenCV's video I/O; released when dropped
pub struct CameraSource {
    capture: videoio::VideoCapture,
    buffer: Mat,
}

impl CameraSource {
    /// Open `config.device_index` and request the configured size and brightness.
    ///
    /// Unsupported properties are not an error; the driver keeps its own values.
    pub fn open(config: &ScanConfig) -> Result<Self> {
        let mut capture = videoio::VideoCapture::new(config.device_index, videoio::CAP_ANY)
            .context("Failed to open camera")?;

        if !capture.is_opened()? {
            return Err(ScanError::Camera(format!(
                "device {} could not be opened",
                config.device_index
            ))
            .into());
        }

        let properties = [
            (videoio::CAP_PROP_FRAME_WIDTH, config.frame_width as f64),
            (videoio::CAP_PROP_FRAME_HEIGHT, config.frame_height as f64),
            (videoio::CAP_PROP_BRIGHTNESS, config.brightness),
        ];
        for (property, value) in properties {
            if !capture.set(property, value)? {
                warn!(property, value, "camera ignored property");
            }
        }

        info!(
            device = config.device_index,
            width = config.frame_width,
            height = config.frame_height,
            "camera opened"
        );

        Ok(Self {
            capture,
            buffer: Mat::default(),
        })
    }
}

impl FrameSource for CameraSource {
    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if !self.capture.read(&mut self.buffer)? || self.buffer.empty() {
            return Ok(None);
        }
        Ok(Some(bgr_mat_to_frame(&self.buffer)?))
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        if let Err(e) = self.capture.release() {
            warn!("failed to release camera: {}", e);
        } else {
            info!("camera released");
        }
    }
}

/// OpenCV HighGUI windows with `wait_key` polling
#[derive(Default)]
pub struct HighGuiPreview;

impl HighGuiPreview {
    pub fn new() -> Self {
        Self
    }
}

impl Preview for HighGuiPreview {
    fn show(&mut self, window: &str, image: &Frame) -> Result<()> {
        let mat = frame_to_bgr_mat(image)?;
        highgui::imshow(window, &mat)?;
        Ok(())
    }

    fn poll_key(&mut self) -> Result<Option<char>> {
        let key = highgui::wait_key(1)?;
        if key < 0 {
            return Ok(None);
        }
        Ok(char::from_u32((key & 0xFF) as u32))
    }
}

impl Drop for HighGuiPreview {
    fn drop(&mut self) {
        if let Err(e) = highgui::destroy_all_windows() {
            warn!("failed to close preview windows: {}", e);
        }
    }
}

fn bgr_mat_to_frame(mat: &Mat) -> Result<Frame> {
    let copy;
    let continuous = if mat.is_continuous() {
        mat
    } else {
        copy = mat.try_clone()?;
        &copy
    };

    let width = continuous.cols() as u32;
    let height = continuous.rows() as u32;
    let mut rgb: Vec<u8> = continuous.data_bytes()?.to_vec();
    for px in rgb.chunks_exact_mut(3) {
        px.swap(0, 2);
    }

    Frame::from_raw(width, height, rgb)
        .ok_or_else(|| ScanError::Camera("frame buffer has unexpected size".to_string()).into())
}

fn frame_to_bgr_mat(frame: &Frame) -> Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        frame.height() as i32,
        frame.width() as i32,
        CV_8UC3,
        Scalar::all(0.0),
    )?;

    let dst = mat.data_bytes_mut()?;
    for (out, px) in dst.chunks_exact_mut(3).zip(frame.pixels()) {
        out[0] = px[2];
        out[1] = px[1];
        out[2] = px[0];
    }
    Ok(mat)
}
