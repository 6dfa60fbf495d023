use std::path::PathBuf;

/// Parameters for one scanning session.
///
/// `frame_width` and `frame_height` are both the capture properties requested
/// from the camera and the destination rectangle of the perspective warp, in
/// that order.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub device_index: i32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub brightness: f64,

    pub blur_kernel: usize,
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
    pub morph_kernel: u8,
    pub dilate_iterations: u32,
    pub erode_iterations: u32,

    /// Contours enclosing this many pixels² or fewer are noise
    pub min_area: f64,
    /// Polygon approximation tolerance as a fraction of the perimeter
    pub approx_epsilon_ratio: f64,
    /// Pixels cropped from every side of the warped output
    pub crop_margin: u32,

    /// Where `Scan_HH_MM_SS.jpg` files are written
    pub output_dir: PathBuf,
}

impl ScanConfig {
    pub fn new() -> Self {
        Self {
            device_index: 1,
            frame_width: 480,
            frame_height: 640,
            brightness: 150.0,
            blur_kernel: 5,
            blur_sigma: 1.0,
            canny_low: 200.0,
            canny_high: 200.0,
            morph_kernel: 5,
            dilate_iterations: 2,
            erode_iterations: 1,
            min_area: 5000.0,
            approx_epsilon_ratio: 0.02,
            crop_margin: 10,
            output_dir: PathBuf::from("."),
        }
    }

    pub fn with_device(mut self, device_index: i32) -> Self {
        self.device_index = device_index;
        self
    }

    pub fn with_frame_size(mut self, width: u32, height: u32) -> Self {
        self.frame_width = width;
        self.frame_height = height;
        self
    }

    pub fn with_brightness(mut self, brightness: f64) -> Self {
        self.brightness = brightness;
        self
    }

    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.min_area = min_area;
        self
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Size of the rectified document after the margin crop
    pub fn output_size(&self) -> (u32, u32) {
        let margin = 2 * self.crop_margin;
        (
            self.frame_width.saturating_sub(margin),
            self.frame_height.saturating_sub(margin),
        )
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new()
    }
}
