use image::GrayImage;
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::separable_filter_equal;
use imageproc::morphology::{dilate, erode};

use crate::config::ScanConfig;
use crate::models::{EdgeMask, Frame};

/// Grayscale, blur, Canny, then dilate/erode to close gaps in the document outline.
///
/// The output always has the dimensions of the input frame.
pub fn extract_edges(frame: &Frame, config: &ScanConfig) -> EdgeMask {
    let gray = to_grayscale(frame);
    let blurred = apply_blur(&gray, config.blur_kernel, config.blur_sigma);
    let edges = detect_edges(&blurred, config.canny_low, config.canny_high);
    let dilated = dilate_n(&edges, config.morph_kernel, config.dilate_iterations);
    erode_n(&dilated, config.morph_kernel, config.erode_iterations)
}

/// Convert image to grayscale
pub fn to_grayscale(frame: &Frame) -> GrayImage {
    image::imageops::grayscale(frame)
}

/// Gaussian blur with a fixed odd kernel size
pub fn apply_blur(img: &GrayImage, kernel_size: usize, sigma: f32) -> GrayImage {
    separable_filter_equal(img, &gaussian_kernel(kernel_size, sigma))
}

/// Detect edges using Canny edge detector
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny(img, low_threshold, high_threshold)
}

/// Dilate `iterations` times with a `kernel_size`² all-ones structuring element
pub fn dilate_n(img: &GrayImage, kernel_size: u8, iterations: u32) -> GrayImage {
    let radius = kernel_size / 2;
    (0..iterations).fold(img.clone(), |acc, _| dilate(&acc, Norm::LInf, radius))
}

/// Erode `iterations` times with a `kernel_size`² all-ones structuring element
pub fn erode_n(img: &GrayImage, kernel_size: u8, iterations: u32) -> GrayImage {
    let radius = kernel_size / 2;
    (0..iterations).fold(img.clone(), |acc, _| erode(&acc, Norm::LInf, radius))
}

/// Normalized 1-D Gaussian taps
pub fn gaussian_kernel(size: usize, sigma: f32) -> Vec<f32> {
    let size = size.max(1) | 1;
    let center = (size / 2) as f32;
    let taps: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - center;
            (-(x * x) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f32 = taps.iter().sum();
    taps.into_iter().map(|t| t / sum).collect()
}
