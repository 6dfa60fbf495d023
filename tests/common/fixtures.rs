use std::path::{Path, PathBuf};

use docscan::Frame;
use image::{GrayImage, Luma, Rgb};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::point::Point;
use imageproc::rect::Rect;

pub const BACKGROUND: Rgb<u8> = Rgb([30, 30, 30]);
pub const PAPER: Rgb<u8> = Rgb([230, 230, 230]);

/// Black mask with one filled white square
pub fn binary_square(width: u32, height: u32, x0: i32, y0: i32, side: u32) -> GrayImage {
    let mut img = GrayImage::new(width, height);
    fill_square(&mut img, x0, y0, side);
    img
}

pub fn fill_square(img: &mut GrayImage, x0: i32, y0: i32, side: u32) {
    draw_filled_rect_mut(img, Rect::at(x0, y0).of_size(side, side), Luma([255u8]));
}

pub fn fill_circle(img: &mut GrayImage, center: (i32, i32), radius: i32) {
    draw_filled_circle_mut(img, center, radius, Luma([255u8]));
}

/// Camera-sized frame (480 wide, 640 tall) showing a bright sheet on a dark desk
pub fn document_frame() -> Frame {
    let mut frame = Frame::from_pixel(480, 640, BACKGROUND);
    draw_filled_rect_mut(&mut frame, Rect::at(80, 100).of_size(320, 440), PAPER);
    frame
}

/// Corners of the sheet in [`document_frame`], canonical order
pub fn document_corners() -> [Point<i32>; 4] {
    [
        Point::new(80, 100),
        Point::new(399, 100),
        Point::new(80, 539),
        Point::new(399, 539),
    ]
}

/// Camera-sized frame with nothing on it
pub fn empty_frame() -> Frame {
    Frame::from_pixel(480, 640, BACKGROUND)
}

/// Horizontal gradient so warped output is not uniform
pub fn gradient_frame(width: u32, height: u32) -> Frame {
    Frame::from_fn(width, height, |x, y| {
        Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 128])
    })
}

/// Write frames as numbered PNGs, returning their paths in order
pub fn write_frames(dir: &Path, frames: &[Frame]) -> Vec<PathBuf> {
    frames
        .iter()
        .enumerate()
        .map(|(i, frame)| {
            let path = dir.join(format!("frame_{:03}.png", i));
            frame.save(&path).expect("Failed to save test frame");
            path
        })
        .collect()
}

pub fn assert_near(actual: Point<i32>, expected: Point<i32>, tolerance: i32) {
    assert!(
        (actual.x - expected.x).abs() <= tolerance && (actual.y - expected.y).abs() <= tolerance,
        "expected {:?} within {} px of {:?}",
        actual,
        tolerance,
        expected
    );
}

/// Files in `dir` named like `Scan_HH_MM_SS.jpg`
pub fn saved_scans(dir: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("Failed to read output dir")
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(is_scan_name)
        })
        .collect();
    found.sort();
    found
}

fn is_scan_name(name: &str) -> bool {
    let Some(stamp) = name.strip_prefix("Scan_").and_then(|s| s.strip_suffix(".jpg")) else {
        return false;
    };
    let parts: Vec<&str> = stamp.split('_').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.chars().all(|c| c.is_ascii_digit()))
}
