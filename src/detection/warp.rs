use image::{Rgb, imageops};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::debug;

use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::models::{Frame, QuadCorners};

/// Projective transform taking the ordered corners onto a `width` x `height` rectangle
pub fn perspective_transform(
    corners: &QuadCorners,
    width: u32,
    height: u32,
) -> Result<Projection, ScanError> {
    let (w, h) = (width as f32, height as f32);
    // Same corner order as `QuadCorners`: TL, TR, BL, BR
    let dest = [(0.0, 0.0), (w, 0.0), (0.0, h), (w, h)];

    Projection::from_control_points(corners.as_control_points(), dest)
        .ok_or(ScanError::DegenerateCorners)
}

/// Warp the frame so the document fills the configured rectangle, then crop the margin.
///
/// `corners` must already be in canonical order. The transform is rebuilt for
/// every call.
pub fn rectify(frame: &Frame, corners: &QuadCorners, config: &ScanConfig) -> Result<Frame, ScanError> {
    let (width, height) = (config.frame_width, config.frame_height);
    let projection = perspective_transform(corners, width, height)?;

    let mut warped = Frame::new(width, height);
    warp_into(frame, &projection, Interpolation::Bilinear, Rgb([0, 0, 0]), &mut warped);

    let cropped = crop_margin(&warped, config.crop_margin);
    debug!(
        width = cropped.width(),
        height = cropped.height(),
        "document rectified"
    );
    Ok(cropped)
}

/// Remove `margin` pixels from every side
pub fn crop_margin(frame: &Frame, margin: u32) -> Frame {
    let width = frame.width().saturating_sub(2 * margin);
    let height = frame.height().saturating_sub(2 * margin);
    imageops::crop_imm(frame, margin, margin, width, height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_removes_margin_on_all_sides() {
        let frame = Frame::new(100, 60);
        let cropped = crop_margin(&frame, 10);
        assert_eq!(cropped.dimensions(), (80, 40));
    }
}
