use std::path::PathBuf;

use anyhow::Result;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::capture::{FrameSource, Preview};
use crate::detection::{DocumentScanner, FrameScan};
use crate::error::ScanError;
use crate::models::Frame;

pub const RESULT_WINDOW: &str = "Result";
pub const WARPED_WINDOW: &str = "Warped";

pub const SAVE_KEY: char = 's';
pub const QUIT_KEY: char = 'q';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Stopped,
}

/// What a finished session did
#[derive(Debug, Clone, Default)]
pub struct SessionSummary {
    pub frames: usize,
    pub documents: usize,
    pub saved: Vec<PathBuf>,
}

/// Live capture loop: owns the frame source for its whole lifetime and keeps
/// the most recent rectified document for saving.
pub struct ScanSession<S: FrameSource, P: Preview> {
    scanner: DocumentScanner,
    source: S,
    preview: P,
    last_warped: Option<Frame>,
    summary: SessionSummary,
}

impl<S: FrameSource, P: Preview> ScanSession<S, P> {
    pub fn new(scanner: DocumentScanner, source: S, preview: P) -> Self {
        Self {
            scanner,
            source,
            preview,
            last_warped: None,
            summary: SessionSummary::default(),
        }
    }

    pub fn last_warped(&self) -> Option<&Frame> {
        self.last_warped.as_ref()
    }

    pub fn preview(&self) -> &P {
        &self.preview
    }

    /// One loop iteration: read, scan, display, then handle a key
    pub fn step(&mut self) -> Result<SessionState> {
        let Some(frame) = self.source.read_frame()? else {
            info!("frame read failed, stopping");
            return Ok(SessionState::Stopped);
        };

        let scan = self
            .scanner
            .scan_with_debug(&frame, self.summary.frames)?;
        self.summary.frames += 1;

        self.present(scan)?;

        match self.preview.poll_key()? {
            Some(SAVE_KEY) => match self.save() {
                Ok(path) => {
                    println!("Saving image! {}", path.display());
                    self.summary.saved.push(path);
                }
                Err(e) => match e.downcast_ref::<ScanError>() {
                    Some(ScanError::NoRectifiedFrame) => warn!("save skipped: {}", e),
                    _ => return Err(e),
                },
            },
            Some(QUIT_KEY) => {
                info!("quit requested");
                return Ok(SessionState::Stopped);
            }
            Some(other) => debug!(key = ?other, "ignoring key"),
            None => {}
        }

        Ok(SessionState::Running)
    }

    /// Display a scanned frame; a successful warp replaces the saved document,
    /// a frame without one leaves it untouched
    pub fn present(&mut self, scan: FrameScan) -> Result<()> {
        let composite = scan.composite();
        if let Some(warped) = scan.warped {
            self.summary.documents += 1;
            self.preview.show(WARPED_WINDOW, &warped)?;
            self.last_warped = Some(warped);
        }
        self.preview.show(RESULT_WINDOW, &composite)
    }

    pub fn scanner(&self) -> &DocumentScanner {
        &self.scanner
    }

    /// Loop until `q` or a failed read; the source is dropped (released) on return
    pub fn run(mut self) -> Result<SessionSummary> {
        info!("scan session started, press '{}' to save, '{}' to quit", SAVE_KEY, QUIT_KEY);
        while self.step()? == SessionState::Running {}

        info!(
            frames = self.summary.frames,
            documents = self.summary.documents,
            saved = self.summary.saved.len(),
            "scan session stopped"
        );
        Ok(self.summary)
    }

    /// Write the last rectified document as `Scan_HH_MM_SS.jpg` in the output directory
    pub fn save(&self) -> Result<PathBuf> {
        let warped = self.last_warped.as_ref().ok_or(ScanError::NoRectifiedFrame)?;
        let path = self
            .scanner
            .config
            .output_dir
            .join(scan_file_name(local_now()));

        warped.save(&path)?;
        Ok(path)
    }
}

/// `Scan_HH_MM_SS.jpg` for the given wall-clock time
pub fn scan_file_name(at: OffsetDateTime) -> String {
    format!(
        "Scan_{:02}_{:02}_{:02}.jpg",
        at.hour(),
        at.minute(),
        at.second()
    )
}

/// Local time, or UTC where the local offset cannot be determined
pub fn local_now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| {
        warn!("local time offset unavailable, using UTC");
        OffsetDateTime::now_utc()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::{Date, Month, PrimitiveDateTime, Time};

    fn at(hour: u8, minute: u8, second: u8) -> OffsetDateTime {
        let date = Date::from_calendar_date(2020, Month::October, 4).unwrap();
        let time = Time::from_hms(hour, minute, second).unwrap();
        PrimitiveDateTime::new(date, time).assume_utc()
    }

    #[test]
    fn file_name_uses_24_hour_clock() {
        assert_eq!(scan_file_name(at(21, 5, 9)), "Scan_21_05_09.jpg");
        assert_eq!(scan_file_name(at(0, 0, 0)), "Scan_00_00_00.jpg");
    }
}
