pub mod capture;
pub mod config;
pub mod detection;
pub mod error;
pub mod models;
pub mod session;

pub use capture::{FrameSource, HeadlessPreview, ImageSequence, Preview};
pub use config::ScanConfig;
pub use detection::{DocumentScanner, FrameScan};
pub use error::ScanError;
pub use models::{Contour, EdgeMask, Frame, QuadCorners};
pub use session::{ScanSession, SessionState, SessionSummary};

#[cfg(feature = "camera")]
pub use capture::{CameraSource, HighGuiPreview};
