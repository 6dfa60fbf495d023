mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from docscan for tests
pub use docscan::{
    DocumentScanner, Frame, HeadlessPreview, ImageSequence, QuadCorners, ScanConfig, ScanError,
    ScanSession,
};
