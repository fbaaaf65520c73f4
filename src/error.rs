use thiserror::Error;

/// Failures that abort a whole document.
///
/// Per-item problems (a bad link, a degenerate hotspot) never show up here;
/// they are recorded as [`crate::canvas::LayoutDefect`]s and layout carries on.
#[derive(Error, Debug)]
pub enum CvError {
    #[error("Failed to create PDF: {0}")]
    PdfError(String),
    #[error("Canvas state is corrupt: {0}")]
    CorruptState(String),
    #[error("Invalid layout configuration: {0}")]
    ConfigError(String),
    #[error("Failed to read profile: {0}")]
    ProfileError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
