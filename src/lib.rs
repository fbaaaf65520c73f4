//! cv-pdf: lay out a CV from structured profile data and write it as PDF.
//!
//! Layout works on a display list in points with a top-left origin
//! ([`canvas`]); [`pdf`] turns the finished pages into bytes.

pub mod builder;
pub mod canvas;
pub mod config;
pub mod contact;
pub mod dates;
pub mod error;
pub mod links;
pub mod metrics;
pub mod page_break;
pub mod pdf;
pub mod profile;
pub mod sections;
pub mod styled_run;

pub use builder::{layout_document, Document, DocumentInfo};
pub use config::{LayoutConfig, PaperSize};
pub use error::CvError;
pub use pdf::render_pdf;
pub use profile::ProfileData;

/// Builds the CV for `profile` with the default layout (A4, 50pt margins).
pub fn generate_cv_pdf(profile: &ProfileData) -> Result<Vec<u8>, CvError> {
    generate_cv_pdf_with(profile, &LayoutConfig::default())
}

pub fn generate_cv_pdf_with(profile: &ProfileData, config: &LayoutConfig) -> Result<Vec<u8>, CvError> {
    let document = layout_document(profile, config)?;
    render_pdf(&document)
}
