//! Report text extraction.
//!
//! Turns an uploaded report (digital PDF or plain text) into the raw text the
//! audit runs over. Empty text is a valid result; only unreadable input fails.

pub mod types;
pub mod pdf;
pub mod text_only;
pub mod orchestrator;

pub use types::*;
pub use pdf::PdfTextExtractor;
pub use text_only::PlainTextExtractor;
pub use orchestrator::ReportExtractor;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("Text encoding error: {0}")]
    EncodingError(String),

    #[error("Unsupported format for extraction")]
    UnsupportedFormat,
}
