use super::pdf::PdfTextExtractor;
use super::text_only::PlainTextExtractor;
use super::types::{detect_format, DocumentExtractor, DocumentFormat};
use super::ExtractionError;

/// Routes a report to the right extractor by its magic bytes.
#[derive(Default)]
pub struct ReportExtractor;

impl ReportExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentExtractor for ReportExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let format = detect_format(bytes);
        tracing::info!(
            format = format.as_str(),
            size_bytes = bytes.len(),
            "Extracting report text"
        );

        match format {
            DocumentFormat::Pdf => PdfTextExtractor.extract(bytes),
            DocumentFormat::PlainText => PlainTextExtractor.extract(bytes),
            DocumentFormat::Unsupported => Err(ExtractionError::UnsupportedFormat),
        }
    }
}
