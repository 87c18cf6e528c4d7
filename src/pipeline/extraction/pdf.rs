use super::types::DocumentExtractor;
use super::ExtractionError;

/// PDF text extractor using the pdf-extract crate.
/// Handles digital PDFs with embedded text layers; scanned pages come back empty.
pub struct PdfTextExtractor;

impl PdfTextExtractor {
    /// Extract text per page, in page order.
    pub fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        // pdf-extract panics on some malformed font tables instead of erroring.
        let outcome = std::panic::catch_unwind(|| {
            pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
        });

        match outcome {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(ExtractionError::PdfParsing(e.to_string())),
            Err(_) => Err(ExtractionError::PdfParsing(
                "PDF parser aborted on malformed content".into(),
            )),
        }
    }
}

impl DocumentExtractor for PdfTextExtractor {
    fn extract(&self, pdf_bytes: &[u8]) -> Result<String, ExtractionError> {
        let pages = self.extract_pages(pdf_bytes)?;
        let page_count = pages.len();
        let text = pages.concat();

        tracing::debug!(
            pages = page_count,
            chars = text.len(),
            "Extracted text from PDF"
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_are_a_parsing_error() {
        let extractor = PdfTextExtractor;
        let err = extractor.extract(b"%PDF-1.4\nthis is not a pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::PdfParsing(_)));
    }

    #[test]
    fn empty_input_is_a_parsing_error() {
        let extractor = PdfTextExtractor;
        assert!(extractor.extract(&[]).is_err());
    }
}
