use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Broad report formats we handle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentFormat {
    Pdf,
    PlainText,
    Unsupported,
}

impl DocumentFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::PlainText => "plain_text",
            Self::Unsupported => "unsupported",
        }
    }
}

/// Detect format from magic bytes, not file names.
pub fn detect_format(bytes: &[u8]) -> DocumentFormat {
    if bytes.starts_with(b"%PDF") {
        return DocumentFormat::Pdf;
    }

    // Text if the head is valid UTF-8 without NUL bytes. A multi-byte char cut
    // at the probe boundary is still text.
    let head = &bytes[..bytes.len().min(1024)];
    let utf8_ok = match std::str::from_utf8(head) {
        Ok(_) => true,
        Err(e) => e.error_len().is_none(),
    };
    if utf8_ok && !head.contains(&0) {
        DocumentFormat::PlainText
    } else {
        DocumentFormat::Unsupported
    }
}

/// Converts a source document into raw text.
pub trait DocumentExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_detected_by_magic_bytes() {
        assert_eq!(detect_format(b"%PDF-1.7\n..."), DocumentFormat::Pdf);
    }

    #[test]
    fn utf8_text_detected() {
        assert_eq!(
            detect_format("Scope 1 émissions: 150 000 tCO2e".as_bytes()),
            DocumentFormat::PlainText
        );
    }

    #[test]
    fn empty_input_is_plain_text() {
        assert_eq!(detect_format(b""), DocumentFormat::PlainText);
    }

    #[test]
    fn binary_input_unsupported() {
        assert_eq!(
            detect_format(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00]),
            DocumentFormat::Unsupported
        );
    }

    #[test]
    fn format_as_str() {
        assert_eq!(DocumentFormat::Pdf.as_str(), "pdf");
        assert_eq!(DocumentFormat::PlainText.as_str(), "plain_text");
    }
}
