use super::types::DocumentExtractor;
use super::ExtractionError;

/// Plain-text reports: strict UTF-8 read, byte-order mark stripped.
pub struct PlainTextExtractor;

impl DocumentExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
        String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::EncodingError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_utf8_text() {
        let text = PlainTextExtractor
            .extract("Scope 1 emissions were 150,000 tCO2e.".as_bytes())
            .unwrap();
        assert_eq!(text, "Scope 1 emissions were 150,000 tCO2e.");
    }

    #[test]
    fn strips_byte_order_mark() {
        let text = PlainTextExtractor.extract(b"\xEF\xBB\xBFHello").unwrap();
        assert_eq!(text, "Hello");
    }

    #[test]
    fn empty_text_is_valid() {
        assert_eq!(PlainTextExtractor.extract(b"").unwrap(), "");
    }

    #[test]
    fn invalid_utf8_rejected() {
        let err = PlainTextExtractor.extract(&[0xff, 0xfe, 0x41]).unwrap_err();
        assert!(matches!(err, ExtractionError::EncodingError(_)));
    }
}
