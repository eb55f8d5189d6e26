//! PDF to text conversion.

use crate::error::{ProviderError, ProviderResult};

/// Converts PDF bytes to plain text.
pub trait PdfTextExtractor: Send + Sync {
    /// Extracts the text layer of a PDF document.
    ///
    /// # Errors
    ///
    /// Returns a document error if the bytes are not a readable PDF.
    fn extract(&self, bytes: &[u8]) -> ProviderResult<String>;
}

/// [`PdfTextExtractor`] backed by the `pdf-extract` crate.
#[cfg(feature = "pdf")]
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtract;

#[cfg(feature = "pdf")]
impl PdfTextExtractor for PdfExtract {
    fn extract(&self, bytes: &[u8]) -> ProviderResult<String> {
        if !bytes.starts_with(b"%PDF") {
            return Err(ProviderError::document("not a PDF document").with_provider("pdf"));
        }

        // pdf-extract panics on some malformed inputs instead of returning an error.
        let result = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes));
        match result {
            Ok(Ok(text)) => {
                tracing::debug!(bytes = bytes.len(), chars = text.len(), "Extracted PDF text");
                Ok(text)
            }
            Ok(Err(e)) => Err(ProviderError::document(e.to_string()).with_provider("pdf")),
            Err(_) => Err(ProviderError::document("PDF parser panicked on malformed input")
                .with_provider("pdf")),
        }
    }
}

#[cfg(all(test, feature = "pdf"))]
mod tests {
    use super::*;
    use crate::error::ProviderErrorCode;

    #[test]
    fn rejects_non_pdf_bytes() {
        let err = PdfExtract.extract(b"<html>not a pdf</html>").unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::DocumentError);
        assert_eq!(err.provider(), Some("pdf"));
    }

    #[test]
    fn truncated_pdf_is_an_error() {
        let err = PdfExtract.extract(b"%PDF-1.4\n%garbage").unwrap_err();
        assert_eq!(err.code(), ProviderErrorCode::DocumentError);
    }
}
