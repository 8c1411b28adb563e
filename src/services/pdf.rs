// src/services/pdf.rs
//! Resume / job description text extraction from uploaded files

use tracing::{debug, warn};

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Empty file uploaded")]
    Empty,

    #[error("Unsupported file format: {0} (expected PDF or TXT)")]
    UnsupportedFormat(String),

    #[error("Could not extract text: {0}")]
    Unreadable(String),
}

/// Kind of document an upload is treated as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
}

/// Decide how to read an upload from its magic bytes, falling back to the extension
pub fn detect_kind(filename: &str, bytes: &[u8]) -> Result<DocumentKind, PdfError> {
    if infer::archive::is_pdf(bytes) {
        return Ok(DocumentKind::Pdf);
    }

    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => Ok(DocumentKind::Pdf),
        "txt" | "text" | "md" => Ok(DocumentKind::PlainText),
        "" => Err(PdfError::UnsupportedFormat("no extension".to_string())),
        other => Err(PdfError::UnsupportedFormat(other.to_string())),
    }
}

/// Extract plain text from an uploaded PDF or text file.
///
/// The result is trimmed and never empty.
pub fn extract_text(filename: &str, bytes: &[u8]) -> Result<String, PdfError> {
    if bytes.is_empty() {
        return Err(PdfError::Empty);
    }

    let text = match detect_kind(filename, bytes)? {
        DocumentKind::Pdf => extract_text_from_pdf(bytes)?,
        DocumentKind::PlainText => String::from_utf8_lossy(bytes).into_owned(),
    };

    let text = text.trim().to_string();
    if text.is_empty() {
        warn!(filename = %filename, "No text extracted from upload");
        return Err(PdfError::Unreadable(
            "document contains no extractable text".to_string(),
        ));
    }

    debug!(filename = %filename, chars = text.len(), "Extracted text from upload");
    Ok(text)
}

fn extract_text_from_pdf(pdf_bytes: &[u8]) -> Result<String, PdfError> {
    // pdf-extract panics on some malformed documents
    std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(pdf_bytes))
        .map_err(|_| PdfError::Unreadable("PDF parser aborted on malformed document".to_string()))?
        .map_err(|e| PdfError::Unreadable(format!("PDF extraction error: {}", e)))
}

/// Same as [`extract_text`], on the blocking pool
pub async fn extract_text_blocking(filename: String, bytes: bytes::Bytes) -> Result<String, PdfError> {
    tokio::task::spawn_blocking(move || extract_text(&filename, &bytes))
        .await
        .map_err(|e| PdfError::Unreadable(format!("extraction task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_upload_is_rejected() {
        assert!(matches!(extract_text("cv.pdf", b""), Err(PdfError::Empty)));
    }

    #[test]
    fn test_plain_text_upload() {
        let text = extract_text("cv.txt", b"  Jane Doe\nPython developer  \n").unwrap();
        assert_eq!(text, "Jane Doe\nPython developer");
    }

    #[test]
    fn test_whitespace_only_text_is_unreadable() {
        assert!(matches!(
            extract_text("cv.txt", b" \n\t "),
            Err(PdfError::Unreadable(_))
        ));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            extract_text("cv.docx", b"PK\x03\x04 not really a docx"),
            Err(PdfError::UnsupportedFormat(ext)) if ext == "docx"
        ));
    }

    #[test]
    fn test_pdf_magic_wins_over_extension() {
        let kind = detect_kind("resume.bin", b"%PDF-1.4\n%...").unwrap();
        assert_eq!(kind, DocumentKind::Pdf);
    }

    #[test]
    fn test_garbage_pdf_is_unreadable() {
        assert!(matches!(
            extract_text("cv.pdf", b"this is not a pdf at all"),
            Err(PdfError::Unreadable(_))
        ));
    }
}
