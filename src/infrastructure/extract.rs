//! Raw text extraction from uploaded files.
//!
//! PDF extraction goes page by page through `lopdf` and inserts
//! `--- Page N ---` markers for the segmenter. When `lopdf` cannot load
//! the file, `pdf-extract` recovers the whole document as a single page.

use tracing::warn;

use crate::domain::{DocumentType, DomainError};

pub fn extract_text(doc_type: DocumentType, data: &[u8]) -> Result<String, DomainError> {
    match doc_type {
        DocumentType::Pdf => extract_pdf(data),
        DocumentType::Txt => extract_txt(data),
    }
}

fn extract_txt(data: &[u8]) -> Result<String, DomainError> {
    let content = match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => String::from_utf8_lossy(data).into_owned(),
    };

    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Err(DomainError::document_processing("Text file is empty"));
    }
    Ok(trimmed.to_string())
}

fn extract_pdf(data: &[u8]) -> Result<String, DomainError> {
    match extract_pdf_by_pages(data) {
        Ok(text) if !text.trim().is_empty() => return Ok(text),
        Ok(_) => {}
        Err(e) => warn!(error = %e, "page-wise PDF extraction failed, trying whole-document"),
    }

    let text = pdf_extract::extract_text_from_mem(data).map_err(|e| {
        DomainError::document_processing(format!("Failed to extract text from PDF: {e}"))
    })?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(DomainError::document_processing(
            "No text could be extracted from PDF",
        ));
    }
    Ok(trimmed.to_string())
}

fn extract_pdf_by_pages(data: &[u8]) -> Result<String, DomainError> {
    let doc = lopdf::Document::load_mem(data).map_err(|e| {
        DomainError::document_processing(format!("Failed to load PDF: {e}"))
    })?;

    let mut text = String::new();
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(page_text) if !page_text.trim().is_empty() => {
                text.push_str(&format!("\n\n--- Page {page_number} ---\n"));
                text.push_str(page_text.trim());
            }
            Ok(_) => {}
            Err(e) => {
                warn!(page = page_number, error = %e, "failed to extract text from page");
            }
        }
    }

    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_txt_utf8() {
        let text = extract_txt("  hola mundo  ".as_bytes()).unwrap();
        assert_eq!(text, "hola mundo");
    }

    #[test]
    fn test_extract_txt_latin1_is_lossy_not_fatal() {
        // 0xE9 is 'é' in Latin-1, invalid as UTF-8.
        let text = extract_txt(&[b'c', b'a', b'f', 0xE9]).unwrap();
        assert!(text.starts_with("caf"));
    }

    #[test]
    fn test_extract_txt_empty_fails() {
        let err = extract_txt(b"   \n ").unwrap_err();
        assert!(matches!(err, DomainError::DocumentProcessing(_)));
    }

    #[test]
    fn test_extract_pdf_garbage_fails() {
        let err = extract_text(DocumentType::Pdf, b"not a pdf at all").unwrap_err();
        assert!(matches!(err, DomainError::DocumentProcessing(_)));
    }
}
