// Document Loader
// Extracts plain text from .txt/.md, .docx and .pdf inputs

use docx_rs::{DocumentChild, ParagraphChild, RunChild};
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("failed to read docx: {0}")]
    Docx(String),
    #[error("failed to extract pdf text: {0}")]
    Pdf(String),
    #[error("unsupported file type: {0}")]
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Docx,
    Pdf,
}

impl DocumentKind {
    pub fn from_file_name(file_name: &str) -> Result<Self, DocumentError> {
        let ext = Path::new(file_name)
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "" | "txt" | "text" | "md" => Ok(DocumentKind::PlainText),
            "docx" => Ok(DocumentKind::Docx),
            "pdf" => Ok(DocumentKind::Pdf),
            other => Err(DocumentError::Unsupported(other.to_string())),
        }
    }
}

/// Extract text from raw file bytes, picking the format from the file name.
pub fn extract_text(file_name: &str, bytes: &[u8]) -> Result<String, DocumentError> {
    let text = match DocumentKind::from_file_name(file_name)? {
        DocumentKind::PlainText => String::from_utf8(bytes.to_vec())?,
        DocumentKind::Docx => extract_docx_text(bytes)?,
        DocumentKind::Pdf => pdf_extract::extract_text_from_mem(bytes)
            .map_err(|e| DocumentError::Pdf(e.to_string()))?,
    };
    info!(file = file_name, bytes = bytes.len(), chars = text.chars().count(), "document.extracted");
    Ok(text)
}

/// Read a document from disk
pub fn load_document(path: &Path) -> Result<String, DocumentError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    extract_text(&file_name, &bytes)
}

/// Word paragraphs are joined with blank lines so each one segments on its own.
fn extract_docx_text(bytes: &[u8]) -> Result<String, DocumentError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| DocumentError::Docx(e.to_string()))?;

    let mut paragraphs = Vec::new();
    for child in &docx.document.children {
        let DocumentChild::Paragraph(paragraph) = child else {
            continue;
        };
        let mut text = String::new();
        for p_child in &paragraph.children {
            if let ParagraphChild::Run(run) = p_child {
                for r_child in &run.children {
                    match r_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
        }
        paragraphs.push(text);
    }

    Ok(paragraphs.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(DocumentKind::from_file_name("policy.txt").unwrap(), DocumentKind::PlainText);
        assert_eq!(DocumentKind::from_file_name("POLICY.DOCX").unwrap(), DocumentKind::Docx);
        assert_eq!(DocumentKind::from_file_name("terms.pdf").unwrap(), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_file_name("README").unwrap(), DocumentKind::PlainText);
        assert!(matches!(
            DocumentKind::from_file_name("sheet.xlsx"),
            Err(DocumentError::Unsupported(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn test_plain_text_extraction() {
        let text = extract_text("policy.md", "We collect data.\n\n- cookies".as_bytes()).unwrap();
        assert_eq!(text, "We collect data.\n\n- cookies");
    }

    #[test]
    fn test_invalid_utf8_is_an_error() {
        let err = extract_text("policy.txt", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, DocumentError::Encoding(_)));
    }

    #[test]
    fn test_docx_roundtrip() {
        use docx_rs::{Docx, Paragraph, Run};

        let mut buf = std::io::Cursor::new(Vec::new());
        Docx::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("We collect your data.")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("We respect privacy.")))
            .build()
            .pack(&mut buf)
            .unwrap();

        let text = extract_text("policy.docx", buf.get_ref()).unwrap();
        assert_eq!(text, "We collect your data.\n\nWe respect privacy.");
    }
}
