//! Document text extraction — turns an uploaded resume into plain text.
//!
//! `AppState` holds an `Arc<dyn DocumentExtractor>`; the default backend is
//! `ResumeTextExtractor` (PDF via `pdf-extract`, DOCX via `zip` + `quick-xml`,
//! otherwise UTF-8 text).

use std::io::{Cursor, Read};

use async_trait::async_trait;
use bytes::Bytes;
use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;

/// Below this many characters (after trimming) a document is treated as image-only
/// or corrupted.
pub const MIN_EXTRACTED_CHARS: usize = 200;

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
/// The archive entry holding the body text of a Word document.
const DOCX_BODY_PART: &str = "word/document.xml";
const UTF8_BOM: char = '\u{feff}';

/// A file received from the client. Lives for a single request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn looks_like_pdf(&self) -> bool {
        self.bytes.starts_with(PDF_MAGIC)
            || self
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.eq_ignore_ascii_case("application/pdf"))
            || self
                .file_name
                .as_deref()
                .is_some_and(|name| name.to_ascii_lowercase().ends_with(".pdf"))
    }

    fn looks_like_docx(&self) -> bool {
        self.bytes.starts_with(ZIP_MAGIC)
            || self
                .content_type
                .as_deref()
                .is_some_and(|ct| ct.eq_ignore_ascii_case(DOCX_CONTENT_TYPE))
            || self
                .file_name
                .as_deref()
                .is_some_and(|name| name.to_ascii_lowercase().ends_with(".docx"))
    }
}

/// Every way extraction can fail. All of them mean "unprocessable document" to callers.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to parse file: {0}")]
    Unreadable(String),

    #[error(
        "Extracted text is too short ({chars} chars, need 200). This might be an image-only resume or a corrupted file."
    )]
    TooShort { chars: usize },
}

/// Turns an uploaded document into plain text. Implement this to add formats
/// without touching the handler.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract_text(&self, document: &UploadedDocument) -> Result<String, ExtractionError>;
}

/// Default extractor: PDFs through `pdf-extract`, Word documents through their
/// `word/document.xml` part, anything else must be UTF-8 text.
pub struct ResumeTextExtractor;

#[async_trait]
impl DocumentExtractor for ResumeTextExtractor {
    async fn extract_text(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        let text = if document.looks_like_pdf() {
            extract_pdf(document.bytes.clone()).await?
        } else if document.looks_like_docx() {
            extract_docx(document.bytes.clone()).await?
        } else {
            decode_plain_text(document)?
        };

        ensure_enough_text(text)
    }
}

/// PDF decoding is CPU-bound, so it runs on the blocking pool. A panic inside the
/// decoder surfaces as a join error and is reported as unreadable.
async fn extract_pdf(bytes: Bytes) -> Result<String, ExtractionError> {
    debug!("Extracting text from PDF ({} bytes)", bytes.len());
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ExtractionError::Unreadable(format!("PDF decoder aborted: {e}")))?
        .map_err(|e| ExtractionError::Unreadable(format!("{e:?}")))
}

async fn extract_docx(bytes: Bytes) -> Result<String, ExtractionError> {
    debug!("Extracting text from DOCX ({} bytes)", bytes.len());
    tokio::task::spawn_blocking(move || read_docx_text(&bytes))
        .await
        .map_err(|e| ExtractionError::Unreadable(format!("DOCX decoder aborted: {e}")))?
}

fn read_docx_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Unreadable(format!("Not a DOCX archive: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name(DOCX_BODY_PART)
        .map_err(|e| ExtractionError::Unreadable(format!("Missing {DOCX_BODY_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Unreadable(format!("Failed to read {DOCX_BODY_PART}: {e}")))?;

    docx_body_text(&xml)
}

/// Walks the WordprocessingML body: text runs (`w:t`) are concatenated per
/// paragraph (`w:p`), and paragraphs become lines.
fn docx_body_text(xml: &str) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut lines = Vec::new();
    let mut paragraph = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"w:t" => in_text = true,
                b"w:p" => paragraph.clear(),
                _ => {}
            },
            Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"w:p" => lines.push(String::new()),
                b"w:tab" => paragraph.push('\t'),
                b"w:br" | b"w:cr" => paragraph.push('\n'),
                _ => {}
            },
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => lines.push(std::mem::take(&mut paragraph)),
                _ => {}
            },
            Ok(Event::Text(e)) if in_text => {
                let text = e.unescape().map_err(|e| {
                    ExtractionError::Unreadable(format!("Invalid text in {DOCX_BODY_PART}: {e}"))
                })?;
                paragraph.push_str(&text);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ExtractionError::Unreadable(format!(
                    "Invalid XML in {DOCX_BODY_PART} at position {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

fn decode_plain_text(document: &UploadedDocument) -> Result<String, ExtractionError> {
    let text = std::str::from_utf8(&document.bytes).map_err(|_| {
        ExtractionError::UnsupportedFormat(
            document
                .content_type
                .clone()
                .or_else(|| document.file_name.clone())
                .unwrap_or_else(|| "binary data".to_string()),
        )
    })?;
    Ok(text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string())
}

fn ensure_enough_text(text: String) -> Result<String, ExtractionError> {
    let chars = text.trim().chars().count();
    if chars < MIN_EXTRACTED_CHARS {
        return Err(ExtractionError::TooShort { chars });
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(name: Option<&str>, content_type: Option<&str>, bytes: &[u8]) -> UploadedDocument {
        UploadedDocument {
            file_name: name.map(String::from),
            content_type: content_type.map(String::from),
            bytes: Bytes::copy_from_slice(bytes),
        }
    }

    fn long_text() -> String {
        "Experienced backend engineer. ".repeat(10)
    }

    /// An in-memory zip archive with the given entries, stored uncompressed.
    fn zip_archive(entries: &[(&str, &str)]) -> Vec<u8> {
        use std::io::Write;

        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (name, contents) in entries {
            writer.start_file(*name, options).unwrap();
            writer.write_all(contents.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    fn word_document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        )
    }

    #[tokio::test]
    async fn test_plain_text_is_returned_untrimmed() {
        let body = format!("\n  {}  \n", long_text());
        let doc = document(Some("resume.txt"), Some("text/plain"), body.as_bytes());

        let text = ResumeTextExtractor.extract_text(&doc).await.unwrap();
        assert_eq!(text, body);
    }

    #[tokio::test]
    async fn test_bom_is_stripped() {
        let body = format!("\u{feff}{}", long_text());
        let doc = document(Some("resume.md"), None, body.as_bytes());

        let text = ResumeTextExtractor.extract_text(&doc).await.unwrap();
        assert_eq!(text, long_text());
    }

    #[tokio::test]
    async fn test_short_text_is_rejected() {
        let body = format!("   {}   ", "x".repeat(199));
        let doc = document(Some("resume.txt"), None, body.as_bytes());

        let err = ResumeTextExtractor.extract_text(&doc).await.unwrap_err();
        assert!(matches!(err, ExtractionError::TooShort { chars: 199 }));
    }

    #[tokio::test]
    async fn test_exactly_200_chars_is_accepted() {
        let body = "y".repeat(MIN_EXTRACTED_CHARS);
        let doc = document(None, None, body.as_bytes());
        assert!(ResumeTextExtractor.extract_text(&doc).await.is_ok());
    }

    #[tokio::test]
    async fn test_binary_data_is_unsupported() {
        let doc = document(Some("photo.png"), Some("image/png"), &[0x89, b'P', b'N', b'G', 0xff, 0xfe]);

        let err = ResumeTextExtractor.extract_text(&doc).await.unwrap_err();
        match err {
            ExtractionError::UnsupportedFormat(what) => assert_eq!(what, "image/png"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_corrupt_pdf_is_unreadable() {
        let doc = document(Some("resume.pdf"), Some("application/pdf"), b"%PDF-1.7 not really a pdf");

        let err = ResumeTextExtractor.extract_text(&doc).await.unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::Unreadable(_) | ExtractionError::TooShort { .. }
        ));
    }

    #[tokio::test]
    async fn test_docx_paragraphs_become_lines() {
        let xml = word_document(&format!(
            "<w:p><w:r><w:t>Jordan Lee</w:t></w:r></w:p>\
             <w:p><w:r><w:t xml:space=\"preserve\">Skills: Rust </w:t></w:r><w:r><w:t>&amp; Go</w:t></w:r></w:p>\
             <w:p/>\
             <w:p><w:r><w:t>{}</w:t></w:r></w:p>",
            long_text()
        ));
        let bytes = zip_archive(&[("[Content_Types].xml", "<Types/>"), (DOCX_BODY_PART, &xml)]);
        let doc = document(Some("resume.docx"), Some(DOCX_CONTENT_TYPE), &bytes);

        let text = ResumeTextExtractor.extract_text(&doc).await.unwrap();
        assert_eq!(text, format!("Jordan Lee\nSkills: Rust & Go\n\n{}", long_text()));
    }

    #[tokio::test]
    async fn test_docx_is_detected_by_content_alone() {
        let xml = word_document(&format!("<w:p><w:r><w:t>{}</w:t></w:r></w:p>", long_text()));
        let bytes = zip_archive(&[(DOCX_BODY_PART, &xml)]);
        let doc = document(None, Some("application/octet-stream"), &bytes);

        let text = ResumeTextExtractor.extract_text(&doc).await.unwrap();
        assert_eq!(text, long_text());
    }

    #[tokio::test]
    async fn test_zip_without_word_body_is_unreadable() {
        let bytes = zip_archive(&[("notes.txt", "not a word document")]);
        let doc = document(Some("resume.docx"), None, &bytes);

        let err = ResumeTextExtractor.extract_text(&doc).await.unwrap_err();
        assert!(matches!(err, ExtractionError::Unreadable(_)));
    }

    #[tokio::test]
    async fn test_short_docx_is_rejected() {
        let xml = word_document("<w:p><w:r><w:t>Rust developer</w:t></w:r></w:p>");
        let bytes = zip_archive(&[(DOCX_BODY_PART, &xml)]);
        let doc = document(Some("resume.docx"), None, &bytes);

        let err = ResumeTextExtractor.extract_text(&doc).await.unwrap_err();
        assert!(matches!(err, ExtractionError::TooShort { chars: 14 }));
    }

    #[test]
    fn test_docx_detection() {
        assert!(document(None, None, b"PK\x03\x04rest").looks_like_docx());
        assert!(document(Some("CV.DOCX"), None, b"").looks_like_docx());
        assert!(document(None, Some(DOCX_CONTENT_TYPE), b"").looks_like_docx());
        assert!(!document(Some("cv.txt"), Some("text/plain"), b"hello").looks_like_docx());
    }

    #[test]
    fn test_pdf_detection() {
        assert!(document(None, None, b"%PDF-1.4").looks_like_pdf());
        assert!(document(Some("CV.PDF"), None, b"").looks_like_pdf());
        assert!(document(None, Some("Application/PDF"), b"").looks_like_pdf());
        assert!(!document(Some("cv.txt"), Some("text/plain"), b"hello").looks_like_pdf());
    }
}
