use std::path::Path;

use docqa_logging::{docqa_info, docqa_warn};

use crate::{EngineEvent, ExtractionError, ProgressSink};

pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// Text extraction backed by `pdf-extract`, with line cleanup.
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let raw = pdf_extract::extract_text_from_mem(bytes)
            .map_err(|err| ExtractionError::Pdf(err.to_string()))?;
        let cleaned = clean_text(&raw);
        if cleaned.is_empty() {
            return Err(ExtractionError::Empty);
        }
        Ok(cleaned)
    }
}

/// Reads `path` and extracts its text, reporting coarse progress.
pub fn extract_file(
    extractor: &dyn TextExtractor,
    path: &Path,
    sink: &dyn ProgressSink,
) -> Result<String, ExtractionError> {
    sink.emit(EngineEvent::ExtractionProgress { percent: 0 });
    let bytes = std::fs::read(path).map_err(|err| ExtractionError::Io(err.to_string()))?;
    sink.emit(EngineEvent::ExtractionProgress { percent: 50 });

    match extractor.extract(&bytes) {
        Ok(text) => {
            docqa_info!("extracted {} chars from {:?}", text.len(), path);
            sink.emit(EngineEvent::ExtractionProgress { percent: 100 });
            Ok(text)
        }
        Err(err) => {
            docqa_warn!("extraction failed for {:?}: {}", path, err);
            Err(err)
        }
    }
}

/// MIME type a file declares through its extension.
pub fn declared_mime_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("html") | Some("htm") => "text/html",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("docx") => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => "application/octet-stream",
    }
}

fn clean_text(text: &str) -> String {
    text.lines()
        .map(|line| line.trim().replace(['\u{0}', '\u{FEFF}'], ""))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
