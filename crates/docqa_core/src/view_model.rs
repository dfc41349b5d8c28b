use crate::{QueryAnswer, Status};

/// Characters of extracted text shown in the preview.
pub const PREVIEW_CHARS: usize = 300;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub status: Status,
    pub file_name: Option<String>,
    pub text_preview: Option<String>,
    pub upload_progress: u8,
    pub processing_progress: u8,
    pub processing_stage: String,
    pub processing: bool,
    pub query: String,
    pub querying: bool,
    pub can_query: bool,
    pub result: Option<QueryAnswer>,
    pub error: Option<String>,
    pub dirty: bool,
}

pub(crate) fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
