use std::path::PathBuf;

use crate::view_model::{preview, AppViewModel};

/// The only MIME type accepted for upload.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Session status. Exactly one holds at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    /// Waiting for the initial `/stats` answer.
    #[default]
    Loading,
    /// The backend holds indexed content; queries are allowed.
    Ready,
    /// The backend has nothing indexed; a document must be uploaded first.
    NeedsUpload,
    /// The backend was unreachable at startup. Terminal for the session.
    Error,
}

/// A document chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub declared_type: String,
    pub path: PathBuf,
}

impl SelectedFile {
    pub fn is_pdf(&self) -> bool {
        self.declared_type.eq_ignore_ascii_case(PDF_MIME_TYPE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RelevantSection {
    pub text: String,
    /// Cosine similarity in `0.0..=1.0`.
    pub similarity: f64,
    pub article_section: String,
    pub chunk_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnswer {
    pub success: bool,
    pub query: String,
    pub response: String,
    pub relevant_sections: Vec<RelevantSection>,
}

/// Converts a backend percentage to a whole number in `0..=100`.
pub fn percent_from(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    status: Status,
    selected_file: Option<SelectedFile>,
    extracted_text: Option<String>,
    upload_progress: u8,
    processing_progress: u8,
    processing_stage: String,
    processing: bool,
    query: String,
    querying: bool,
    query_result: Option<QueryAnswer>,
    error_message: Option<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn is_processing(&self) -> bool {
        self.processing
    }

    pub fn is_querying(&self) -> bool {
        self.querying
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn query_result(&self) -> Option<&QueryAnswer> {
        self.query_result.as_ref()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn upload_progress(&self) -> u8 {
        self.upload_progress
    }

    pub fn processing_progress(&self) -> u8 {
        self.processing_progress
    }

    pub fn processing_stage(&self) -> &str {
        &self.processing_stage
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            status: self.status,
            file_name: self.selected_file.as_ref().map(|file| file.name.clone()),
            text_preview: self.extracted_text.as_deref().map(preview),
            upload_progress: self.upload_progress,
            processing_progress: self.processing_progress,
            processing_stage: self.processing_stage.clone(),
            processing: self.processing,
            query: self.query.clone(),
            querying: self.querying,
            can_query: self.status == Status::Ready && !self.querying,
            result: self.query_result.clone(),
            error: self.error_message.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Moves to `next`. `Error` is terminal, so any move out of it is dropped.
    pub(crate) fn transition(&mut self, next: Status) -> bool {
        if self.status == Status::Error && next != Status::Error {
            return false;
        }
        if self.status != next {
            self.status = next;
            self.dirty = true;
        }
        true
    }

    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.error_message = Some(message.into());
        self.dirty = true;
    }

    pub(crate) fn clear_error(&mut self) {
        if self.error_message.take().is_some() {
            self.dirty = true;
        }
    }

    pub(crate) fn begin_upload(&mut self, file: SelectedFile, stage: &str) {
        self.error_message = None;
        self.query_result = None;
        self.selected_file = Some(file);
        self.extracted_text = None;
        self.upload_progress = 0;
        self.processing_progress = 0;
        self.processing_stage = stage.to_string();
        self.processing = true;
        self.dirty = true;
    }

    pub(crate) fn set_upload_progress(&mut self, percent: u8) {
        self.upload_progress = percent.min(100);
        self.dirty = true;
    }

    pub(crate) fn store_extracted_text(&mut self, text: String, stage: &str) {
        self.extracted_text = Some(text);
        self.upload_progress = 100;
        self.processing_progress = 0;
        self.processing_stage = stage.to_string();
        self.dirty = true;
    }

    pub(crate) fn abort_extraction(&mut self, message: String) {
        self.error_message = Some(message);
        self.upload_progress = 0;
        self.processing_progress = 0;
        self.processing = false;
        self.dirty = true;
    }

    pub(crate) fn set_processing_progress(&mut self, percent: u8, stage: String) {
        self.processing_progress = percent.min(100);
        self.processing_stage = stage;
        self.dirty = true;
    }

    pub(crate) fn finish_processing(&mut self, percent: u8, stage: &str) {
        self.processing_progress = percent;
        self.processing_stage = stage.to_string();
        self.processing = false;
        self.dirty = true;
    }

    pub(crate) fn set_query(&mut self, query: String) {
        if self.query != query {
            self.query = query;
            self.dirty = true;
        }
    }

    pub(crate) fn push_query_char(&mut self, ch: char) {
        self.query.push(ch);
        self.dirty = true;
    }

    pub(crate) fn begin_query(&mut self) {
        self.error_message = None;
        self.query_result = None;
        self.querying = true;
        self.dirty = true;
    }

    pub(crate) fn store_answer(&mut self, answer: QueryAnswer) {
        self.query_result = Some(answer);
        self.dirty = true;
    }

    pub(crate) fn end_query(&mut self) {
        self.querying = false;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_is_rounded_and_clamped() {
        assert_eq!(percent_from(29.6), 30);
        assert_eq!(percent_from(-5.0), 0);
        assert_eq!(percent_from(140.0), 100);
        assert_eq!(percent_from(f64::NAN), 0);
    }

    #[test]
    fn error_status_is_terminal() {
        let mut state = AppState::new();
        assert!(state.transition(Status::Error));
        assert!(!state.transition(Status::Ready));
        assert_eq!(state.status(), Status::Error);
    }

    #[test]
    fn declared_type_check_ignores_case() {
        let file = SelectedFile {
            name: "a.pdf".to_string(),
            declared_type: "Application/PDF".to_string(),
            path: PathBuf::from("a.pdf"),
        };
        assert!(file.is_pdf());
    }
}
