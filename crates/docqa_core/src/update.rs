use crate::{AppState, Effect, Key, Msg, Status};

pub const NOT_A_PDF_MESSAGE: &str = "Please select a PDF file.";
pub const CONNECT_FAILED_MESSAGE: &str =
    "Could not connect to the server. Please make sure the backend is running.";
pub const QUERY_FAILED_MESSAGE: &str = "Failed to get response. The server might be down.";
pub const EXTRACTION_FAILED_PREFIX: &str = "Failed to extract text from PDF: ";

pub const STAGE_EXTRACTING: &str = "Extracting text from PDF";
pub const STAGE_SENDING: &str = "Sending text to server";
pub const STAGE_COMPLETE: &str = "Processing complete";
pub const STAGE_FAILED: &str = "Processing failed";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            if state.status() == Status::Loading {
                vec![Effect::CheckStats]
            } else {
                Vec::new()
            }
        }
        Msg::StatsLoaded {
            success,
            total_chunks,
        } => {
            if state.status() == Status::Loading {
                // An unsuccessful answer still proves the backend is reachable.
                let next = if success && total_chunks > 0 {
                    Status::Ready
                } else {
                    Status::NeedsUpload
                };
                state.transition(next);
            }
            Vec::new()
        }
        Msg::StatsFailed { reason: _ } => {
            if state.status() == Status::Loading {
                state.transition(Status::Error);
                state.set_error(CONNECT_FAILED_MESSAGE);
            }
            Vec::new()
        }
        Msg::FileSelected(file) => match state.status() {
            Status::Ready | Status::NeedsUpload => {
                if !file.is_pdf() {
                    state.set_error(NOT_A_PDF_MESSAGE);
                    Vec::new()
                } else {
                    state.begin_upload(file.clone(), STAGE_EXTRACTING);
                    vec![Effect::ExtractText { file }]
                }
            }
            Status::Loading | Status::Error => Vec::new(),
        },
        Msg::ExtractionProgress { percent } => {
            state.set_upload_progress(percent);
            Vec::new()
        }
        Msg::TextExtracted { text } => {
            state.store_extracted_text(text.clone(), STAGE_SENDING);
            vec![Effect::ProcessText { text }]
        }
        Msg::ExtractionFailed { reason } => {
            state.abort_extraction(format!("{EXTRACTION_FAILED_PREFIX}{reason}"));
            Vec::new()
        }
        Msg::ProcessingProgress { percent, stage } => {
            state.set_processing_progress(percent, stage);
            Vec::new()
        }
        Msg::ProcessingCompleted => {
            if state.transition(Status::Ready) {
                state.clear_error();
                state.finish_processing(100, STAGE_COMPLETE);
            }
            Vec::new()
        }
        Msg::ProcessingFailed { message } => {
            if state.transition(Status::NeedsUpload) {
                state.set_error(message);
                state.finish_processing(0, STAGE_FAILED);
            }
            Vec::new()
        }
        Msg::QueryChanged(query) => {
            state.set_query(query);
            Vec::new()
        }
        Msg::QueryKey { key, shift } => match key {
            Key::Enter if !shift => submit_query(&mut state),
            Key::Enter => {
                state.push_query_char('\n');
                Vec::new()
            }
            Key::Char(ch) => {
                state.push_query_char(ch);
                Vec::new()
            }
        },
        Msg::QuerySubmitted => submit_query(&mut state),
        Msg::QueryAnswered(answer) => {
            state.end_query();
            if !answer.success {
                state.set_error(answer.response.clone());
            }
            state.store_answer(answer);
            Vec::new()
        }
        Msg::QueryFailed { reason: _ } => {
            state.end_query();
            state.set_error(QUERY_FAILED_MESSAGE);
            Vec::new()
        }
        Msg::Tick | Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_query(state: &mut AppState) -> Vec<Effect> {
    let query = state.query().trim();
    if query.is_empty() || state.status() != Status::Ready {
        return Vec::new();
    }
    let query = query.to_string();
    state.begin_query();
    vec![Effect::SubmitQuery { query }]
}
