use crate::SelectedFile;

/// Side effects requested by `update`; the platform layer executes them and
/// reports back with further messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the backend whether it already holds indexed content.
    CheckStats,
    /// Extract the text of an accepted PDF.
    ExtractText { file: SelectedFile },
    /// Send extracted text to the backend for chunking.
    ProcessText { text: String },
    /// Ask the backend a question.
    SubmitQuery { query: String },
}
