/// Keys the query box reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Char(char),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Session mounted; triggers the backend readiness check.
    Started,
    /// `/stats` answered.
    StatsLoaded { success: bool, total_chunks: u64 },
    /// `/stats` could not be reached or decoded.
    StatsFailed { reason: String },
    /// User picked a file.
    FileSelected(crate::SelectedFile),
    /// Local text extraction advanced.
    ExtractionProgress { percent: u8 },
    /// Local text extraction finished.
    TextExtracted { text: String },
    /// Local text extraction failed.
    ExtractionFailed { reason: String },
    /// Backend reported a processing step.
    ProcessingProgress { percent: u8, stage: String },
    /// Backend finished processing with a successful result.
    ProcessingCompleted,
    /// Processing failed; `message` is shown to the user as is.
    ProcessingFailed { message: String },
    /// User edited the query box.
    QueryChanged(String),
    /// User pressed a key inside the query box.
    QueryKey { key: Key, shift: bool },
    /// User clicked the ask button.
    QuerySubmitted,
    /// `/query` answered with a parsed body.
    QueryAnswered(crate::QueryAnswer),
    /// `/query` could not be reached or decoded.
    QueryFailed { reason: String },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}
