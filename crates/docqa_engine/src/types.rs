use thiserror::Error;

use crate::{ProcessResult, QueryResponse, StatsResponse};

/// Everything the engine reports back to the platform layer.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    StatsChecked(Result<StatsResponse, BackendError>),
    ExtractionProgress { percent: u8 },
    TextExtracted(Result<String, ExtractionError>),
    ProcessingProgress { progress: f64, stage: String },
    ProcessingFinished(Result<ProcessResult, BackendError>),
    QueryFinished(Result<QueryResponse, BackendError>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {0}")]
    HttpStatus(u16),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// An `error` event from the processing stream; shown verbatim.
    #[error("{0}")]
    Stream(String),
    #[error("Processing failed without a specific error message")]
    NoResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("could not read file: {0}")]
    Io(String),
    #[error("{0}")]
    Pdf(String),
    #[error("the document contains no extractable text")]
    Empty,
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> BackendError {
    if err.is_decode() {
        return BackendError::InvalidResponse(err.to_string());
    }
    BackendError::Network(err.to_string())
}
