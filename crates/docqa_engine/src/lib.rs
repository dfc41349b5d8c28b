//! DocQA engine: backend client, stream decoding, PDF extraction and effect execution.
mod backend;
mod decode;
mod engine;
mod extract;
mod settings;
mod stream;
mod types;
mod wire;

pub use backend::{Backend, ChannelProgressSink, ProgressSink, ReqwestBackend};
pub use decode::{DecodeError, EventDecoder};
pub use engine::EngineHandle;
pub use extract::{declared_mime_type, extract_file, PdfTextExtractor, TextExtractor};
pub use settings::{BackendSettings, SettingsError};
pub use stream::{is_event_stream, ProcessingStream};
pub use types::{BackendError, EngineEvent, ExtractionError};
pub use wire::{
    ProcessRequest, ProcessResult, QueryRequest, QueryResponse, RelevantSection, StatsResponse,
    StreamEvent,
};
