use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;

use docqa_logging::{docqa_error, docqa_warn};

use crate::extract::extract_file;
use crate::{
    Backend, BackendError, BackendSettings, EngineEvent, ExtractionError, PdfTextExtractor,
    ProgressSink, ReqwestBackend, TextExtractor,
};

enum EngineCommand {
    CheckStats,
    Extract { path: PathBuf },
    Process { text: String },
    Query { query: String },
}

/// Runs backend calls and extraction off the UI thread.
///
/// Every command becomes its own task; nothing is serialized, cancelled or
/// retried, and results reach `sink` in completion order.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: BackendSettings, sink: Arc<dyn ProgressSink>) -> std::io::Result<Self> {
        let backend = ReqwestBackend::new(settings)
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        Self::with_parts(Arc::new(backend), Arc::new(PdfTextExtractor), sink)
    }

    pub fn with_parts(
        backend: Arc<dyn Backend>,
        extractor: Arc<dyn TextExtractor>,
        sink: Arc<dyn ProgressSink>,
    ) -> std::io::Result<Self> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::Builder::new()
            .name("docqa-engine".to_string())
            .spawn(move || {
                while let Ok(command) = cmd_rx.recv() {
                    let backend = backend.clone();
                    let extractor = extractor.clone();
                    let sink = sink.clone();
                    runtime.spawn(async move {
                        handle_command(backend, extractor, sink, command).await;
                    });
                }
            })?;

        Ok(Self { cmd_tx })
    }

    pub fn check_stats(&self) {
        self.send(EngineCommand::CheckStats);
    }

    pub fn extract(&self, path: impl Into<PathBuf>) {
        self.send(EngineCommand::Extract { path: path.into() });
    }

    pub fn process(&self, text: impl Into<String>) {
        self.send(EngineCommand::Process { text: text.into() });
    }

    pub fn query(&self, query: impl Into<String>) {
        self.send(EngineCommand::Query {
            query: query.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            docqa_error!("engine thread is gone; command dropped");
        }
    }
}

async fn handle_command(
    backend: Arc<dyn Backend>,
    extractor: Arc<dyn TextExtractor>,
    sink: Arc<dyn ProgressSink>,
    command: EngineCommand,
) {
    match command {
        EngineCommand::CheckStats => {
            let result = backend.stats().await;
            if let Err(err) = &result {
                docqa_warn!("stats check failed: {}", err);
            }
            sink.emit(EngineEvent::StatsChecked(result));
        }
        EngineCommand::Extract { path } => {
            let progress = sink.clone();
            let result = tokio::task::spawn_blocking(move || {
                extract_file(extractor.as_ref(), &path, progress.as_ref())
            })
            .await
            .unwrap_or_else(|err| Err(ExtractionError::Pdf(err.to_string())));
            sink.emit(EngineEvent::TextExtracted(result));
        }
        EngineCommand::Process { text } => {
            let result = backend.process(&text, sink.as_ref()).await;
            if let Err(err) = &result {
                docqa_warn!("processing failed: {}", err);
            }
            sink.emit(EngineEvent::ProcessingFinished(result));
        }
        EngineCommand::Query { query } => {
            let result: Result<_, BackendError> = backend.query(&query).await;
            if let Err(err) = &result {
                docqa_warn!("query failed: {}", err);
            }
            sink.emit(EngineEvent::QueryFinished(result));
        }
    }
}
