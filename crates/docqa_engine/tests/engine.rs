use std::sync::{mpsc, Arc};
use std::time::Duration;

use docqa_engine::{
    extract_file, Backend, BackendError, ChannelProgressSink, EngineEvent, EngineHandle,
    ExtractionError, ProcessResult, ProgressSink, QueryResponse, StatsResponse, TextExtractor,
};
use pretty_assertions::assert_eq;

struct FakeBackend;

#[async_trait::async_trait]
impl Backend for FakeBackend {
    async fn stats(&self) -> Result<StatsResponse, BackendError> {
        Ok(StatsResponse {
            success: true,
            total_chunks: 3,
        })
    }

    async fn process(
        &self,
        text: &str,
        sink: &dyn ProgressSink,
    ) -> Result<ProcessResult, BackendError> {
        sink.emit(EngineEvent::ProcessingProgress {
            progress: 30.0,
            stage: "chunking".to_string(),
        });
        if text == "bad" {
            return Err(BackendError::Stream("bad text".to_string()));
        }
        Ok(ProcessResult {
            success: true,
            ..ProcessResult::default()
        })
    }

    async fn query(&self, query: &str) -> Result<QueryResponse, BackendError> {
        Ok(QueryResponse {
            success: true,
            query: query.to_string(),
            response: format!("answer to {query}"),
            relevant_sections: Vec::new(),
        })
    }
}

/// Treats the file content as already-extracted UTF-8 text.
struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let text = String::from_utf8_lossy(bytes).trim().to_string();
        if text.is_empty() {
            Err(ExtractionError::Empty)
        } else {
            Ok(text)
        }
    }
}

fn engine() -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel();
    let sink: Arc<dyn ProgressSink> = Arc::new(ChannelProgressSink::new(tx));
    let handle =
        EngineHandle::with_parts(Arc::new(FakeBackend), Arc::new(PlainTextExtractor), sink)
            .expect("engine starts");
    (handle, rx)
}

fn next(rx: &mpsc::Receiver<EngineEvent>) -> EngineEvent {
    rx.recv_timeout(Duration::from_secs(5)).expect("engine event")
}

#[test]
fn stats_command_reports_back() {
    let (engine, rx) = engine();
    engine.check_stats();

    assert_eq!(
        next(&rx),
        EngineEvent::StatsChecked(Ok(StatsResponse {
            success: true,
            total_chunks: 3
        }))
    );
}

#[test]
fn process_command_forwards_progress_before_result() {
    let (engine, rx) = engine();
    engine.process("bad");

    assert_eq!(
        next(&rx),
        EngineEvent::ProcessingProgress {
            progress: 30.0,
            stage: "chunking".to_string()
        }
    );
    assert_eq!(
        next(&rx),
        EngineEvent::ProcessingFinished(Err(BackendError::Stream("bad text".to_string())))
    );
}

#[test]
fn query_command_reports_answer() {
    let (engine, rx) = engine();
    engine.query("why");

    match next(&rx) {
        EngineEvent::QueryFinished(Ok(answer)) => assert_eq!(answer.response, "answer to why"),
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn extract_command_reports_progress_and_text() {
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("doc.pdf");
    std::fs::write(&path, "  We the People  ").unwrap();

    let (engine, rx) = engine();
    engine.extract(&path);

    let events: Vec<_> = (0..4).map(|_| next(&rx)).collect();
    assert_eq!(
        events,
        vec![
            EngineEvent::ExtractionProgress { percent: 0 },
            EngineEvent::ExtractionProgress { percent: 50 },
            EngineEvent::ExtractionProgress { percent: 100 },
            EngineEvent::TextExtracted(Ok("We the People".to_string())),
        ]
    );
}

#[test]
fn extract_missing_file_is_an_io_error() {
    let (tx, rx) = mpsc::channel();
    let sink = ChannelProgressSink::new(tx);
    let temp = tempfile::TempDir::new().unwrap();

    let err = extract_file(&PlainTextExtractor, &temp.path().join("missing.pdf"), &sink)
        .unwrap_err();

    assert!(matches!(err, ExtractionError::Io(_)));
    assert_eq!(rx.try_iter().count(), 1);
}

#[test]
fn extractor_errors_are_passed_through() {
    let (tx, _rx) = mpsc::channel();
    let sink = ChannelProgressSink::new(tx);
    let temp = tempfile::TempDir::new().unwrap();
    let path = temp.path().join("blank.pdf");
    std::fs::write(&path, "   ").unwrap();

    let err = extract_file(&PlainTextExtractor, &path, &sink).unwrap_err();

    assert_eq!(err, ExtractionError::Empty);
}

#[test]
fn pdf_extractor_rejects_non_pdf_bytes() {
    let err = docqa_engine::PdfTextExtractor
        .extract(b"this is not a pdf")
        .unwrap_err();

    assert!(matches!(err, ExtractionError::Pdf(_)), "{err:?}");
}
