use docqa_logging::{docqa_debug, docqa_warn};

use crate::{BackendError, EngineEvent, EventDecoder, ProcessResult, ProgressSink, StreamEvent};

/// Returns true for `text/event-stream`, ignoring parameters and case.
pub fn is_event_stream(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().eq_ignore_ascii_case("text/event-stream"))
        .unwrap_or(false)
}

/// Consumes a processing stream: forwards progress, remembers the final
/// result, and aborts on the first `error` event.
#[derive(Debug, Default)]
pub struct ProcessingStream {
    decoder: EventDecoder,
    result: Option<ProcessResult>,
}

impl ProcessingStream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, chunk: &[u8], sink: &dyn ProgressSink) -> Result<(), BackendError> {
        for decoded in self.decoder.push(chunk) {
            self.apply(decoded, sink)?;
        }
        Ok(())
    }

    /// Flushes the decoder and settles the outcome once the transport is done.
    pub fn finish(mut self, sink: &dyn ProgressSink) -> Result<ProcessResult, BackendError> {
        for decoded in self.decoder.finish() {
            self.apply(decoded, sink)?;
        }
        settle(self.result)
    }

    fn apply(
        &mut self,
        decoded: Result<StreamEvent, crate::DecodeError>,
        sink: &dyn ProgressSink,
    ) -> Result<(), BackendError> {
        let event = match decoded {
            Ok(event) => event,
            Err(err) => {
                docqa_warn!("skipping undecodable stream line: {}", err);
                return Ok(());
            }
        };
        match event {
            StreamEvent::Progress { progress, stage } => {
                docqa_debug!("processing progress {} ({})", progress, stage);
                sink.emit(EngineEvent::ProcessingProgress { progress, stage });
                Ok(())
            }
            StreamEvent::Complete { result } => {
                docqa_debug!("processing complete, success={}", result.success);
                self.result = Some(result);
                Ok(())
            }
            StreamEvent::Error { error } => match error.filter(|msg| !msg.trim().is_empty()) {
                Some(message) => Err(BackendError::Stream(message)),
                None => Err(BackendError::NoResult),
            },
            StreamEvent::Unknown => {
                docqa_debug!("ignoring stream event of unknown type");
                Ok(())
            }
        }
    }
}

/// Only a captured result with a truthy `success` counts as done.
pub(crate) fn settle(result: Option<ProcessResult>) -> Result<ProcessResult, BackendError> {
    match result {
        Some(result) if result.success => Ok(result),
        _ => Err(BackendError::NoResult),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<EngineEvent>>,
    }

    impl ProgressSink for Recorder {
        fn emit(&self, event: EngineEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn content_type_detection() {
        assert!(is_event_stream(Some("text/event-stream")));
        assert!(is_event_stream(Some("Text/Event-Stream; charset=utf-8")));
        assert!(!is_event_stream(Some("application/json")));
        assert!(!is_event_stream(None));
    }

    #[test]
    fn progress_then_complete_succeeds() {
        let sink = Recorder::default();
        let mut stream = ProcessingStream::new();
        stream
            .feed(
                b"data: {\"type\":\"progress\",\"progress\":30,\"stage\":\"chunking\"}\n",
                &sink,
            )
            .unwrap();
        stream
            .feed(b"data: {\"type\":\"complete\",\"result\":{\"success\":true}}\n", &sink)
            .unwrap();

        let result = stream.finish(&sink).unwrap();

        assert!(result.success);
        assert_eq!(
            sink.events.lock().unwrap().clone(),
            vec![EngineEvent::ProcessingProgress {
                progress: 30.0,
                stage: "chunking".to_string()
            }]
        );
    }

    #[test]
    fn events_after_complete_are_still_consumed() {
        let sink = Recorder::default();
        let mut stream = ProcessingStream::new();
        stream
            .feed(
                b"data: {\"type\":\"complete\",\"result\":{\"success\":true}}\n\
                  data: {\"type\":\"progress\",\"progress\":100,\"stage\":\"done\"}\n",
                &sink,
            )
            .unwrap();

        assert!(stream.finish(&sink).is_ok());
        assert_eq!(sink.events.lock().unwrap().len(), 1);
    }

    #[test]
    fn error_event_aborts_with_its_message() {
        let sink = Recorder::default();
        let mut stream = ProcessingStream::new();

        let err = stream
            .feed(b"data: {\"type\":\"error\",\"error\":\"bad text\"}\n", &sink)
            .unwrap_err();

        assert_eq!(err, BackendError::Stream("bad text".to_string()));
        assert_eq!(err.to_string(), "bad text");
    }

    #[test]
    fn error_event_without_message_uses_generic_failure() {
        let sink = Recorder::default();
        let mut stream = ProcessingStream::new();

        let err = stream.feed(b"data: {\"type\":\"error\"}\n", &sink).unwrap_err();

        assert_eq!(err, BackendError::NoResult);
    }

    #[test]
    fn exhausted_stream_without_success_fails() {
        let sink = Recorder::default();
        let mut stream = ProcessingStream::new();
        stream
            .feed(b"data: {\"type\":\"complete\",\"result\":{\"success\":false}}\n", &sink)
            .unwrap();

        let err = stream.finish(&sink).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Processing failed without a specific error message"
        );

        let empty = ProcessingStream::new();
        assert_eq!(empty.finish(&sink), Err(BackendError::NoResult));
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let sink = Recorder::default();
        let mut stream = ProcessingStream::new();
        stream.feed(b"data: {oops\n", &sink).unwrap();
        stream
            .feed(b"data: {\"type\":\"complete\",\"result\":{\"success\":true}}", &sink)
            .unwrap();

        assert!(stream.finish(&sink).is_ok());
    }

    #[test]
    fn numeric_success_flag_completes() {
        let sink = Recorder::default();
        let mut stream = ProcessingStream::new();
        stream
            .feed(b"data: {\"type\":\"complete\",\"result\":{\"success\":1}}\n", &sink)
            .unwrap();

        assert!(stream.finish(&sink).is_ok());
    }

    #[test]
    fn structured_error_event_still_aborts() {
        let sink = Recorder::default();
        let mut stream = ProcessingStream::new();

        let err = stream
            .feed(
                b"data: {\"type\":\"error\",\"error\":{\"message\":\"boom\"}}\n",
                &sink,
            )
            .unwrap_err();

        assert_eq!(err, BackendError::Stream("boom".to_string()));
    }
}
