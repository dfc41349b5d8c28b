use docqa_logging::docqa_trace;

use crate::StreamEvent;

const DATA_PREFIX: &str = "data:";

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("stream line is not valid UTF-8")]
    InvalidUtf8,
    #[error("malformed event payload {payload:?}: {message}")]
    InvalidJson { payload: String, message: String },
}

/// Incremental decoder for newline-delimited `data: {json}` lines.
///
/// Bytes are buffered until a full line is available, so events split across
/// transport chunks (or multi-byte characters split mid-sequence) decode
/// correctly. Lines without a `data:` field are ignored.
#[derive(Debug, Default)]
pub struct EventDecoder {
    buffer: Vec<u8>,
}

impl EventDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one transport chunk and returns every event completed by it.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Result<StreamEvent, DecodeError>> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        let mut consumed = 0;
        while let Some(offset) = self.buffer[consumed..].iter().position(|b| *b == b'\n') {
            let end = consumed + offset;
            if let Some(event) = decode_line(&self.buffer[consumed..end]) {
                events.push(event);
            }
            consumed = end + 1;
        }
        self.buffer.drain(..consumed);
        events
    }

    /// Decodes whatever is left once the transport is exhausted.
    pub fn finish(&mut self) -> Vec<Result<StreamEvent, DecodeError>> {
        let rest = std::mem::take(&mut self.buffer);
        decode_line(&rest).into_iter().collect()
    }
}

fn decode_line(raw: &[u8]) -> Option<Result<StreamEvent, DecodeError>> {
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    let line = match std::str::from_utf8(raw) {
        Ok(line) => line,
        Err(_) => return Some(Err(DecodeError::InvalidUtf8)),
    };
    let payload = match line.strip_prefix(DATA_PREFIX) {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest).trim_end(),
        None => {
            if !line.trim().is_empty() {
                docqa_trace!("ignoring non-data stream line {:?}", line);
            }
            return None;
        }
    };
    if payload.is_empty() {
        return None;
    }
    Some(
        serde_json::from_str(payload).map_err(|err| DecodeError::InvalidJson {
            payload: payload.to_string(),
            message: err.to_string(),
        }),
    )
}
