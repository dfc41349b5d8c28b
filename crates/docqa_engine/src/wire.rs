//! JSON bodies exchanged with the backend.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// `GET /stats`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub total_chunks: u64,
}

/// `POST /process` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRequest<'a> {
    #[serde(rename = "constitutionText")]
    pub text: &'a str,
    pub strategy: &'a str,
}

/// Final processing payload; everything besides `success` is kept verbatim.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ProcessResult {
    #[serde(default, deserialize_with = "truthy")]
    pub success: bool,
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

/// One `data:` line of the processing stream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    Progress {
        #[serde(default)]
        progress: f64,
        #[serde(default)]
        stage: String,
    },
    Complete {
        #[serde(default)]
        result: ProcessResult,
    },
    Error {
        #[serde(default, deserialize_with = "error_text")]
        error: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

/// Reads a flag the way a loosely typed backend means it: `1`, `"yes"` and
/// non-empty objects count as set; `0`, `""` and `null` do not.
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Accepts any error payload; structured errors keep their `message` or are
/// rendered as JSON.
fn error_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(message) => Some(message),
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            _ => Some(Value::Object(map).to_string()),
        },
        other => Some(other.to_string()),
    })
}

/// `POST /query` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub relevant_sections: Vec<RelevantSection>,
}

/// A cited passage. Field names are snake_case on the wire.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct RelevantSection {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub similarity: f64,
    #[serde(default)]
    pub article_section: String,
    #[serde(default)]
    pub chunk_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_request_uses_backend_field_names() {
        let body = serde_json::to_value(ProcessRequest {
            text: "We the People",
            strategy: "ai",
        })
        .unwrap();
        assert_eq!(
            body,
            serde_json::json!({"constitutionText": "We the People", "strategy": "ai"})
        );
    }

    #[test]
    fn query_response_mixes_camel_and_snake_case() {
        let raw = r#"{
            "success": true,
            "query": "q",
            "response": "a",
            "relevantSections": [
                {"text": "t", "similarity": 0.5, "article_section": "Art. 2", "chunk_type": "article"}
            ]
        }"#;
        let parsed: QueryResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.relevant_sections[0].article_section, "Art. 2");
        assert_eq!(parsed.relevant_sections[0].chunk_type, "article");
    }

    #[test]
    fn unknown_event_type_is_tolerated() {
        let parsed: StreamEvent = serde_json::from_str(r#"{"type":"heartbeat"}"#).unwrap();
        assert_eq!(parsed, StreamEvent::Unknown);
    }

    #[test]
    fn complete_result_keeps_extra_fields() {
        let parsed: StreamEvent = serde_json::from_str(
            r#"{"type":"complete","result":{"success":true,"chunksCreated":12}}"#,
        )
        .unwrap();
        let StreamEvent::Complete { result } = parsed else {
            panic!("expected complete event");
        };
        assert!(result.success);
        assert_eq!(result.details["chunksCreated"], 12);
    }

    #[test]
    fn success_flag_accepts_truthy_values() {
        for (raw, expected) in [
            ("true", true),
            ("1", true),
            ("\"yes\"", true),
            ("{}", true),
            ("false", false),
            ("0", false),
            ("\"\"", false),
            ("null", false),
        ] {
            let parsed: ProcessResult =
                serde_json::from_str(&format!(r#"{{"success":{raw}}}"#)).unwrap();
            assert_eq!(parsed.success, expected, "{raw}");
        }
    }

    #[test]
    fn structured_error_payloads_become_text() {
        let parsed: StreamEvent =
            serde_json::from_str(r#"{"type":"error","error":{"message":"boom"}}"#).unwrap();
        assert_eq!(
            parsed,
            StreamEvent::Error {
                error: Some("boom".to_string())
            }
        );

        let parsed: StreamEvent =
            serde_json::from_str(r#"{"type":"error","error":{"code":7}}"#).unwrap();
        assert_eq!(
            parsed,
            StreamEvent::Error {
                error: Some(r#"{"code":7}"#.to_string())
            }
        );

        let parsed: StreamEvent = serde_json::from_str(r#"{"type":"error","error":null}"#).unwrap();
        assert_eq!(parsed, StreamEvent::Error { error: None });
    }
}
