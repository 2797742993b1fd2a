//! JSON source format
//!
//! Nested objects flatten to dotted keys, arrays to comma-joined lists.

use serde_json::Value;

use super::{RawSettings, SourceFormat};
use crate::error::{Error, Result};

/// JSON source format
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormat;

impl SourceFormat for JsonFormat {
    fn extension(&self) -> &str {
        "json"
    }

    fn parse(&self, content: &str, origin: &str) -> Result<RawSettings> {
        let value: Value = serde_json::from_str(content).map_err(|e| Error::Parse {
            origin: origin.to_string(),
            line: e.line(),
            reason: e.to_string(),
        })?;

        if !value.is_object() {
            return Err(Error::Parse {
                origin: origin.to_string(),
                line: 1,
                reason: "top-level value must be an object".to_string(),
            });
        }

        let mut settings = RawSettings::new();
        flatten("", &value, &mut settings);
        Ok(settings)
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut RawSettings) {
    match value {
        Value::Object(map) => {
            for (key, nested) in map {
                flatten(&super::join_key(prefix, key), nested, out);
            }
        }
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().map(scalar_text).collect();
            out.set(prefix, joined.join(","));
        }
        Value::Null => {}
        other => {
            out.set(prefix, scalar_text(other));
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattens_nested_objects() {
        let raw = JsonFormat
            .parse(
                r#"{
                    "id": "rest-1",
                    "producer": { "threads": 10 },
                    "consumer": { "request": { "timeout": { "ms": 1500 } } },
                    "debug": true,
                    "response.mediatype.preferred": ["application/json", "application/vnd.kafka+json"],
                    "ignored": null
                }"#,
                "inline",
            )
            .unwrap();

        assert_eq!(raw.get("id"), Some("rest-1"));
        assert_eq!(raw.get("producer.threads"), Some("10"));
        assert_eq!(raw.get("consumer.request.timeout.ms"), Some("1500"));
        assert_eq!(raw.get("debug"), Some("true"));
        assert_eq!(
            raw.get("response.mediatype.preferred"),
            Some("application/json,application/vnd.kafka+json")
        );
        assert!(!raw.contains("ignored"));
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(JsonFormat.parse("[1, 2]", "inline").is_err());
        let err = JsonFormat.parse("{ \"a\": ", "inline").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
