//! TOML source format
//!
//! Tables flatten to dotted keys, arrays to comma-joined lists.

use toml::Value;

use super::{RawSettings, SourceFormat};
use crate::error::{Error, Result};

/// TOML source format
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlFormat;

impl SourceFormat for TomlFormat {
    fn extension(&self) -> &str {
        "toml"
    }

    fn parse(&self, content: &str, origin: &str) -> Result<RawSettings> {
        let table: toml::Table = toml::from_str(content).map_err(|e| Error::Parse {
            origin: origin.to_string(),
            line: e
                .span()
                .map_or(0, |span| content[..span.start].lines().count().max(1)),
            reason: e.message().to_string(),
        })?;

        let mut settings = RawSettings::new();
        for (key, value) in &table {
            flatten(key, value, &mut settings);
        }
        Ok(settings)
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut RawSettings) {
    match value {
        Value::Table(table) => {
            for (key, nested) in table {
                flatten(&super::join_key(prefix, key), nested, out);
            }
        }
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().map(scalar_text).collect();
            out.set(prefix, joined.join(","));
        }
        other => {
            out.set(prefix, scalar_text(other));
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(n) => n.to_string(),
        Value::Float(n) => n.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Datetime(dt) => dt.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattens_tables() {
        let raw = TomlFormat
            .parse(
                r#"
id = "rest-1"
debug = false

[producer]
threads = 10

[consumer.request]
"timeout.ms" = 1500
"#,
                "inline",
            )
            .unwrap();

        assert_eq!(raw.get("id"), Some("rest-1"));
        assert_eq!(raw.get("debug"), Some("false"));
        assert_eq!(raw.get("producer.threads"), Some("10"));
        assert_eq!(raw.get("consumer.request.timeout.ms"), Some("1500"));
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlFormat.parse("id = ", "inline").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
