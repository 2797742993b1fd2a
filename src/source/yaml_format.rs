//! YAML source format
//!
//! Mappings flatten to dotted keys, sequences to comma-joined lists.

use serde_yaml::Value;

use super::{RawSettings, SourceFormat};
use crate::error::{Error, Result};

/// YAML source format
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlFormat;

impl SourceFormat for YamlFormat {
    fn extension(&self) -> &str {
        "yaml"
    }

    fn parse(&self, content: &str, origin: &str) -> Result<RawSettings> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| Error::Parse {
            origin: origin.to_string(),
            line: e.location().map_or(0, |loc| loc.line()),
            reason: e.to_string(),
        })?;

        let mut settings = RawSettings::new();
        match value {
            Value::Mapping(_) => flatten("", &value, &mut settings),
            // An empty document is an empty property set
            Value::Null => {}
            _ => {
                return Err(Error::Parse {
                    origin: origin.to_string(),
                    line: 1,
                    reason: "top-level value must be a mapping".to_string(),
                });
            }
        }
        Ok(settings)
    }
}

fn flatten(prefix: &str, value: &Value, out: &mut RawSettings) {
    match value {
        Value::Mapping(map) => {
            for (key, nested) in map {
                let Some(key) = scalar_text(key) else {
                    continue;
                };
                flatten(&super::join_key(prefix, &key), nested, out);
            }
        }
        Value::Sequence(items) => {
            let joined: Vec<String> = items.iter().filter_map(scalar_text).collect();
            out.set(prefix, joined.join(","));
        }
        Value::Tagged(tagged) => flatten(prefix, &tagged.value, out),
        other => {
            if let Some(text) = scalar_text(other) {
                out.set(prefix, text);
            }
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
