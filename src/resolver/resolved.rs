//! The immutable result of resolution

use indexmap::IndexMap;
use serde::Serialize;
use std::sync::Arc;

use crate::clock::Clock;
use crate::config::{ConfigValue, FromConfigValue, Importance, Schema, SettingType};
use crate::error::{Error, Result};
use crate::source::RawSettings;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    /// The declared default
    Default,
    /// The raw input (properties file or in-memory settings)
    Raw,
    /// An environment variable override
    Environment,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolvedValue {
    pub value: ConfigValue,
    pub source: ValueSource,
}

/// One row of the schema description, used by help and docs tooling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingDescription {
    pub name: String,
    #[serde(rename = "type")]
    pub setting_type: SettingType,
    pub importance: Importance,
    pub documentation: String,
    pub default: Option<ConfigValue>,
    pub value: ConfigValue,
    pub source: ValueSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_values: Option<String>,
}

/// Build a typed settings struct from a [`ResolvedConfig`]
///
/// Implement by hand, or with `#[derive(FromConfig)]` when the `derive`
/// feature is enabled.
pub trait FromConfig: Sized {
    fn from_config(config: &ResolvedConfig) -> Result<Self>;
}

/// Validated, typed configuration
///
/// Created once by the [`Resolver`](super::Resolver) and read-only after
/// that. Every key of the schema has a value. Cloning is cheap for the
/// schema and clock, which are shared.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    schema: Arc<Schema>,
    values: IndexMap<String, ResolvedValue>,
    unknown: RawSettings,
    clock: Arc<dyn Clock>,
}

impl ResolvedConfig {
    pub(crate) fn new(
        schema: Arc<Schema>,
        values: IndexMap<String, ResolvedValue>,
        unknown: RawSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            schema,
            values,
            unknown,
            clock,
        }
    }

    /// The schema this configuration was resolved against
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// The service-wide time source
    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Raw keys that were supplied but are not part of the schema
    pub fn unknown_keys(&self) -> &RawSettings {
        &self.unknown
    }

    // =========================================================================
    // Typed accessors
    // =========================================================================

    /// The resolved value for `key`
    pub fn value(&self, key: &str) -> Result<&ConfigValue> {
        self.entry(key).map(|resolved| &resolved.value)
    }

    /// Where the value for `key` came from
    pub fn source(&self, key: &str) -> Result<ValueSource> {
        self.entry(key).map(|resolved| resolved.source)
    }

    /// Typed value for `key`
    ///
    /// # Example
    ///
    /// ```
    /// use confdef::{resolve, RawSettings, Schema, SettingDefinition, SettingType};
    ///
    /// # fn main() -> confdef::Result<()> {
    /// let mut builder = Schema::builder();
    /// builder.define(SettingDefinition::new("port", SettingType::Int).default_value(8082))?;
    /// let config = resolve(builder.build()?, &RawSettings::new())?;
    ///
    /// let port: u16 = config.get("port")?;
    /// assert_eq!(port, 8082);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get<T: FromConfigValue>(&self, key: &str) -> Result<T> {
        T::extract(key, self.value(key)?)
    }

    pub fn get_string(&self, key: &str) -> Result<&str> {
        let value = self.value(key)?;
        value.as_str().ok_or_else(|| mismatch(key, "STRING", value))
    }

    pub fn get_int(&self, key: &str) -> Result<i32> {
        self.get(key)
    }

    pub fn get_long(&self, key: &str) -> Result<i64> {
        self.get(key)
    }

    pub fn get_double(&self, key: &str) -> Result<f64> {
        self.get(key)
    }

    pub fn get_bool(&self, key: &str) -> Result<bool> {
        self.get(key)
    }

    pub fn get_list(&self, key: &str) -> Result<&[String]> {
        let value = self.value(key)?;
        value.as_list().ok_or_else(|| mismatch(key, "LIST", value))
    }

    /// Name of the referenced type or plugin
    pub fn get_class(&self, key: &str) -> Result<&str> {
        let value = self.value(key)?;
        match value {
            ConfigValue::Class(name) => Ok(name),
            other => Err(mismatch(key, "CLASS", other)),
        }
    }

    /// Build a typed settings struct
    pub fn extract<T: FromConfig>(&self) -> Result<T> {
        T::from_config(self)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Describe every setting in schema insertion order
    pub fn describe(&self) -> Vec<SettingDescription> {
        self.schema
            .iter()
            .filter_map(|def| {
                let resolved = self.values.get(&def.name)?;
                Some(SettingDescription {
                    name: def.name.clone(),
                    setting_type: def.setting_type,
                    importance: def.importance,
                    documentation: def.documentation.clone(),
                    default: def.default().cloned(),
                    value: resolved.value.clone(),
                    source: resolved.source,
                    valid_values: def.validator.as_ref().map(|v| v.describe()),
                })
            })
            .collect()
    }

    /// [`describe`](Self::describe) rendered as pretty JSON
    pub fn describe_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.describe())?)
    }

    /// Resolved values in their raw textual form, in schema order
    pub fn to_raw(&self) -> RawSettings {
        self.values
            .iter()
            .map(|(key, resolved)| (key.as_str(), resolved.value.to_string()))
            .collect()
    }

    fn entry(&self, key: &str) -> Result<&ResolvedValue> {
        self.values
            .get(key)
            .ok_or_else(|| Error::UnknownKey(key.to_string()))
    }
}

impl PartialEq for ResolvedConfig {
    /// Two configurations are equal when their observable values are; the
    /// clock is not compared.
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.values == other.values && self.unknown == other.unknown
    }
}

fn mismatch(key: &str, expected: &str, actual: &ConfigValue) -> Error {
    Error::TypeMismatch {
        key: key.to_string(),
        expected: expected.to_string(),
        actual: actual.setting_type().to_string(),
    }
}
