//! Core value types for confdef

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

// =============================================================================
// Setting Types
// =============================================================================

/// Primitive kind a setting's raw value must coerce to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SettingType {
    /// Free text
    #[default]
    String,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    /// Floating point number
    Double,
    /// `true` / `false`
    Boolean,
    /// Ordered sequence of strings, comma-delimited in raw form
    List,
    /// Name of a type or plugin, resolved by whoever consumes it
    Class,
}

impl SettingType {
    /// Upper-case name used in error messages (`INT`, `LIST`, ...)
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::String => "STRING",
            SettingType::Int => "INT",
            SettingType::Long => "LONG",
            SettingType::Double => "DOUBLE",
            SettingType::Boolean => "BOOLEAN",
            SettingType::List => "LIST",
            SettingType::Class => "CLASS",
        }
    }

    /// Whether values of this type are numeric
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, SettingType::Int | SettingType::Long | SettingType::Double)
    }
}

impl fmt::Display for SettingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Importance
// =============================================================================

/// Documentation weight of a setting. Has no runtime effect.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    #[default]
    Medium,
    Low,
}

impl Importance {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

impl fmt::Display for Importance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Config Values
// =============================================================================

/// A type-coerced setting value
///
/// Serializes as the bare value (`5`, `"localhost:2181"`, `["a", "b"]`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    String(String),
    Int(i32),
    Long(i64),
    Double(f64),
    Boolean(bool),
    List(Vec<String>),
    Class(String),
}

impl ConfigValue {
    /// The setting type this value belongs to
    #[must_use]
    pub fn setting_type(&self) -> SettingType {
        match self {
            ConfigValue::String(_) => SettingType::String,
            ConfigValue::Int(_) => SettingType::Int,
            ConfigValue::Long(_) => SettingType::Long,
            ConfigValue::Double(_) => SettingType::Double,
            ConfigValue::Boolean(_) => SettingType::Boolean,
            ConfigValue::List(_) => SettingType::List,
            ConfigValue::Class(_) => SettingType::Class,
        }
    }

    /// Borrow the text of a `String` or `Class` value
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) | ConfigValue::Class(s) => Some(s),
            _ => None,
        }
    }

    /// Integer view of `Int` and `Long` values
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Int(n) => Some(i64::from(*n)),
            ConfigValue::Long(n) => Some(*n),
            _ => None,
        }
    }

    /// Floating point view of any numeric value
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Int(n) => Some(f64::from(*n)),
            // Precision loss above 2^53 is acceptable for range checks
            ConfigValue::Long(n) => Some(*n as f64),
            ConfigValue::Double(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ConfigValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// Convert this value so it conforms to `setting_type`.
    ///
    /// `Int` widens to `Long`, `Long` narrows to `Int` when it fits, and
    /// `String`/`Class` are interchangeable. Everything else is rejected.
    pub(crate) fn conform(self, setting_type: SettingType) -> std::result::Result<Self, String> {
        match (self, setting_type) {
            (v, t) if v.setting_type() == t => Ok(v),
            (ConfigValue::Int(n), SettingType::Long) => Ok(ConfigValue::Long(i64::from(n))),
            (ConfigValue::Long(n), SettingType::Int) => i32::try_from(n)
                .map(ConfigValue::Int)
                .map_err(|_| format!("{n} is out of range for INT")),
            (ConfigValue::Int(n), SettingType::Double) => Ok(ConfigValue::Double(f64::from(n))),
            (ConfigValue::String(s), SettingType::Class) => Ok(ConfigValue::Class(s)),
            (ConfigValue::Class(s), SettingType::String) => Ok(ConfigValue::String(s)),
            (v, t) => Err(format!("a {} value cannot be used as {t}", v.setting_type())),
        }
    }
}

impl fmt::Display for ConfigValue {
    /// Renders the value in its raw (properties) form
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::String(s) | ConfigValue::Class(s) => f.write_str(s),
            ConfigValue::Int(n) => write!(f, "{n}"),
            ConfigValue::Long(n) => write!(f, "{n}"),
            ConfigValue::Double(n) => write!(f, "{n}"),
            ConfigValue::Boolean(b) => write!(f, "{b}"),
            ConfigValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<i32> for ConfigValue {
    fn from(n: i32) -> Self {
        ConfigValue::Int(n)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Long(n)
    }
}

impl From<f64> for ConfigValue {
    fn from(n: f64) -> Self {
        ConfigValue::Double(n)
    }
}

impl From<bool> for ConfigValue {
    fn from(b: bool) -> Self {
        ConfigValue::Boolean(b)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(items: Vec<String>) -> Self {
        ConfigValue::List(items)
    }
}

impl From<&[&str]> for ConfigValue {
    fn from(items: &[&str]) -> Self {
        ConfigValue::List(items.iter().map(|s| (*s).to_string()).collect())
    }
}

// =============================================================================
// Default Values
// =============================================================================

/// Declared default of a setting.
///
/// A `Raw` default is coerced with the same rules as raw input when the
/// setting is defined; a `Value` default must already conform to the
/// declared type.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DefaultValue {
    /// No default, the setting must be supplied
    #[default]
    Required,
    /// Raw textual default, e.g. `"5"` for an `INT`
    Raw(String),
    /// Typed default
    Value(ConfigValue),
}

impl DefaultValue {
    /// Whether this marks the setting as required
    #[must_use]
    pub fn is_required(&self) -> bool {
        matches!(self, DefaultValue::Required)
    }
}

impl From<&str> for DefaultValue {
    fn from(s: &str) -> Self {
        DefaultValue::Raw(s.to_string())
    }
}

impl From<String> for DefaultValue {
    fn from(s: String) -> Self {
        DefaultValue::Raw(s)
    }
}

impl From<ConfigValue> for DefaultValue {
    fn from(v: ConfigValue) -> Self {
        DefaultValue::Value(v)
    }
}

impl From<Option<ConfigValue>> for DefaultValue {
    fn from(v: Option<ConfigValue>) -> Self {
        v.map_or(DefaultValue::Required, DefaultValue::Value)
    }
}

macro_rules! default_from_value {
    ($($t:ty),*) => {
        $(
            impl From<$t> for DefaultValue {
                fn from(v: $t) -> Self {
                    DefaultValue::Value(ConfigValue::from(v))
                }
            }
        )*
    };
}

default_from_value!(i32, i64, f64, bool, Vec<String>);

// =============================================================================
// Typed Extraction
// =============================================================================

/// Conversion from a resolved [`ConfigValue`] into a Rust type
pub trait FromConfigValue: Sized {
    /// Name used in `TypeMismatch` errors
    fn expected() -> &'static str;

    /// Convert, or `None` if the value is of the wrong kind or does not fit
    fn from_config_value(value: &ConfigValue) -> Option<Self>;

    /// Convert, reporting a `TypeMismatch` for `key` on failure
    fn extract(key: &str, value: &ConfigValue) -> Result<Self> {
        Self::from_config_value(value).ok_or_else(|| Error::TypeMismatch {
            key: key.to_string(),
            expected: Self::expected().to_string(),
            actual: value.setting_type().to_string(),
        })
    }
}

impl FromConfigValue for String {
    fn expected() -> &'static str {
        "STRING"
    }

    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        value.as_str().map(String::from)
    }
}

impl FromConfigValue for bool {
    fn expected() -> &'static str {
        "BOOLEAN"
    }

    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        value.as_bool()
    }
}

impl FromConfigValue for f64 {
    fn expected() -> &'static str {
        "DOUBLE"
    }

    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        value.as_f64()
    }
}

impl FromConfigValue for Vec<String> {
    fn expected() -> &'static str {
        "LIST"
    }

    fn from_config_value(value: &ConfigValue) -> Option<Self> {
        value.as_list().map(<[String]>::to_vec)
    }
}

macro_rules! integer_from_value {
    ($($t:ty => $name:literal),*) => {
        $(
            impl FromConfigValue for $t {
                fn expected() -> &'static str {
                    $name
                }

                fn from_config_value(value: &ConfigValue) -> Option<Self> {
                    value.as_i64().and_then(|n| <$t>::try_from(n).ok())
                }
            }
        )*
    };
}

integer_from_value!(
    i32 => "INT",
    i64 => "LONG",
    u16 => "INT (u16)",
    u32 => "INT (u32)",
    u64 => "LONG (u64)",
    usize => "LONG (usize)"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_uses_raw_form() {
        assert_eq!(ConfigValue::Int(5).to_string(), "5");
        assert_eq!(ConfigValue::Boolean(false).to_string(), "false");
        assert_eq!(
            ConfigValue::List(vec!["a".into(), "b".into()]).to_string(),
            "a,b"
        );
        assert_eq!(SettingType::Long.to_string(), "LONG");
        assert_eq!(Importance::High.to_string(), "high");
    }

    #[test]
    fn test_conform_widening_and_narrowing() {
        assert_eq!(
            ConfigValue::Int(7).conform(SettingType::Long),
            Ok(ConfigValue::Long(7))
        );
        assert_eq!(
            ConfigValue::Long(7).conform(SettingType::Int),
            Ok(ConfigValue::Int(7))
        );
        assert!(ConfigValue::Long(i64::MAX).conform(SettingType::Int).is_err());
        assert!(ConfigValue::Boolean(true).conform(SettingType::Int).is_err());
        assert_eq!(
            ConfigValue::String("com.example.Foo".into()).conform(SettingType::Class),
            Ok(ConfigValue::Class("com.example.Foo".into()))
        );
    }

    #[test]
    fn test_extract_reports_mismatch() {
        let value = ConfigValue::String("x".into());
        let err = i32::extract("producer.threads", &value).unwrap_err();
        assert!(matches!(err, Error::TypeMismatch { .. }));

        assert_eq!(u16::extract("port", &ConfigValue::Int(8080)).unwrap(), 8080);
        assert!(u16::extract("port", &ConfigValue::Int(-1)).is_err());
        assert_eq!(f64::extract("ratio", &ConfigValue::Int(2)).unwrap(), 2.0);
    }

    #[test]
    fn test_default_value_conversions() {
        assert_eq!(DefaultValue::from("5"), DefaultValue::Raw("5".into()));
        assert_eq!(
            DefaultValue::from(5),
            DefaultValue::Value(ConfigValue::Int(5))
        );
        assert!(DefaultValue::from(None::<ConfigValue>).is_required());
    }

    #[test]
    fn test_importance_orders_high_first() {
        let mut levels = vec![Importance::Low, Importance::High, Importance::Medium];
        levels.sort();
        assert_eq!(
            levels,
            vec![Importance::High, Importance::Medium, Importance::Low]
        );
    }
}
