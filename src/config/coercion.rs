//! Coercion of raw textual values into typed [`ConfigValue`]s

use std::num::IntErrorKind;

use super::types::{ConfigValue, SettingType};

/// Coerce a raw value to `setting_type`.
///
/// Returns the reason on failure; callers attach the key and decide whether
/// the failure is a bad default or bad input.
pub fn coerce(setting_type: SettingType, raw: &str) -> Result<ConfigValue, String> {
    match setting_type {
        SettingType::String => Ok(ConfigValue::String(raw.to_string())),
        SettingType::Class => Ok(ConfigValue::Class(raw.to_string())),
        SettingType::Int => raw.trim().parse::<i32>().map(ConfigValue::Int).map_err(|e| {
            match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    "value is out of range for INT".to_string()
                }
                _ => "not a valid integer".to_string(),
            }
        }),
        SettingType::Long => raw.trim().parse::<i64>().map(ConfigValue::Long).map_err(|e| {
            match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    "value is out of range for LONG".to_string()
                }
                _ => "not a valid integer".to_string(),
            }
        }),
        SettingType::Double => match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(ConfigValue::Double(n)),
            Ok(_) => Err("value must be a finite number".to_string()),
            Err(_) => Err("not a valid number".to_string()),
        },
        SettingType::Boolean => {
            let trimmed = raw.trim();
            if trimmed.eq_ignore_ascii_case("true") {
                Ok(ConfigValue::Boolean(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Ok(ConfigValue::Boolean(false))
            } else {
                Err("expected 'true' or 'false'".to_string())
            }
        }
        SettingType::List => Ok(ConfigValue::List(split_list(raw))),
    }
}

/// Split a comma-delimited list, trimming each element.
///
/// Blank input yields an empty list.
pub fn split_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    trimmed.split(',').map(|item| item.trim().to_string()).collect()
}
