//! Value constraints checked after coercion

use serde::{Deserialize, Serialize};

use super::types::ConfigValue;

/// Constraint attached to a setting definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Validator {
    /// Numeric bounds, inclusive. Either side may be open.
    Range {
        #[serde(skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Closed set of accepted values. Applies to each element of a list.
    OneOf { values: Vec<String> },
    /// Regex the textual value must match. Applies to each element of a list.
    Pattern { pattern: String },
}

impl Validator {
    /// Numeric range with both bounds
    pub fn range(min: impl Into<f64>, max: impl Into<f64>) -> Self {
        Validator::Range {
            min: Some(min.into()),
            max: Some(max.into()),
        }
    }

    /// Lower bound only
    pub fn at_least(min: impl Into<f64>) -> Self {
        Validator::Range {
            min: Some(min.into()),
            max: None,
        }
    }

    /// Closed set of accepted strings
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Validator::OneOf {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Regex pattern the value must match
    pub fn pattern(pattern: impl Into<String>) -> Self {
        Validator::Pattern {
            pattern: pattern.into(),
        }
    }

    /// Check the validator itself is well formed
    pub fn validate_definition(&self) -> Result<(), String> {
        match self {
            Validator::Range {
                min: Some(min),
                max: Some(max),
            } if min > max => Err(format!("min ({min}) cannot be greater than max ({max})")),
            Validator::OneOf { values } if values.is_empty() => {
                Err("set of valid values cannot be empty".to_string())
            }
            Validator::Pattern { pattern } => {
                if pattern.is_empty() {
                    return Err("Pattern cannot be empty string".to_string());
                }
                regex::Regex::new(pattern).map_err(|e| format!("Invalid regex pattern: {e}"))?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Validate a coerced value
    pub fn validate(&self, value: &ConfigValue) -> Result<(), String> {
        match self {
            Validator::Range { min, max } => {
                let num = value
                    .as_f64()
                    .ok_or_else(|| "Value must be a number".to_string())?;
                if let Some(min) = min {
                    if num < *min {
                        return Err(format!("Value must be at least {min}"));
                    }
                }
                if let Some(max) = max {
                    if num > *max {
                        return Err(format!("Value must be at most {max}"));
                    }
                }
                Ok(())
            }
            Validator::OneOf { values } => each_text(value, |text| {
                if values.iter().any(|v| v == text) {
                    Ok(())
                } else {
                    Err(format!("Value must be one of [{}]", values.join(", ")))
                }
            }),
            Validator::Pattern { pattern } => {
                let re = regex::Regex::new(pattern)
                    .map_err(|e| format!("Invalid regex pattern: {e}"))?;
                each_text(value, |text| {
                    if re.is_match(text) {
                        Ok(())
                    } else {
                        Err(format!("Value does not match pattern: {pattern}"))
                    }
                })
            }
        }
    }

    /// Human readable description for docs
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Validator::Range { min, max } => match (min, max) {
                (Some(min), Some(max)) => format!("[{min},...,{max}]"),
                (Some(min), None) => format!("[{min},...]"),
                (None, Some(max)) => format!("[...,{max}]"),
                (None, None) => "any number".to_string(),
            },
            Validator::OneOf { values } => format!("[{}]", values.join(", ")),
            Validator::Pattern { pattern } => format!("matches `{pattern}`"),
        }
    }
}

fn each_text<F>(value: &ConfigValue, check: F) -> Result<(), String>
where
    F: Fn(&str) -> Result<(), String>,
{
    match value {
        ConfigValue::List(items) => items.iter().try_for_each(|item| check(item.as_str())),
        other => check(&other.to_string()),
    }
}
