//! Error types for confdef

use std::path::PathBuf;
use thiserror::Error;

use crate::config::SettingType;

/// Result type alias for confdef operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for confdef
///
/// Every variant is fatal to the operation that produced it. Configuration
/// errors are operator-facing, so messages always name the offending key.
#[derive(Error, Debug)]
pub enum Error {
    // -------------------------------------------------------------------------
    // Schema Assembly Errors
    // -------------------------------------------------------------------------
    #[error("Setting '{0}' is defined twice")]
    DuplicateDefinition(String),

    #[error("Cannot override setting '{0}': it was never defined")]
    UnknownOverrideTarget(String),

    #[error("Invalid default value for {key} ({setting_type}): {reason}")]
    InvalidDefault {
        key: String,
        setting_type: SettingType,
        reason: String,
    },

    #[error("Schema has already been built and can no longer be modified")]
    SchemaFrozen,

    // -------------------------------------------------------------------------
    // Resolution Errors
    // -------------------------------------------------------------------------
    #[error("Missing required setting '{0}' which has no default value")]
    MissingRequiredSetting(String),

    #[error("Invalid value '{value}' for {key} ({setting_type}): {reason}")]
    TypeCoercion {
        key: String,
        setting_type: SettingType,
        value: String,
        reason: String,
    },

    #[error("Unknown settings not declared in schema: {}", .0.join(", "))]
    UnknownSettings(Vec<String>),

    // -------------------------------------------------------------------------
    // Accessor Errors
    // -------------------------------------------------------------------------
    #[error("Unknown setting '{0}'")]
    UnknownKey(String),

    #[error("Type mismatch for {key}: expected {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: String,
    },

    // -------------------------------------------------------------------------
    // I/O and Parse Errors
    // -------------------------------------------------------------------------
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse '{origin}' at line {line}: {reason}")]
    Parse {
        origin: String,
        line: usize,
        reason: String,
    },

    #[error("Failed to serialize data: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl Error {
    /// Check if this error was raised while assembling a schema
    #[must_use]
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Error::DuplicateDefinition(_)
                | Error::UnknownOverrideTarget(_)
                | Error::InvalidDefault { .. }
                | Error::SchemaFrozen
        )
    }

    /// Check if this error was raised while resolving raw input
    #[must_use]
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            Error::MissingRequiredSetting(_)
                | Error::TypeCoercion { .. }
                | Error::UnknownSettings(_)
                | Error::FileRead { .. }
                | Error::Parse { .. }
        )
    }

    /// The setting key this error refers to, if any
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Error::DuplicateDefinition(key)
            | Error::UnknownOverrideTarget(key)
            | Error::MissingRequiredSetting(key)
            | Error::UnknownKey(key) => Some(key),
            Error::InvalidDefault { key, .. }
            | Error::TypeCoercion { key, .. }
            | Error::TypeMismatch { key, .. } => Some(key),
            _ => None,
        }
    }
}

// =============================================================================
// Filesystem Helper Functions
// =============================================================================

use std::path::Path;

/// Read a whole file into a string with proper error handling
pub(crate) fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_coercion_message_names_key_type_and_value() {
        let err = Error::TypeCoercion {
            key: "consumer.request.timeout.ms".into(),
            setting_type: SettingType::Int,
            value: "abc".into(),
            reason: "not a valid integer".into(),
        };

        let msg = err.to_string();
        assert!(msg.contains("consumer.request.timeout.ms"));
        assert!(msg.contains("INT"));
        assert!(msg.contains("abc"));
        assert_eq!(err.key(), Some("consumer.request.timeout.ms"));
        assert!(err.is_resolution_error());
        assert!(!err.is_schema_error());
    }

    #[test]
    fn test_schema_error_predicates() {
        assert!(Error::DuplicateDefinition("id".into()).is_schema_error());
        assert!(Error::SchemaFrozen.is_schema_error());
        assert_eq!(Error::SchemaFrozen.key(), None);
        assert!(!Error::UnknownKey("x".into()).is_schema_error());
    }

    #[test]
    fn test_file_read_keeps_source() {
        use std::error::Error as _;

        let err = read_file(Path::new("/definitely/not/here.properties")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/definitely/not/here.properties"));
    }
}
