//! Raw setting sources
//!
//! [`RawSettings`] is the flat, untyped key/value input to resolution. It can
//! be built in memory (from parsed flags, environment, tests) or read from a
//! file through a [`SourceFormat`].

mod properties;

#[cfg(feature = "json")]
mod json_format;
#[cfg(feature = "toml")]
mod toml_format;
#[cfg(feature = "yaml")]
mod yaml_format;

pub use properties::{parse_properties, PropertiesFormat};

#[cfg(feature = "json")]
pub use json_format::JsonFormat;
#[cfg(feature = "toml")]
pub use toml_format::TomlFormat;
#[cfg(feature = "yaml")]
pub use yaml_format::YamlFormat;

use indexmap::IndexMap;
use std::path::{Path, PathBuf};

use crate::error::{read_file, Error, Result};

// =============================================================================
// Raw Settings
// =============================================================================

/// Flat mapping of setting keys to raw textual values
///
/// Insertion order is preserved; setting an existing key replaces its value.
///
/// # Example
///
/// ```
/// use confdef::RawSettings;
///
/// let mut raw = RawSettings::new();
/// raw.set("producer.threads", 10).set("id", "rest-1");
///
/// assert_eq!(raw.get("producer.threads"), Some("10"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSettings {
    values: IndexMap<String, String>,
}

impl RawSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value. Primitives are stored in their textual form.
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.values.insert(key.into(), value.to_string());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.shift_remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Key/value pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Overlay `other` on top of `self`; values from `other` win
    pub fn merge(&mut self, other: RawSettings) -> &mut Self {
        self.values.extend(other.values);
        self
    }

    /// Read a file, picking the format from its extension
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = expand_home(path.as_ref());
        format_for_path(&path)?.read(&path)
    }
}

impl<K, V> FromIterator<(K, V)> for RawSettings
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut settings = RawSettings::new();
        for (key, value) in iter {
            settings.set(key, value);
        }
        settings
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for RawSettings
where
    K: Into<String>,
    V: ToString,
{
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

// =============================================================================
// Source Formats
// =============================================================================

/// Trait for file formats that can produce [`RawSettings`]
pub trait SourceFormat {
    /// File extension for this format (e.g., "properties", "json")
    fn extension(&self) -> &str;

    /// Parse text into raw settings. `origin` is used in error messages.
    fn parse(&self, content: &str, origin: &str) -> Result<RawSettings>;

    /// Read and parse a file.
    ///
    /// The whole file is read before parsing starts; the handle is released
    /// before this returns, whether reading or parsing failed.
    fn read(&self, path: &Path) -> Result<RawSettings> {
        let content = read_file(path)?;
        self.parse(&content, &path.display().to_string())
    }
}

/// Choose a source format from a file extension.
///
/// `.json`, `.toml`, `.yaml`/`.yml` map to their formats when the matching
/// feature is enabled; anything else is treated as `.properties`.
pub fn format_for_path(path: &Path) -> Result<Box<dyn SourceFormat>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "json" => {
            #[cfg(feature = "json")]
            return Ok(Box::new(JsonFormat));
            #[cfg(not(feature = "json"))]
            return Err(format_disabled(path, &extension));
        }
        "toml" => {
            #[cfg(feature = "toml")]
            return Ok(Box::new(TomlFormat));
            #[cfg(not(feature = "toml"))]
            return Err(format_disabled(path, &extension));
        }
        "yaml" | "yml" => {
            #[cfg(feature = "yaml")]
            return Ok(Box::new(YamlFormat));
            #[cfg(not(feature = "yaml"))]
            return Err(format_disabled(path, &extension));
        }
        _ => Ok(Box::new(PropertiesFormat)),
    }
}

#[allow(dead_code)]
fn format_disabled(path: &Path, extension: &str) -> Error {
    Error::Parse {
        origin: path.display().to_string(),
        line: 0,
        reason: format!("support for .{extension} files is not enabled"),
    }
}

/// Expand a leading `~` to the home directory
pub(crate) fn expand_home(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(path.strip_prefix("~").unwrap_or(path));
        }
    }
    path.to_path_buf()
}

#[cfg(any(feature = "json", feature = "toml", feature = "yaml"))]
fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

// =============================================================================
// Tests
// =============================================================================
