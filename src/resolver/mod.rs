//! Resolution of raw input against a schema
//!
//! For every definition in the schema, in order:
//!
//! 1. an environment override (when an env prefix is configured) or a raw
//!    value is coerced to the declared type and checked against the
//!    definition's validator, failing with [`Error::TypeCoercion`];
//! 2. otherwise the declared default is used;
//! 3. otherwise resolution fails with [`Error::MissingRequiredSetting`].
//!
//! Raw keys the schema does not know are kept aside for diagnostics and
//! logged, unless the resolver is [`strict`](Resolver::strict).

mod env;
mod resolved;

pub use env::{DefaultEnvSource, EnvSource, MapEnvSource};
pub use resolved::{FromConfig, ResolvedConfig, SettingDescription, ValueSource};

use indexmap::IndexMap;
use log::{debug, info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::clock::{Clock, SystemClock};
use crate::config::{coerce, Schema};
use crate::error::{Error, Result};
use crate::source::{expand_home, format_for_path, RawSettings};
use env::EnvironmentHandler;
use resolved::ResolvedValue;

/// Resolve `raw` against `schema` with default resolver options
pub fn resolve(schema: impl Into<Arc<Schema>>, raw: &RawSettings) -> Result<ResolvedConfig> {
    Resolver::new(schema).resolve(raw)
}

/// Read the file at `path` and resolve it against `schema`
pub fn resolve_from_file(
    schema: impl Into<Arc<Schema>>,
    path: impl AsRef<Path>,
) -> Result<ResolvedConfig> {
    Resolver::new(schema).resolve_file(path)
}

/// Configurable resolver with a fluent API
///
/// # Example
///
/// ```rust
/// use confdef::{MapEnvSource, RawSettings, Resolver, Schema, SettingDefinition, SettingType};
/// use std::sync::Arc;
///
/// # fn main() -> confdef::Result<()> {
/// let mut builder = Schema::builder();
/// builder.define(SettingDefinition::new("producer.threads", SettingType::Int).default_value(5))?;
/// let schema = builder.build()?;
///
/// let config = Resolver::new(schema)
///     .with_env_prefix("KAFKA_REST")
///     .with_env_source(Arc::new(MapEnvSource::new().with("KAFKA_REST_PRODUCER_THREADS", "8")))
///     .resolve(&RawSettings::from([("producer.threads", "10")]))?;
///
/// // Environment wins over raw input
/// assert_eq!(config.get_int("producer.threads")?, 8);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Resolver {
    schema: Arc<Schema>,
    env_prefix: Option<String>,
    env_source: Arc<dyn EnvSource>,
    clock: Arc<dyn Clock>,
    strict: bool,
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("settings", &self.schema.len())
            .field("env_prefix", &self.env_prefix)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

impl Resolver {
    /// Create a resolver for `schema` using the system clock, no environment
    /// overrides and lenient handling of unknown keys
    pub fn new(schema: impl Into<Arc<Schema>>) -> Self {
        Self {
            schema: schema.into(),
            env_prefix: None,
            env_source: Arc::new(DefaultEnvSource),
            clock: Arc::new(SystemClock),
            strict: false,
        }
    }

    /// Enable environment variable overrides
    ///
    /// The variable name is `{PREFIX}_{KEY}`, upper-cased, with dots turned
    /// into underscores: prefix `KAFKA_REST` and key `producer.threads` read
    /// `KAFKA_REST_PRODUCER_THREADS`. Environment values win over raw input.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Replace the environment lookup (defaults to the process environment)
    #[must_use]
    pub fn with_env_source(mut self, source: Arc<dyn EnvSource>) -> Self {
        self.env_source = source;
        self
    }

    /// Attach a time source to the resolved configuration
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Reject raw keys that are not part of the schema
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Resolve in-memory raw settings
    pub fn resolve(&self, raw: &RawSettings) -> Result<ResolvedConfig> {
        let unknown: RawSettings = raw
            .iter()
            .filter(|(key, _)| !self.schema.contains(key))
            .collect();

        if self.strict && !unknown.is_empty() {
            return Err(Error::UnknownSettings(
                unknown.keys().map(String::from).collect(),
            ));
        }

        let env = EnvironmentHandler::new(self.env_prefix.clone(), Arc::clone(&self.env_source));
        let mut values = IndexMap::with_capacity(self.schema.len());
        let (mut from_raw, mut from_env) = (0usize, 0usize);

        for def in self.schema.iter() {
            let supplied = match env.get_env_override(&def.name) {
                Some(text) => {
                    debug!("Setting '{}' overridden by environment", def.name);
                    Some((text, ValueSource::Environment))
                }
                None => raw
                    .get(&def.name)
                    .map(|text| (text.to_string(), ValueSource::Raw)),
            };

            let resolved = match supplied {
                Some((text, source)) => {
                    let coercion_error = |reason: String| Error::TypeCoercion {
                        key: def.name.clone(),
                        setting_type: def.setting_type,
                        value: text.clone(),
                        reason,
                    };
                    let value = coerce(def.setting_type, &text).map_err(coercion_error)?;
                    def.validate(&value).map_err(coercion_error)?;
                    match source {
                        ValueSource::Environment => from_env += 1,
                        _ => from_raw += 1,
                    }
                    ResolvedValue { value, source }
                }
                None => match def.default() {
                    Some(default) => ResolvedValue {
                        value: default.clone(),
                        source: ValueSource::Default,
                    },
                    None => return Err(Error::MissingRequiredSetting(def.name.clone())),
                },
            };

            values.insert(def.name.clone(), resolved);
        }

        for key in unknown.keys() {
            warn!("Ignoring unknown setting '{key}'");
        }
        info!(
            "Resolved {} settings ({} from input, {} from environment, {} defaults, {} unknown ignored)",
            values.len(),
            from_raw,
            from_env,
            values.len() - from_raw - from_env,
            unknown.len()
        );

        Ok(ResolvedConfig::new(
            Arc::clone(&self.schema),
            values,
            unknown,
            Arc::clone(&self.clock),
        ))
    }

    /// Read a settings file and resolve it
    ///
    /// The format is picked from the file extension (see
    /// [`format_for_path`]). A leading `~` is expanded to the home directory.
    pub fn resolve_file(&self, path: impl AsRef<Path>) -> Result<ResolvedConfig> {
        let path = expand_home(path.as_ref());
        let raw = format_for_path(&path)?.read(&path)?;
        info!("Loaded {} raw settings from '{}'", raw.len(), path.display());
        self.resolve(&raw)
    }
}

// =============================================================================
// Tests
// =============================================================================
