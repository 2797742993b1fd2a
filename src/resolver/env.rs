//! Environment variable overrides
//!
//! Helper struct to encapsulate the lookup of setting overrides in the
//! process environment.

use std::collections::HashMap;
use std::env::VarError;
use std::sync::Arc;

/// Source of environment variables
///
/// Injected into the [`Resolver`](super::Resolver) so tests can supply a
/// fixed environment instead of mutating the real one.
pub trait EnvSource: Send + Sync {
    fn var(&self, key: &str) -> Result<String, VarError>;
}

/// Reads the real process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultEnvSource;

impl EnvSource for DefaultEnvSource {
    fn var(&self, key: &str) -> Result<String, VarError> {
        std::env::var(key)
    }
}

/// Fixed in-memory environment
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvSource for MapEnvSource {
    fn var(&self, key: &str) -> Result<String, VarError> {
        self.vars.get(key).cloned().ok_or(VarError::NotPresent)
    }
}

/// Handles environment variable lookups for setting keys
pub(crate) struct EnvironmentHandler {
    prefix: Option<String>,
    source: Arc<dyn EnvSource>,
}

impl EnvironmentHandler {
    pub fn new(prefix: Option<String>, source: Arc<dyn EnvSource>) -> Self {
        Self { prefix, source }
    }

    /// Get the environment variable name for a setting key
    ///
    /// Returns None if env var overrides are disabled.
    /// Format: {PREFIX}_{KEY} (all uppercase, dots and dashes become underscores)
    pub fn get_env_var_name(&self, key: &str) -> Option<String> {
        self.prefix.as_ref().map(|prefix| {
            let env_key = key.replace(['.', '-'], "_").to_uppercase();
            format!("{}_{}", prefix.to_uppercase(), env_key)
        })
    }

    /// Raw override for a setting key, if one is set
    pub fn get_env_override(&self, key: &str) -> Option<String> {
        let env_var_name = self.get_env_var_name(key)?;
        self.source.var(&env_var_name).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_var_name() {
        let handler = EnvironmentHandler::new(Some("kafka_rest".into()), Arc::new(MapEnvSource::new()));
        assert_eq!(
            handler.get_env_var_name("consumer.request.timeout.ms").as_deref(),
            Some("KAFKA_REST_CONSUMER_REQUEST_TIMEOUT_MS")
        );
    }

    #[test]
    fn test_disabled_without_prefix() {
        let env = MapEnvSource::new().with("PRODUCER_THREADS", "10");
        let handler = EnvironmentHandler::new(None, Arc::new(env));
        assert_eq!(handler.get_env_var_name("producer.threads"), None);
        assert_eq!(handler.get_env_override("producer.threads"), None);
    }

    #[test]
    fn test_override_lookup() {
        let env = MapEnvSource::new().with("REST_PRODUCER_THREADS", "10");
        let handler = EnvironmentHandler::new(Some("REST".into()), Arc::new(env));
        assert_eq!(handler.get_env_override("producer.threads").as_deref(), Some("10"));
        assert_eq!(handler.get_env_override("consumer.threads"), None);
    }
}
