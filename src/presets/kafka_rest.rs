//! Settings for the Kafka REST proxy
//!
//! The schema derives from [`rest::base_builder`](super::rest::base_builder):
//! the two response media type settings are overridden to prefer the
//! versioned Kafka types, and the proxy's own settings are appended.

use std::path::Path;
use std::sync::Arc;

use log::info;

use super::rest::{self, RESPONSE_MEDIATYPE_DEFAULT, RESPONSE_MEDIATYPE_PREFERRED};
use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigValue, Importance, Schema, SettingDefinition, SettingType};
use crate::error::Result;
use crate::resolver::{FromConfig, ResolvedConfig, Resolver};
use crate::source::RawSettings;

pub const ID: &str = "id";
pub const ZOOKEEPER_CONNECT: &str = "zookeeper.connect";
pub const BOOTSTRAP_SERVERS: &str = "bootstrap.servers";
pub const PRODUCER_THREADS: &str = "producer.threads";
pub const CONSUMER_ITERATOR_TIMEOUT_MS: &str = "consumer.iterator.timeout.ms";
pub const CONSUMER_ITERATOR_BACKOFF_MS: &str = "consumer.iterator.backoff.ms";
pub const CONSUMER_REQUEST_TIMEOUT_MS: &str = "consumer.request.timeout.ms";
pub const CONSUMER_REQUEST_MAX_MESSAGES: &str = "consumer.request.max.messages";
pub const CONSUMER_THREADS: &str = "consumer.threads";
pub const CONSUMER_INSTANCE_TIMEOUT_MS: &str = "consumer.instance.timeout.ms";

/// Most specific response media type the proxy produces
pub const KAFKA_V1_JSON: &str = "application/vnd.kafka.v1+json";
pub const KAFKA_DEFAULT_JSON: &str = "application/vnd.kafka+json";
pub const JSON: &str = "application/json";

/// Response media types, most preferred first
pub const PREFERRED_RESPONSE_TYPES: [&str; 3] = [KAFKA_V1_JSON, KAFKA_DEFAULT_JSON, JSON];

/// Prefix for environment overrides, e.g. `KAFKA_REST_PRODUCER_THREADS`
pub const ENV_PREFIX: &str = "KAFKA_REST";

const ID_DOC: &str = "Unique ID for this REST server instance. This is used in generating unique IDs for \
    consumers that do not specify their ID. The ID is empty by default, which makes a single server setup \
    easier to get up and running, but is not safe for multi-server deployments where automatic consumer IDs \
    are used.";

const ZOOKEEPER_CONNECT_DOC: &str = "Specifies the ZooKeeper connection string in the form hostname:port \
    where host and port are the host and port of a ZooKeeper server. To allow connecting through other \
    ZooKeeper nodes when that ZooKeeper machine is down you can also specify multiple hosts in the form \
    hostname1:port1,hostname2:port2,hostname3:port3.\n\nThe server may also have a ZooKeeper chroot path as \
    part of its ZooKeeper connection string which puts its data under some path in the global ZooKeeper \
    namespace. If so the consumer should use the same chroot path in its connection string. For example to \
    give a chroot path of /chroot/path you would give the connection string as \
    hostname1:port1,hostname2:port2,hostname3:port3/chroot/path.";

const BOOTSTRAP_SERVERS_DOC: &str = "A list of host/port pairs to use for establishing the initial \
    connection to the Kafka cluster. Data will be load balanced over all servers irrespective of which \
    servers are specified here for bootstrapping. This list only impacts the initial hosts used to discover \
    the full set of servers. This list should be in the form host1:port1,host2:port2,... Since these \
    servers are just used for the initial connection to discover the full cluster membership (which may \
    change dynamically), this list need not contain the full set of servers (you may want more than one, \
    though, in case a server is down). If no server in this list is available sending data will fail until \
    one becomes available.";

const CONSUMER_ITERATOR_TIMEOUT_MS_DOC: &str = "Timeout for blocking consumer iterator operations. This \
    should be set to a small enough value that it is possible to effectively peek() on the iterator.";

const CONSUMER_ITERATOR_BACKOFF_MS_DOC: &str = "Amount of time to backoff when an iterator runs out of \
    data. If a consumer has a dedicated worker thread, this is effectively the maximum error for the entire \
    request timeout. It should be small enough to closely target the timeout, but large enough to avoid \
    busy waiting.";

const CONSUMER_REQUEST_TIMEOUT_MS_DOC: &str = "The maximum total time to wait for messages for a request \
    if the maximum number of messages has not yet been reached.";

/// The REST proxy schema
///
/// # Example
///
/// ```
/// use confdef::presets::kafka_rest;
/// use confdef::{resolve, RawSettings};
///
/// # fn main() -> confdef::Result<()> {
/// let config = resolve(kafka_rest::schema()?, &RawSettings::from([("producer.threads", "10")]))?;
/// assert_eq!(config.get_int(kafka_rest::PRODUCER_THREADS)?, 10);
/// assert_eq!(config.get_string(kafka_rest::ZOOKEEPER_CONNECT)?, "localhost:2181");
/// # Ok(())
/// # }
/// ```
pub fn schema() -> Result<Schema> {
    let mut builder = rest::base_builder()?;
    builder
        .define_override(
            SettingDefinition::new(RESPONSE_MEDIATYPE_PREFERRED, SettingType::List)
                .default_value(ConfigValue::from(&PREFERRED_RESPONSE_TYPES[..]))
                .importance(Importance::High)
                .doc(rest::RESPONSE_MEDIATYPE_PREFERRED_DOC),
        )?
        .define_override(
            SettingDefinition::new(RESPONSE_MEDIATYPE_DEFAULT, SettingType::String)
                .default_value(KAFKA_V1_JSON)
                .importance(Importance::High)
                .doc(rest::RESPONSE_MEDIATYPE_DEFAULT_DOC),
        )?
        .define(
            SettingDefinition::new(ID, SettingType::String)
                .default_value("")
                .importance(Importance::High)
                .doc(ID_DOC),
        )?
        .define(
            SettingDefinition::new(ZOOKEEPER_CONNECT, SettingType::String)
                .default_value("localhost:2181")
                .importance(Importance::High)
                .doc(ZOOKEEPER_CONNECT_DOC),
        )?
        .define(
            SettingDefinition::new(BOOTSTRAP_SERVERS, SettingType::String)
                .default_value("localhost:9092")
                .importance(Importance::High)
                .doc(BOOTSTRAP_SERVERS_DOC),
        )?
        .define(
            SettingDefinition::new(PRODUCER_THREADS, SettingType::Int)
                .default_value("5")
                .importance(Importance::Low)
                .doc("Number of threads to run produce requests on."),
        )?
        .define(
            SettingDefinition::new(CONSUMER_ITERATOR_TIMEOUT_MS, SettingType::Int)
                .default_value("1")
                .importance(Importance::Low)
                .doc(CONSUMER_ITERATOR_TIMEOUT_MS_DOC),
        )?
        .define(
            SettingDefinition::new(CONSUMER_ITERATOR_BACKOFF_MS, SettingType::Int)
                .default_value("50")
                .importance(Importance::Low)
                .doc(CONSUMER_ITERATOR_BACKOFF_MS_DOC),
        )?
        .define(
            SettingDefinition::new(CONSUMER_REQUEST_TIMEOUT_MS, SettingType::Int)
                .default_value("1000")
                .importance(Importance::Medium)
                .doc(CONSUMER_REQUEST_TIMEOUT_MS_DOC),
        )?
        .define(
            SettingDefinition::new(CONSUMER_REQUEST_MAX_MESSAGES, SettingType::Int)
                .default_value("100")
                .importance(Importance::Medium)
                .doc("Maximum number of messages returned in a single request."),
        )?
        .define(
            SettingDefinition::new(CONSUMER_THREADS, SettingType::Int)
                .default_value("1")
                .importance(Importance::Medium)
                .doc("Number of threads to run consumer requests on."),
        )?
        .define(
            SettingDefinition::new(CONSUMER_INSTANCE_TIMEOUT_MS, SettingType::Int)
                .default_value("300000")
                .importance(Importance::Low)
                .doc("Amount of idle time before a consumer instance is automatically destroyed."),
        )?;
    builder.build()
}

/// Typed view of the proxy settings
///
/// Every `INT` setting maps to `i32`, so any value the schema accepts can be
/// extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct KafkaRestSettings {
    pub id: String,
    pub port: i32,
    pub listeners: Vec<String>,
    pub response_mediatype_preferred: Vec<String>,
    pub response_mediatype_default: String,
    pub zookeeper_connect: String,
    pub bootstrap_servers: String,
    pub producer_threads: i32,
    pub consumer_iterator_timeout_ms: i32,
    pub consumer_iterator_backoff_ms: i32,
    pub consumer_request_timeout_ms: i32,
    pub consumer_request_max_messages: i32,
    pub consumer_threads: i32,
    pub consumer_instance_timeout_ms: i32,
}

impl FromConfig for KafkaRestSettings {
    fn from_config(config: &ResolvedConfig) -> Result<Self> {
        Ok(Self {
            id: config.get(ID)?,
            port: config.get(rest::PORT)?,
            listeners: config.get(rest::LISTENERS)?,
            response_mediatype_preferred: config.get(RESPONSE_MEDIATYPE_PREFERRED)?,
            response_mediatype_default: config.get(RESPONSE_MEDIATYPE_DEFAULT)?,
            zookeeper_connect: config.get(ZOOKEEPER_CONNECT)?,
            bootstrap_servers: config.get(BOOTSTRAP_SERVERS)?,
            producer_threads: config.get(PRODUCER_THREADS)?,
            consumer_iterator_timeout_ms: config.get(CONSUMER_ITERATOR_TIMEOUT_MS)?,
            consumer_iterator_backoff_ms: config.get(CONSUMER_ITERATOR_BACKOFF_MS)?,
            consumer_request_timeout_ms: config.get(CONSUMER_REQUEST_TIMEOUT_MS)?,
            consumer_request_max_messages: config.get(CONSUMER_REQUEST_MAX_MESSAGES)?,
            consumer_threads: config.get(CONSUMER_THREADS)?,
            consumer_instance_timeout_ms: config.get(CONSUMER_INSTANCE_TIMEOUT_MS)?,
        })
    }
}

/// Resolved proxy configuration together with its typed view
#[derive(Debug, Clone)]
pub struct KafkaRestConfig {
    config: ResolvedConfig,
    settings: KafkaRestSettings,
}

impl KafkaRestConfig {
    /// Resolver for the proxy schema using the system clock
    pub fn resolver() -> Result<Resolver> {
        Ok(Resolver::new(schema()?).with_clock(Arc::new(SystemClock)))
    }

    /// All defaults, no input
    pub fn load() -> Result<Self> {
        Self::from_properties(&RawSettings::new())
    }

    /// Resolve in-memory properties
    pub fn from_properties(raw: &RawSettings) -> Result<Self> {
        Self::from_resolved(Self::resolver()?.resolve(raw)?)
    }

    /// Resolve a properties file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_resolved(Self::resolver()?.resolve_file(path)?)
    }

    /// Wrap a configuration resolved by a customized [`Resolver`]
    pub fn from_resolved(config: ResolvedConfig) -> Result<Self> {
        let settings = config.extract::<KafkaRestSettings>()?;
        info!(
            "REST proxy '{}' configured with {} producer and {} consumer threads",
            settings.id, settings.producer_threads, settings.consumer_threads
        );
        Ok(Self { config, settings })
    }

    pub fn settings(&self) -> &KafkaRestSettings {
        &self.settings
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        self.config.clock()
    }
}

impl std::ops::Deref for KafkaRestConfig {
    type Target = ResolvedConfig;

    fn deref(&self) -> &Self::Target {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::MockClock;

    #[test]
    fn test_override_keeps_base_position() {
        let base = rest::base_schema().unwrap();
        let derived = schema().unwrap();

        let base_names: Vec<_> = base.names().collect();
        let derived_names: Vec<_> = derived.names().take(base_names.len()).collect();
        assert_eq!(base_names, derived_names);

        assert_eq!(
            derived.get(RESPONSE_MEDIATYPE_DEFAULT).unwrap().default(),
            Some(&ConfigValue::String(KAFKA_V1_JSON.into()))
        );
        assert_eq!(
            base.get(RESPONSE_MEDIATYPE_DEFAULT).unwrap().default(),
            Some(&ConfigValue::String(JSON.into()))
        );
    }

    #[test]
    fn test_defaults() {
        let config = KafkaRestConfig::load().unwrap();
        let settings = config.settings();
        assert_eq!(settings.id, "");
        assert_eq!(settings.zookeeper_connect, "localhost:2181");
        assert_eq!(settings.bootstrap_servers, "localhost:9092");
        assert_eq!(settings.producer_threads, 5);
        assert_eq!(settings.consumer_iterator_timeout_ms, 1);
        assert_eq!(settings.consumer_iterator_backoff_ms, 50);
        assert_eq!(settings.consumer_request_timeout_ms, 1000);
        assert_eq!(settings.consumer_request_max_messages, 100);
        assert_eq!(settings.consumer_threads, 1);
        assert_eq!(settings.consumer_instance_timeout_ms, 300_000);
        assert_eq!(settings.response_mediatype_preferred, PREFERRED_RESPONSE_TYPES);
        assert_eq!(settings.response_mediatype_default, KAFKA_V1_JSON);
        assert_eq!(settings.port, 8080);
    }

    #[test]
    fn test_from_properties_with_mock_clock() {
        let clock = Arc::new(MockClock::new(0));
        let resolved = KafkaRestConfig::resolver()
            .unwrap()
            .with_clock(clock.clone())
            .resolve(&RawSettings::from([("producer.threads", "10"), ("id", "rest-1")]))
            .unwrap();
        let config = KafkaRestConfig::from_resolved(resolved).unwrap();

        assert_eq!(config.settings().producer_threads, 10);
        assert_eq!(config.settings().id, "rest-1");
        assert_eq!(config.get_int(PRODUCER_THREADS).unwrap(), 10);

        clock.advance(std::time::Duration::from_secs(1));
        assert_eq!(config.clock().milliseconds(), 1000);
    }

    #[test]
    fn test_zero_threads_resolve() {
        let raw = RawSettings::from([("producer.threads", "0"), ("consumer.threads", "0")]);
        let config = KafkaRestConfig::from_properties(&raw).unwrap();
        assert_eq!(config.settings().producer_threads, 0);
        assert_eq!(config.settings().consumer_threads, 0);
    }

    #[test]
    fn test_settings_accept_every_int() {
        let schema = schema().unwrap();
        let int_keys: Vec<&str> = schema
            .iter()
            .filter(|def| def.setting_type == SettingType::Int)
            .map(|def| def.name.as_str())
            .collect();
        assert!(int_keys.contains(&CONSUMER_ITERATOR_TIMEOUT_MS));
        assert!(int_keys.contains(&rest::PORT));

        for value in [i32::MIN, -1, 0, 70_000, i32::MAX] {
            let raw: RawSettings = int_keys.iter().map(|key| (*key, value)).collect();
            let config = KafkaRestConfig::from_properties(&raw)
                .unwrap_or_else(|e| panic!("{value} rejected: {e}"));
            assert_eq!(config.settings().consumer_iterator_timeout_ms, value);
            assert_eq!(config.settings().port, value);
        }
    }
}
