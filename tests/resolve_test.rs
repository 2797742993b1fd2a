//! Resolution tests
//!
//! Raw input coercion per type, defaults, required settings, unknown keys
//! and environment overrides.

mod common;

use common::{base_schema, init_logging, typed_schema};
use confdef::{
    resolve, ConfigValue, Error, MapEnvSource, RawSettings, Resolver, Schema, SettingDefinition,
    SettingType, ValueSource,
};
use std::sync::Arc;

#[test]
fn test_defaults_for_every_type() {
    init_logging();
    let config = resolve(typed_schema(), &RawSettings::new()).unwrap();

    assert_eq!(config.get_string("name").unwrap(), "rest");
    assert_eq!(config.get_int("threads").unwrap(), 1);
    assert_eq!(config.get_long("timeout.ms").unwrap(), 300_000);
    assert_eq!(config.get_double("ratio").unwrap(), 0.5);
    assert!(!config.get_bool("debug").unwrap());
    assert_eq!(config.get_list("servers").unwrap(), ["a:1", "b:2"]);
    assert_eq!(config.get_class("serializer").unwrap(), "json.Serializer");
}

#[test]
fn test_raw_values_for_every_type() {
    let raw = RawSettings::from([
        ("name", " padded "),
        ("threads", " 12 "),
        ("timeout.ms", "9000000000"),
        ("ratio", "2.5"),
        ("debug", "TRUE"),
        ("servers", "x:1 ,y:2,, z:3"),
        ("serializer", "avro.Serializer"),
    ]);
    let config = resolve(typed_schema(), &raw).unwrap();

    // Strings are kept verbatim
    assert_eq!(config.get_string("name").unwrap(), " padded ");
    assert_eq!(config.get_int("threads").unwrap(), 12);
    assert_eq!(config.get_long("timeout.ms").unwrap(), 9_000_000_000);
    assert_eq!(config.get_double("ratio").unwrap(), 2.5);
    assert!(config.get_bool("debug").unwrap());
    assert_eq!(config.get_list("servers").unwrap(), ["x:1", "y:2", "", "z:3"]);
    assert_eq!(config.get_class("serializer").unwrap(), "avro.Serializer");

    for key in ["name", "threads", "servers"] {
        assert_eq!(config.source(key).unwrap(), ValueSource::Raw);
    }
}

#[test]
fn test_empty_list_input() {
    let config = resolve(typed_schema(), &RawSettings::from([("servers", "  ")])).unwrap();
    assert!(config.get_list("servers").unwrap().is_empty());
}

#[test]
fn test_coercion_failures() {
    let cases = [
        ("threads", "abc"),
        ("threads", "2147483648"),
        ("timeout.ms", "1.5"),
        ("ratio", "fast"),
        ("debug", "yes"),
        ("debug", "1"),
    ];

    for (key, value) in cases {
        let err = resolve(typed_schema(), &RawSettings::from([(key, value)])).unwrap_err();
        match &err {
            Error::TypeCoercion {
                key: k, value: v, ..
            } => {
                assert_eq!(k, key);
                assert_eq!(v, value);
            }
            other => panic!("expected TypeCoercion for {key}={value}, got {other}"),
        }
        assert!(err.is_resolution_error());
        // Message names key, type and value
        let message = err.to_string();
        assert!(message.contains(key) && message.contains(value), "{message}");
    }
}

#[test]
fn test_missing_required_setting() {
    let mut builder = Schema::builder();
    builder
        .define(SettingDefinition::new("id", SettingType::String).default_value(""))
        .unwrap()
        .define(SettingDefinition::new("bootstrap.servers", SettingType::String))
        .unwrap();
    let schema = Arc::new(builder.build().unwrap());

    let err = resolve(Arc::clone(&schema), &RawSettings::new()).unwrap_err();
    assert_eq!(err.key(), Some("bootstrap.servers"));
    assert!(matches!(err, Error::MissingRequiredSetting(_)));

    let config = resolve(schema, &RawSettings::from([("bootstrap.servers", "kafka:9092")])).unwrap();
    assert_eq!(config.get_string("bootstrap.servers").unwrap(), "kafka:9092");
}

#[test]
fn test_every_key_has_a_value() {
    let schema = Arc::new(typed_schema());
    let config = resolve(Arc::clone(&schema), &RawSettings::from([("threads", "3")])).unwrap();
    for name in schema.names() {
        assert!(config.contains(name), "missing {name}");
        assert!(config.value(name).is_ok());
    }
}

#[test]
fn test_unknown_key_access() {
    let config = resolve(base_schema(), &RawSettings::new()).unwrap();
    assert!(matches!(config.get_int("nonexistent"), Err(Error::UnknownKey(ref k)) if k == "nonexistent"));
    assert!(matches!(config.get_string("nonexistent"), Err(Error::UnknownKey(_))));
    assert!(matches!(config.source("nonexistent"), Err(Error::UnknownKey(_))));
}

#[test]
fn test_unknown_raw_keys_lenient_and_strict() {
    let raw = RawSettings::from([("port", "8082"), ("legacy.setting", "1"), ("typo.prot", "9")]);

    let config = resolve(base_schema(), &raw).unwrap();
    assert_eq!(config.get_int("port").unwrap(), 8082);
    assert_eq!(
        config.unknown_keys().keys().collect::<Vec<_>>(),
        vec!["legacy.setting", "typo.prot"]
    );

    let err = Resolver::new(base_schema()).strict(true).resolve(&raw).unwrap_err();
    match err {
        Error::UnknownSettings(keys) => assert_eq!(keys, vec!["legacy.setting", "typo.prot"]),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_idempotent_resolution() {
    let schema = Arc::new(typed_schema());
    let raw = RawSettings::from([("threads", "4"), ("servers", "a,b")]);

    let first = resolve(Arc::clone(&schema), &raw).unwrap();
    let second = resolve(Arc::clone(&schema), &raw).unwrap();
    assert_eq!(first, second);

    // Re-resolving the rendered values gives the same configuration
    let again = resolve(schema, &first.to_raw()).unwrap();
    for name in ["name", "threads", "timeout.ms", "ratio", "debug", "servers", "serializer"] {
        assert_eq!(first.value(name).unwrap(), again.value(name).unwrap());
    }
}

#[test]
fn test_environment_override() {
    let env = MapEnvSource::new()
        .with("KAFKA_REST_PORT", "9090")
        .with("KAFKA_REST_ZOOKEEPER_CONNECT", "zk-env:2181");

    let config = Resolver::new(base_schema())
        .with_env_prefix("KAFKA_REST")
        .with_env_source(Arc::new(env))
        .resolve(&RawSettings::from([("port", "8082")]))
        .unwrap();

    assert_eq!(config.get_int("port").unwrap(), 9090);
    assert_eq!(config.source("port").unwrap(), ValueSource::Environment);
    assert_eq!(config.get_string("zookeeper.connect").unwrap(), "zk-env:2181");
    assert_eq!(config.source("response.mediatype.default").unwrap(), ValueSource::Default);
}

#[test]
fn test_validator_on_raw_input() {
    let err = resolve(base_schema(), &RawSettings::from([("port", "70000")])).unwrap_err();
    assert!(matches!(err, Error::TypeCoercion { ref key, .. } if key == "port"));
}

#[test]
fn test_typed_get() {
    let config = resolve(typed_schema(), &RawSettings::from([("threads", "8")])).unwrap();

    let threads: usize = config.get("threads").unwrap();
    assert_eq!(threads, 8);
    let timeout: u64 = config.get("timeout.ms").unwrap();
    assert_eq!(timeout, 300_000);
    let servers: Vec<String> = config.get("servers").unwrap();
    assert_eq!(servers, ["a:1", "b:2"]);

    let negative = resolve(typed_schema(), &RawSettings::from([("threads", "-1")])).unwrap();
    assert!(matches!(negative.get::<u32>("threads"), Err(Error::TypeMismatch { .. })));
    assert!(matches!(config.get::<bool>("threads"), Err(Error::TypeMismatch { .. })));
}

#[test]
fn test_describe_output() {
    let config = resolve(typed_schema(), &RawSettings::from([("debug", "true")])).unwrap();
    let rows = config.describe();

    assert_eq!(rows.len(), 7);
    let debug = rows.iter().find(|r| r.name == "debug").unwrap();
    assert_eq!(debug.setting_type, SettingType::Boolean);
    assert_eq!(debug.default, Some(ConfigValue::Boolean(false)));
    assert_eq!(debug.value, ConfigValue::Boolean(true));
    assert_eq!(debug.source, ValueSource::Raw);

    let json: serde_json::Value = serde_json::from_str(&config.describe_json().unwrap()).unwrap();
    assert_eq!(json[0]["name"], "name");
    assert_eq!(json[1]["type"], "int");
    assert_eq!(json[5]["value"], serde_json::json!(["a:1", "b:2"]));
    assert_eq!(json[4]["value"], true);
}
