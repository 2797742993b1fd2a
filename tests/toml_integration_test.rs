//! TOML source integration tests

#![cfg(feature = "toml")]

mod common;

use common::{base_schema, typed_schema, write_settings_file};
use confdef::{resolve_from_file, Error, RawSettings, SourceFormat, TomlFormat};

#[test]
fn test_toml_tables_flatten_to_dotted_keys() {
    let (_dir, path) = write_settings_file(
        "rest.toml",
        r#"
port = 8082

[zookeeper]
connect = "zk-toml:2181"

[response.mediatype]
default = "application/vnd.kafka.v1+json"
"#,
    );

    let config = resolve_from_file(base_schema(), &path).unwrap();
    assert_eq!(config.get_int("port").unwrap(), 8082);
    assert_eq!(config.get_string("zookeeper.connect").unwrap(), "zk-toml:2181");
    assert_eq!(
        config.get_string("response.mediatype.default").unwrap(),
        "application/vnd.kafka.v1+json"
    );
}

#[test]
fn test_toml_scalars_and_arrays() {
    let raw = TomlFormat
        .parse(
            r#"
name = "proxy"
threads = 4
ratio = 0.25
debug = true
servers = ["a:1", "b:2"]
"timeout.ms" = 1000
"#,
            "inline.toml",
        )
        .unwrap();

    assert_eq!(raw.get("servers"), Some("a:1,b:2"));
    assert_eq!(raw.get("debug"), Some("true"));

    let config = confdef::resolve(typed_schema(), &raw).unwrap();
    assert_eq!(config.get_string("name").unwrap(), "proxy");
    assert_eq!(config.get_int("threads").unwrap(), 4);
    assert_eq!(config.get_long("timeout.ms").unwrap(), 1000);
    assert_eq!(config.get_double("ratio").unwrap(), 0.25);
    assert!(config.get_bool("debug").unwrap());
    assert_eq!(config.get_list("servers").unwrap(), ["a:1", "b:2"]);
}

#[test]
fn test_toml_syntax_error() {
    let (_dir, path) = write_settings_file("broken.toml", "port = \n");
    let err = resolve_from_file(base_schema(), &path).unwrap_err();
    assert!(matches!(err, Error::Parse { .. }), "unexpected error: {err}");
}

#[test]
fn test_toml_file_via_raw_settings() {
    let (_dir, path) = write_settings_file("rest.toml", "port = 9000\n");
    let raw = RawSettings::from_file(&path).unwrap();
    assert_eq!(raw.get("port"), Some("9000"));
}
