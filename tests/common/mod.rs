//! Common test utilities for confdef integration tests
//!
//! Provides shared schemas and helpers for writing settings files.

#![allow(dead_code)]

use confdef::{Importance, Schema, SettingDefinition, SettingType, Validator};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Test Schemas
// =============================================================================

/// A small base schema in the shape of a generic REST server
pub fn base_schema() -> Schema {
    let mut builder = Schema::builder();
    builder
        .define(
            SettingDefinition::new("port", SettingType::Int)
                .default_value(8080)
                .importance(Importance::Low)
                .doc("Port to listen on for new connections.")
                .validator(Validator::range(0, 65535)),
        )
        .unwrap()
        .define(
            SettingDefinition::new("response.mediatype.default", SettingType::String)
                .default_value("application/json")
                .importance(Importance::High)
                .doc("Default response media type."),
        )
        .unwrap()
        .define(
            SettingDefinition::new("zookeeper.connect", SettingType::String)
                .default_value("localhost:2181")
                .importance(Importance::High),
        )
        .unwrap();
    builder.build().unwrap()
}

/// One setting of every type
pub fn typed_schema() -> Schema {
    let mut builder = Schema::builder();
    builder
        .define(SettingDefinition::new("name", SettingType::String).default_value("rest"))
        .unwrap()
        .define(SettingDefinition::new("threads", SettingType::Int).default_value(1))
        .unwrap()
        .define(SettingDefinition::new("timeout.ms", SettingType::Long).default_value(300_000i64))
        .unwrap()
        .define(SettingDefinition::new("ratio", SettingType::Double).default_value(0.5))
        .unwrap()
        .define(SettingDefinition::new("debug", SettingType::Boolean).default_value(false))
        .unwrap()
        .define(SettingDefinition::new("servers", SettingType::List).default_value("a:1, b:2"))
        .unwrap()
        .define(
            SettingDefinition::new("serializer", SettingType::Class).default_value("json.Serializer"),
        )
        .unwrap();
    builder.build().unwrap()
}

// =============================================================================
// File Helpers
// =============================================================================

/// Write `content` to `name` inside a fresh temp dir
///
/// The returned `TempDir` must be kept alive for the file to exist.
pub fn write_settings_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    (dir, path)
}

/// Route `log` output through env_logger when `RUST_LOG` is set
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
