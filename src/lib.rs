//! # confdef - Typed Configuration Definitions
//!
//! A schema-driven configuration registry for long-running services.
//! Settings are declared once with a type, default, importance and
//! documentation; raw string input is then validated and coerced into an
//! immutable, typed configuration.
//!
//! ## Features
//!
//! - **Schema Builder**: `define` adds a setting, `define_override` replaces an
//!   inherited one. Mixing them up is an error, never a silent surprise.
//! - **Derived Schemas**: a service layers its settings on top of a shared base
//!   schema without mutating it
//! - **Resolution**: raw values from properties files, JSON/TOML/YAML files,
//!   in-memory maps or environment variables are coerced and validated
//! - **Typed Access**: `get_int`, `get_list`, `get::<u16>` and `#[derive(FromConfig)]`
//! - **Docs**: describe the schema as JSON, Markdown or reStructuredText
//!
//! ## Quick Start
//!
//! ```rust
//! use confdef::{resolve, Importance, RawSettings, Schema, SettingDefinition, SettingType};
//!
//! # fn main() -> confdef::Result<()> {
//! // Base schema shared by every REST service
//! let mut base = Schema::builder();
//! base.define(
//!     SettingDefinition::new("port", SettingType::Int)
//!         .default_value(8080)
//!         .importance(Importance::Low)
//!         .doc("Port to listen on for new connections."),
//! )?;
//! let base = base.build()?;
//!
//! // A specialized service overrides and extends it
//! let mut derived = base.derive();
//! derived
//!     .define_override(SettingDefinition::new("port", SettingType::Int).default_value(8082))?
//!     .define(SettingDefinition::new("producer.threads", SettingType::Int).default_value("5"))?;
//! let schema = derived.build()?;
//!
//! let config = resolve(schema, &RawSettings::from([("producer.threads", "10")]))?;
//! assert_eq!(config.get_int("port")?, 8082);
//! assert_eq!(config.get_int("producer.threads")?, 10);
//! # Ok(())
//! # }
//! ```
//!
//! ## Reading Files
//!
//! ```rust,no_run
//! use confdef::presets::kafka_rest;
//!
//! # fn main() -> confdef::Result<()> {
//! let config = confdef::resolve_from_file(kafka_rest::schema()?, "/etc/kafka-rest/kafka-rest.properties")?;
//! println!("{}", config.describe_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! The format is picked from the file extension: `.json` (feature `json`,
//! default), `.toml` (feature `toml`), `.yaml`/`.yml` (feature `yaml`);
//! anything else is read as Java-style `.properties`.

pub mod clock;
pub mod config;
pub mod docs;
pub mod error;
pub mod presets;
pub mod resolver;
pub mod source;

// Re-exports for convenience
pub use clock::{Clock, MockClock, SystemClock};
pub use config::{
    coerce, split_list, ConfigValue, DefaultValue, FromConfigValue, Importance, Schema,
    SchemaBuilder, SchemaOp, SettingDefinition, SettingType, Validator,
};
pub use docs::{generate_docs, DocsConfig, DocsFormat};
pub use error::{Error, Result};
pub use resolver::{
    resolve, resolve_from_file, DefaultEnvSource, EnvSource, FromConfig, MapEnvSource,
    ResolvedConfig, Resolver, SettingDescription, ValueSource,
};
pub use source::{format_for_path, parse_properties, PropertiesFormat, RawSettings, SourceFormat};

#[cfg(feature = "json")]
pub use source::JsonFormat;
#[cfg(feature = "toml")]
pub use source::TomlFormat;
#[cfg(feature = "yaml")]
pub use source::YamlFormat;

// Re-export derive macro when feature is enabled
#[cfg(feature = "derive")]
pub use confdef_derive::FromConfig;
