//! Schema definition types
//!
//! This module contains the foundational types for declaring settings:
//! - `SettingType` / `ConfigValue` - the primitive kinds and their typed values
//! - `SettingDefinition` - one declared key with default, importance and docs
//! - `Schema` / `SchemaBuilder` - the ordered registry and its assembly phase
//! - `Validator` - optional constraints checked after coercion

mod coercion;
mod schema;
mod types;
mod validator;

pub use coercion::{coerce, split_list};
pub use schema::{Schema, SchemaBuilder, SchemaOp, SettingDefinition};
pub use types::{ConfigValue, DefaultValue, FromConfigValue, Importance, SettingType};
pub use validator::Validator;
