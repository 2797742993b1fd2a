//! Setting definitions and the schema registry
//!
//! # Overview
//!
//! A [`Schema`] is an ordered registry of [`SettingDefinition`]s. It is
//! assembled once with a [`SchemaBuilder`] and is immutable afterwards.
//!
//! The builder has two mutating operations that are deliberate opposites:
//!
//! - [`SchemaBuilder::define`] adds a **new** setting and fails if the name exists
//! - [`SchemaBuilder::define_override`] **replaces** an existing setting and fails
//!   if the name was never defined
//!
//! ```rust
//! use confdef::{ConfigValue, Importance, Schema, SettingDefinition, SettingType};
//!
//! # fn main() -> confdef::Result<()> {
//! let mut builder = Schema::builder();
//! builder
//!     .define(
//!         SettingDefinition::new("port", SettingType::Int)
//!             .default_value(8080)
//!             .importance(Importance::High)
//!             .doc("Port to listen on"),
//!     )?
//!     .define(SettingDefinition::new("debug", SettingType::Boolean).default_value("false"))?;
//! let base = builder.build()?;
//!
//! // Derived schemas never touch the base
//! let mut derived = base.derive();
//! derived.define_override(SettingDefinition::new("port", SettingType::Int).default_value(8082))?;
//! let derived = derived.build()?;
//!
//! assert_eq!(base.get("port").unwrap().default(), Some(&ConfigValue::Int(8080)));
//! assert_eq!(derived.get("port").unwrap().default(), Some(&ConfigValue::Int(8082)));
//! # Ok(())
//! # }
//! ```
//!
//! # Defaults
//!
//! Defaults may be given as raw text (`"5"`) or as typed values (`5`). Either
//! way they are coerced and validated when the setting is defined, so an
//! unusable default surfaces as [`Error::InvalidDefault`] at assembly time
//! rather than at resolution time.

use indexmap::IndexMap;
use log::debug;

use super::coercion::coerce;
use super::types::{ConfigValue, DefaultValue, Importance, SettingType};
use super::validator::Validator;
use crate::error::{Error, Result};

// =============================================================================
// Setting Definition
// =============================================================================

/// One declared configuration key
///
/// # Example
///
/// ```
/// use confdef::{Importance, SettingDefinition, SettingType, Validator};
///
/// let threads = SettingDefinition::new("producer.threads", SettingType::Int)
///     .default_value("5")
///     .importance(Importance::Low)
///     .doc("Number of threads to run produce requests on.")
///     .validator(Validator::at_least(1));
///
/// assert!(!threads.is_required());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDefinition {
    /// Unique key
    pub name: String,

    /// Kind the raw value is coerced to
    pub setting_type: SettingType,

    /// Declared default. Inside a built [`Schema`] this is always either
    /// `Required` or an already coerced `Value`.
    pub default: DefaultValue,

    /// Documentation weight
    pub importance: Importance,

    /// Free-text documentation
    pub documentation: String,

    /// Optional constraint checked after coercion
    pub validator: Option<Validator>,
}

impl SettingDefinition {
    /// Create a required setting with medium importance and no documentation
    pub fn new(name: impl Into<String>, setting_type: SettingType) -> Self {
        Self {
            name: name.into(),
            setting_type,
            default: DefaultValue::Required,
            importance: Importance::default(),
            documentation: String::new(),
            validator: None,
        }
    }

    /// Set the default value
    #[must_use]
    pub fn default_value(mut self, default: impl Into<DefaultValue>) -> Self {
        self.default = default.into();
        self
    }

    /// Mark the setting as required (no default)
    #[must_use]
    pub fn required(mut self) -> Self {
        self.default = DefaultValue::Required;
        self
    }

    #[must_use]
    pub fn importance(mut self, importance: Importance) -> Self {
        self.importance = importance;
        self
    }

    #[must_use]
    pub fn doc(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    #[must_use]
    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Whether the setting has no default
    pub fn is_required(&self) -> bool {
        self.default.is_required()
    }

    /// The coerced default, if the setting has one
    pub fn default(&self) -> Option<&ConfigValue> {
        match &self.default {
            DefaultValue::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Validate a coerced value against this definition's constraint
    pub fn validate(&self, value: &ConfigValue) -> std::result::Result<(), String> {
        match &self.validator {
            Some(validator) => validator.validate(value),
            None => Ok(()),
        }
    }

    /// Coerce the declared default and check it against the validator
    fn normalize(mut self) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidDefault {
            key: self.name.clone(),
            setting_type: self.setting_type,
            reason,
        };

        if let Some(validator) = &self.validator {
            validator.validate_definition().map_err(invalid)?;
        }

        let coerced = match std::mem::take(&mut self.default) {
            DefaultValue::Required => None,
            DefaultValue::Raw(raw) => Some(coerce(self.setting_type, &raw).map_err(invalid)?),
            DefaultValue::Value(value) => Some(value.conform(self.setting_type).map_err(invalid)?),
        };

        if let Some(value) = &coerced {
            self.validate(value)
                .map_err(|e| invalid(format!("Default value is invalid: {e}")))?;
        }

        self.default = coerced.into();
        Ok(self)
    }
}

// =============================================================================
// Schema
// =============================================================================

/// Ordered, immutable registry of setting definitions
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    definitions: IndexMap<String, SettingDefinition>,
}

/// One step of schema composition
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaOp {
    /// Add a new setting
    Define(SettingDefinition),
    /// Replace an inherited setting
    Override(SettingDefinition),
}

impl Schema {
    /// Start assembling a new, empty schema
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// Start a derived schema that inherits every definition of `self`.
    ///
    /// `self` is left untouched.
    pub fn derive(&self) -> SchemaBuilder {
        SchemaBuilder {
            definitions: self.definitions.clone(),
            frozen: false,
        }
    }

    /// Build a derived schema by applying `ops` on top of `base`
    pub fn compose<I>(base: &Schema, ops: I) -> Result<Schema>
    where
        I: IntoIterator<Item = SchemaOp>,
    {
        let mut builder = base.derive();
        for op in ops {
            match op {
                SchemaOp::Define(def) => builder.define(def)?,
                SchemaOp::Override(def) => builder.define_override(def)?,
            };
        }
        builder.build()
    }

    /// Look up a definition by name
    pub fn get(&self, name: &str) -> Option<&SettingDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Setting names in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Definitions in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SettingDefinition> {
        self.definitions.values()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a SettingDefinition;
    type IntoIter = indexmap::map::Values<'a, String, SettingDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.definitions.values()
    }
}

// =============================================================================
// Schema Builder
// =============================================================================

/// Mutable registry used while assembling a [`Schema`]
///
/// Once [`build`](SchemaBuilder::build) has been called the builder is
/// frozen and every further mutation fails with [`Error::SchemaFrozen`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    definitions: IndexMap<String, SettingDefinition>,
    frozen: bool,
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new setting.
    ///
    /// # Errors
    ///
    /// - [`Error::DuplicateDefinition`] if the name already exists
    /// - [`Error::InvalidDefault`] if the default cannot be coerced to the type
    /// - [`Error::SchemaFrozen`] after [`build`](SchemaBuilder::build)
    pub fn define(&mut self, definition: SettingDefinition) -> Result<&mut Self> {
        self.ensure_mutable()?;
        if self.definitions.contains_key(&definition.name) {
            return Err(Error::DuplicateDefinition(definition.name));
        }

        let definition = definition.normalize()?;
        debug!(
            "Defined setting '{}' ({}, {})",
            definition.name, definition.setting_type, definition.importance
        );
        self.definitions.insert(definition.name.clone(), definition);
        Ok(self)
    }

    /// Replace an inherited setting, keeping its position.
    ///
    /// # Errors
    ///
    /// - [`Error::UnknownOverrideTarget`] if the name was never defined
    /// - [`Error::InvalidDefault`] if the default cannot be coerced to the type
    /// - [`Error::SchemaFrozen`] after [`build`](SchemaBuilder::build)
    pub fn define_override(&mut self, definition: SettingDefinition) -> Result<&mut Self> {
        self.ensure_mutable()?;
        if !self.definitions.contains_key(&definition.name) {
            return Err(Error::UnknownOverrideTarget(definition.name));
        }

        let definition = definition.normalize()?;
        debug!(
            "Overrode setting '{}' ({}, {})",
            definition.name, definition.setting_type, definition.importance
        );
        // IndexMap::insert on an existing key keeps its index
        self.definitions.insert(definition.name.clone(), definition);
        Ok(self)
    }

    /// Whether a setting with this name has been defined so far
    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    /// Finalize the registry and freeze this builder
    pub fn build(&mut self) -> Result<Schema> {
        self.ensure_mutable()?;
        self.frozen = true;
        Ok(Schema {
            definitions: std::mem::take(&mut self.definitions),
        })
    }

    fn ensure_mutable(&self) -> Result<()> {
        if self.frozen {
            Err(Error::SchemaFrozen)
        } else {
            Ok(())
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
