//! Settings shared by every REST server

use crate::config::{ConfigValue, Importance, Schema, SchemaBuilder, SettingDefinition, SettingType};
use crate::error::Result;

pub const LISTENERS: &str = "listeners";
pub const PORT: &str = "port";
pub const RESPONSE_MEDIATYPE_PREFERRED: &str = "response.mediatype.preferred";
pub const RESPONSE_MEDIATYPE_DEFAULT: &str = "response.mediatype.default";
pub const DEBUG: &str = "debug";
pub const REQUEST_LOGGER_NAME: &str = "request.logger.name";
pub const SHUTDOWN_GRACEFUL_MS: &str = "shutdown.graceful.ms";

pub const RESPONSE_MEDIATYPE_PREFERRED_DOC: &str = "An ordered list of the server's preferred media types used for \
    responses, from most preferred to least.";
pub const RESPONSE_MEDIATYPE_DEFAULT_DOC: &str = "The default response media type that should be used if no \
    specific types are requested in an Accept header.";

/// Builder seeded with the base REST settings, ready for a service to
/// layer its own definitions on top
pub fn base_builder() -> Result<SchemaBuilder> {
    let mut builder = Schema::builder();
    builder
        .define(
            SettingDefinition::new(LISTENERS, SettingType::List)
                .default_value("")
                .importance(Importance::High)
                .doc(
                    "List of listeners. http and https are supported. Each listener must include the \
                     protocol, hostname, and port. For example: http://myhost:8080, https://0.0.0.0:8081",
                ),
        )?
        .define(
            SettingDefinition::new(PORT, SettingType::Int)
                .default_value(8080)
                .importance(Importance::Low)
                .doc("Port to listen on for new connections."),
        )?
        .define(
            SettingDefinition::new(RESPONSE_MEDIATYPE_PREFERRED, SettingType::List)
                .default_value(ConfigValue::from(&["application/json"][..]))
                .importance(Importance::High)
                .doc(RESPONSE_MEDIATYPE_PREFERRED_DOC),
        )?
        .define(
            SettingDefinition::new(RESPONSE_MEDIATYPE_DEFAULT, SettingType::String)
                .default_value("application/json")
                .importance(Importance::High)
                .doc(RESPONSE_MEDIATYPE_DEFAULT_DOC),
        )?
        .define(
            SettingDefinition::new(DEBUG, SettingType::Boolean)
                .default_value(false)
                .importance(Importance::Low)
                .doc(
                    "Boolean indicating whether extra debugging information is generated in some \
                     error response entities.",
                ),
        )?
        .define(
            SettingDefinition::new(REQUEST_LOGGER_NAME, SettingType::String)
                .default_value("io.confluent.rest-utils.requests")
                .importance(Importance::Low)
                .doc("Name of the logger to write the NCSA Common Log Format request log."),
        )?
        .define(
            SettingDefinition::new(SHUTDOWN_GRACEFUL_MS, SettingType::Int)
                .default_value(1000)
                .importance(Importance::Low)
                .doc("Amount of time to wait after a shutdown request for outstanding requests to complete."),
        )?;
    Ok(builder)
}

/// The base REST server schema
pub fn base_schema() -> Result<Schema> {
    base_builder()?.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_schema_order_and_defaults() {
        let schema = base_schema().unwrap();
        assert_eq!(
            schema.names().collect::<Vec<_>>(),
            vec![
                LISTENERS,
                PORT,
                RESPONSE_MEDIATYPE_PREFERRED,
                RESPONSE_MEDIATYPE_DEFAULT,
                DEBUG,
                REQUEST_LOGGER_NAME,
                SHUTDOWN_GRACEFUL_MS
            ]
        );
        assert_eq!(schema.get(PORT).unwrap().default(), Some(&ConfigValue::Int(8080)));
        assert_eq!(schema.get(LISTENERS).unwrap().default(), Some(&ConfigValue::List(vec![])));
        assert_eq!(schema.get(DEBUG).unwrap().default(), Some(&ConfigValue::Boolean(false)));
        assert!(schema.iter().all(|def| def.validator.is_none()));
    }
}
