//! Ready-made schemas for the REST proxy service
//!
//! [`rest`] declares the settings every REST server shares. [`kafka_rest`]
//! derives from it, overriding the response media types and adding the
//! proxy's own cluster, producer and consumer settings.

pub mod kafka_rest;
pub mod rest;
