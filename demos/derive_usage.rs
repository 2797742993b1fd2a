// Derive macro usage example for confdef
//
// Run with: cargo run --example derive_usage --features derive

use confdef::presets::kafka_rest;
use confdef::{FromConfig, RawSettings, Resolver};

/// Consumer pool settings
#[derive(Debug, FromConfig)]
#[config(prefix = "consumer")]
pub struct ConsumerPool {
    pub threads: i32,

    #[config(key = "consumer.request.max.messages")]
    pub max_messages: i32,

    #[config(key = "consumer.instance.timeout.ms")]
    pub instance_timeout_ms: i32,
}

/// Everything the worker pools need
#[derive(Debug, FromConfig)]
pub struct WorkerSettings {
    pub id: String,
    pub producer_threads: i32,

    #[config(flatten)]
    pub consumers: ConsumerPool,

    /// Filled in at runtime
    #[config(skip)]
    pub started: bool,
}

fn main() -> confdef::Result<()> {
    let raw = RawSettings::from([
        ("id", "rest-1"),
        ("producer.threads", "8"),
        ("consumer.threads", "2"),
    ]);

    let config = Resolver::new(kafka_rest::schema()?).resolve(&raw)?;
    let workers: WorkerSettings = config.extract()?;

    println!("{workers:#?}");
    Ok(())
}
